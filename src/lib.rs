//! Order lifecycle and inventory service built on a small actor framework.
//!
//! Every store is a [`actor_framework::ResourceActor`] that owns its records
//! and handles one request at a time. [`clients::OrderClient`] composes the
//! product, cart, user and order stores into checkout, status changes,
//! cancellation and reporting. [`app_system::OrderSystem`] starts and stops
//! the whole thing.
//!
//! ```no_run
//! # async fn demo() -> Result<(), order_lifecycle::app_system::SystemError> {
//! use order_lifecycle::app_system::OrderSystem;
//! use order_lifecycle::config::AppConfig;
//!
//! let system = OrderSystem::new(AppConfig::from_env()?);
//! let stats = system.order_client.statistics().await?;
//! assert_eq!(stats.total_orders, 0);
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod actor_framework;
pub mod app_system;
pub mod cart_actor;
pub mod clients;
pub mod config;
pub mod domain;
pub mod order_actor;
pub mod product_actor;
pub mod query;
pub mod user_actor;

#[cfg(test)]
mod mock_framework;
