use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Params, and Actions)
// =============================================================================

/// Trait that any stored record must implement to be managed by a [`ResourceActor`].
///
/// Hooks and actions run inside the actor loop, one message at a time, so an
/// action that checks a field and then mutates it cannot interleave with
/// another request against the same store. Implementations must validate
/// before mutating: an `Err` return leaves the record untouched.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;
    type Error: std::error::Error + Clone + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;

    /// Construct the full record from the assigned ID and creation parameters.
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;
    fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Compared against every other stored record before a create or update
    /// is committed. An `Err` rejects the write.
    fn check_unique(&self, _other: &Self) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler ---

    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

/// Failures of the actor plumbing itself, or an error raised by the record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameworkError<E> {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    /// The store is keyed by the caller and cannot assign IDs itself.
    #[error("Store requires caller-supplied keys")]
    KeyRequired,
    #[error(transparent)]
    Entity(E),
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<Result<T, FrameworkError<E>>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T::Id, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    /// Returns the record stored under `id`, creating it from `params` first
    /// if it does not exist. The caller chooses the key.
    GetOrCreate {
        id: T::Id,
        params: T::CreateParams,
        respond_to: Response<T, T::Error>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T, T::Error>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<(), T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
    List {
        respond_to: Response<Vec<T>, T::Error>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Option<Box<dyn Fn() -> T::Id + Send + Sync>>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        Self::build(buffer_size, Some(Box::new(next_id_fn)))
    }

    /// An actor whose records are only ever created under caller-chosen keys
    /// via `GetOrCreate`. Plain `Create` requests fail with `KeyRequired`.
    pub fn keyed(buffer_size: usize) -> (Self, ResourceClient<T>) {
        Self::build(buffer_size, None)
    }

    fn build(
        buffer_size: usize,
        next_id_fn: Option<Box<dyn Fn() -> T::Id + Send + Sync>>,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn,
        };
        (actor, ResourceClient::new(sender))
    }

    #[instrument(name = "resource_actor", skip(self), fields(entity = short_type_name::<T>()))]
    pub async fn run(mut self) {
        info!("Actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let result = match self.next_id_fn.as_ref().map(|next_id| next_id()) {
                        Some(id) => self.insert_new(id, params).map(|item| item.id().clone()),
                        None => Err(FrameworkError::KeyRequired),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::GetOrCreate { id, params, respond_to } => {
                    let result = match self.store.get(&id) {
                        Some(item) => Ok(item.clone()),
                        None => self.insert_new(id, params),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.apply_update(id, patch));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let result = match self.store.get(&id) {
                        Some(item) => match item.on_delete() {
                            Ok(()) => {
                                self.store.remove(&id);
                                Ok(())
                            }
                            Err(e) => Err(FrameworkError::Entity(e)),
                        },
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.handle_action(action).map_err(FrameworkError::Entity),
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.values().cloned().collect()));
                }
            }
        }
        info!(records = self.store.len(), "Actor stopped");
    }

    fn insert_new(&mut self, id: T::Id, params: T::CreateParams) -> Result<T, FrameworkError<T::Error>> {
        let mut item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Entity)?;
        item.on_create().map_err(FrameworkError::Entity)?;
        self.check_unique(&item)?;
        debug!(id = %id, "Record created");
        self.store.insert(id, item.clone());
        Ok(item)
    }

    /// Patches a copy, so a rejected patch or a uniqueness clash leaves the
    /// stored record as it was.
    fn apply_update(&mut self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError<T::Error>> {
        let mut item = self
            .store
            .get(&id)
            .cloned()
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_update(patch).map_err(FrameworkError::Entity)?;
        self.check_unique(&item)?;
        self.store.insert(id, item.clone());
        Ok(item)
    }

    fn check_unique(&self, item: &T) -> Result<(), FrameworkError<T::Error>> {
        self.store
            .values()
            .filter(|other| other.id() != item.id())
            .try_for_each(|other| item.check_unique(other))
            .map_err(FrameworkError::Entity)
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

// Manual impl: a derive would demand `T: Clone` on the wrapper only.
impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone() }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T::Id, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn get_or_create(&self, id: T::Id, params: T::CreateParams) -> Result<T, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::GetOrCreate { id, params, respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::List { respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use thiserror::Error;

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: String,
        value: u32,
    }

    #[derive(Debug, Clone, Error, PartialEq)]
    enum CounterError {
        #[error("counter would underflow: {0}")]
        Underflow(u32),
        #[error("another counter already holds {0}")]
        Duplicate(u32),
    }

    #[derive(Debug)]
    enum CounterAction {
        Take(u32),
    }

    impl Entity for Counter {
        type Id = String;
        type CreateParams = u32;
        type Patch = u32;
        type Action = CounterAction;
        type ActionResult = u32;
        type Error = CounterError;

        fn id(&self) -> &String {
            &self.id
        }

        fn from_create_params(id: String, value: u32) -> Result<Self, CounterError> {
            Ok(Self { id, value })
        }

        fn on_update(&mut self, value: u32) -> Result<(), CounterError> {
            self.value = value;
            Ok(())
        }

        fn check_unique(&self, other: &Self) -> Result<(), CounterError> {
            if self.value == other.value {
                return Err(CounterError::Duplicate(self.value));
            }
            Ok(())
        }

        fn handle_action(&mut self, action: CounterAction) -> Result<u32, CounterError> {
            match action {
                CounterAction::Take(n) if n > self.value => Err(CounterError::Underflow(self.value)),
                CounterAction::Take(n) => {
                    self.value -= n;
                    Ok(self.value)
                }
            }
        }
    }

    fn spawn_counters() -> ResourceClient<Counter> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || format!("counter_{}", counter.fetch_add(1, Ordering::SeqCst));
        let (actor, client) = ResourceActor::new(10, next_id);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_resource_actor_with_actions() {
        let client = spawn_counters();
        let id = client.create(5).await.unwrap();
        assert_eq!(id, "counter_1");

        assert_eq!(client.perform_action(id.clone(), CounterAction::Take(3)).await, Ok(2));

        // Rejected action leaves the record unchanged
        let err = client.perform_action(id.clone(), CounterAction::Take(3)).await.unwrap_err();
        assert_eq!(err, FrameworkError::Entity(CounterError::Underflow(2)));
        assert_eq!(client.get(id).await.unwrap().unwrap().value, 2);
    }

    #[tokio::test]
    async fn test_get_or_create_uses_caller_key_once() {
        let client = spawn_counters();
        let first = client.get_or_create("cart_alice".to_string(), 7).await.unwrap();
        let second = client.get_or_create("cart_alice".to_string(), 99).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(second.value, 7);
        assert_eq!(client.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_keyed_actor_rejects_plain_create() {
        let (actor, client) = ResourceActor::<Counter>::keyed(4);
        tokio::spawn(actor.run());
        assert_eq!(client.create(1).await.unwrap_err(), FrameworkError::KeyRequired);
        assert!(client.get_or_create("fixed".to_string(), 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_ids_report_not_found() {
        let client = spawn_counters();
        let missing = "counter_404".to_string();
        assert_eq!(client.update(missing.clone(), 1).await.unwrap_err(), FrameworkError::NotFound(missing.clone()));
        assert_eq!(client.delete(missing.clone()).await.unwrap_err(), FrameworkError::NotFound(missing.clone()));
        assert!(matches!(
            client.perform_action(missing, CounterAction::Take(1)).await,
            Err(FrameworkError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_uniqueness_hook_guards_create_and_update() {
        let client = spawn_counters();
        let first = client.create(5).await.unwrap();
        assert_eq!(client.create(5).await.unwrap_err(), FrameworkError::Entity(CounterError::Duplicate(5)));

        let second = client.create(6).await.unwrap();
        assert_eq!(
            client.update(second.clone(), 5).await.unwrap_err(),
            FrameworkError::Entity(CounterError::Duplicate(5))
        );
        assert_eq!(client.get(second).await.unwrap().unwrap().value, 6);

        // A record never clashes with itself
        assert_eq!(client.update(first, 5).await.unwrap().value, 5);
        assert_eq!(client.list().await.unwrap().len(), 2);
    }

    #[test]
    fn framework_errors_render_the_entity_error_as_is() {
        let err: FrameworkError<CounterError> = FrameworkError::Entity(CounterError::Underflow(2));
        assert_eq!(err.to_string(), "counter would underflow: 2");
        let err: FrameworkError<CounterError> = FrameworkError::NotFound("counter_9".into());
        assert_eq!(err.to_string(), "Item not found: counter_9");
    }
}
