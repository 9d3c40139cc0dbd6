//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_get`] or [`expect_action`] to assert behavior.

use crate::actor_framework::{Entity, ResourceClient, ResourceRequest, Response};
use tokio::sync::mpsc;

/// Creates a mock client and a receiver for asserting requests.
///
/// The test plays the actor: it reads each request off `receiver`, checks it,
/// and answers through the request's responder. Nothing is stored.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Response<T::Id, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<Response<Vec<T>, T::Error>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::FrameworkError;
    use crate::domain::{User, UserCreate, UserId};
    use crate::user_actor::UserError;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        let create_task = tokio::spawn(async move { client.create(UserCreate::new("Test User", "test@example.com")).await });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.fullname, "Test User");
        responder.send(Ok(UserId(1))).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(UserId(1)));
    }

    #[tokio::test]
    async fn mock_can_answer_with_errors() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let get_task = tokio::spawn(async move { client.get(UserId(7)).await });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(id, UserId(7));
        responder
            .send(Err(FrameworkError::Entity(UserError::ValidationError("boom".into()))))
            .unwrap();

        let result = get_task.await.unwrap();
        assert_eq!(result, Err(FrameworkError::Entity(UserError::ValidationError("boom".into()))));
    }
}
