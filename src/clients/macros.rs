/// Generates `get_<entity>` and `delete_<entity>` for a client wrapping a
/// `ResourceClient`, converting framework errors with the client error's
/// `From` impl.
macro_rules! impl_client_methods {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        paste::paste! {
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](
                    &self,
                    id: <$entity as $crate::actor_framework::Entity>::Id,
                ) -> Result<Option<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.get(id).await.map_err(<$error>::from)
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<delete_ $entity_name_snake>](
                    &self,
                    id: <$entity as $crate::actor_framework::Entity>::Id,
                ) -> Result<(), $error> {
                    tracing::debug!("Sending request");
                    self.inner.delete(id).await.map_err(<$error>::from)
                }
            }
        }
    };
}
