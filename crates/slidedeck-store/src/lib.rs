mod errors;
mod memory;
mod mongo;
mod settings;
mod slide;

pub use errors::*;
pub use memory::*;
pub use mongo::*;
pub use settings::*;
pub use slide::*;

use async_trait::async_trait;

/// Read/insert access to the slides collection.
///
/// Both the seeder and the HTTP API receive an explicitly constructed store and are
/// responsible for nothing beyond the calls below. The owner of the store decides when
/// to call [`SlideStore::close`].
#[async_trait]
pub trait SlideStore: Send + Sync + std::fmt::Debug {
    /// Every slide, in the natural iteration order of the store.
    async fn list(&self) -> Result<Vec<Slide>, StoreError>;

    async fn get(&self, id: &SlideId) -> Result<Option<Slide>, StoreError>;

    /// Persists one payload as a new document and returns the identity assigned to it.
    async fn insert(&self, payload: SlidePayload) -> Result<SlideId, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    /// Names of the collections in the selected database.
    async fn collections(&self) -> Result<Vec<String>, StoreError>;

    /// Database the store is bound to, for diagnostics.
    fn database_name(&self) -> &str;

    async fn close(&self);
}
