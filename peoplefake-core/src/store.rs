//! Main document store interface.
//!
//! A [`DocumentStore`] owns one backend connection for its whole lifetime and
//! hands out collection handles that borrow it. Call
//! [`DocumentStore::shutdown`] when done to release the connection.
//!
//! # Example
//!
//! ```ignore
//! use peoplefake_core::store::DocumentStore;
//!
//! let store = DocumentStore::new(backend);
//! let people = store.typed_collection::<PersonDocument>();
//! // ...
//! store.shutdown().await?;
//! ```

use crate::{
    backend::StoreBackend,
    collection::{Collection, TypedCollection},
    document::Document,
    error::DocumentStoreResult,
};

/// A document store bound to a specific backend implementation.
///
/// # Type Parameters
///
/// * `B` - The backend implementation type
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Gets a typed collection for the specified document type.
    ///
    /// The collection name is determined by the document type's `collection_name()` method.
    pub fn typed_collection<'a, D: Document>(&'a self) -> TypedCollection<'a, B, D> {
        self.typed_collection_named(D::collection_name())
    }

    /// Gets a typed collection stored under a name other than the type's default.
    pub fn typed_collection_named<'a, D: Document>(
        &'a self,
        name: &str,
    ) -> TypedCollection<'a, B, D> {
        TypedCollection::new(name.to_string(), &self.backend)
    }

    /// Gets an untyped collection with the given name.
    pub fn collection<'a>(&'a self, name: &str) -> Collection<'a, B> {
        Collection::new(name.to_string(), &self.backend)
    }

    /// Drops (deletes) a collection with the given name.
    pub async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.backend.drop_collection(name).await
    }

    /// Lists all collections in the store.
    pub async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        self.backend.list_collections().await
    }

    /// Shuts down the backend, releasing its connections.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown().await
    }
}
