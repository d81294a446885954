//! Collection handles for document store operations.
//!
//! - [`Collection`] - Untyped collection working with raw BSON documents
//! - [`TypedCollection`] - Collection bound to a specific [`Document`] type
//!
//! Handles borrow the backend owned by a [`DocumentStore`](crate::store::DocumentStore),
//! so every operation receives its connection explicitly.
//!
//! # Example
//!
//! ```ignore
//! let people = store.typed_collection::<PersonDocument>();
//! people.insert_one(kermit).await?;
//! let found = people.find_one(Query::filtered(Filter::eq("name", "Kermit"))).await?;
//! ```

use bson::{Bson, Uuid};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tracing::debug;

use crate::{
    backend::{InsertOrdering, InsertOutcome, StoreBackend},
    cursor::{DocumentCursor, TypedCursor},
    document::{Document, DocumentExt},
    error::DocumentStoreResult,
    query::{Expr, Query},
};

/// An untyped collection with a reference to a storage backend.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the backend reference
/// * `B` - The storage backend type
#[derive(Debug)]
pub struct Collection<'a, B: StoreBackend> {
    name: String,
    backend: &'a B,
}

impl<'a, B: StoreBackend> Collection<'a, B> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts raw documents.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if the
    /// backend fails, or if an ordered insert hits a rejected document.
    pub async fn insert(
        &self,
        documents: Vec<(Uuid, Bson)>,
        ordering: InsertOrdering,
    ) -> DocumentStoreResult<InsertOutcome> {
        self.backend
            .insert_documents(documents, self.name(), ordering)
            .await
    }

    /// Runs a query and returns a lazy cursor over raw documents.
    pub async fn find(&self, query: Query) -> DocumentStoreResult<DocumentCursor> {
        debug!(collection = %self.name, ?query, "find");
        self.backend
            .find_documents(query, self.name())
            .await
    }

    /// Runs a query and materializes the raw documents.
    pub async fn query(&self, query: Query) -> DocumentStoreResult<Vec<Bson>> {
        debug!(collection = %self.name, ?query, "query");
        self.backend
            .query_documents(query, self.name())
            .await
    }

    /// Counts documents matching `filter`, or all documents when `None`.
    pub async fn count(&self, filter: Option<Expr>) -> DocumentStoreResult<u64> {
        self.backend
            .count_documents(filter, self.name())
            .await
    }
}

/// A collection bound to document type `D`.
#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns an untyped handle on the same collection.
    pub fn untyped(&self) -> Collection<'a, B> {
        Collection::new(self.name.clone(), self.backend)
    }

    /// Inserts a single document.
    ///
    /// # Errors
    ///
    /// Fails if serialization fails, the backend is unreachable, or the id is
    /// already taken.
    pub async fn insert_one(&self, document: D) -> DocumentStoreResult<InsertOutcome> {
        self.insert(vec![document], InsertOrdering::Ordered).await
    }

    /// Inserts a batch of documents.
    ///
    /// Each document is serialized independently and submitted with its own id.
    pub async fn insert(
        &self,
        documents: Vec<D>,
        ordering: InsertOrdering,
    ) -> DocumentStoreResult<InsertOutcome> {
        let documents = documents
            .into_iter()
            .map(|d| d.to_bson().map(move |b| (d.id().clone(), b)))
            .collect::<Result<Vec<(Uuid, Bson)>, _>>()?;

        debug!(collection = %self.name, count = documents.len(), ?ordering, "insert");
        self.backend
            .insert_documents(documents, self.name(), ordering)
            .await
    }

    /// Runs a query and returns a lazy cursor of documents.
    pub async fn find(&self, query: Query) -> DocumentStoreResult<TypedCursor<D>> {
        Ok(self.untyped().find(query).await?.typed())
    }

    /// Returns the first document matching `query`, or `None` when nothing matches.
    pub async fn find_one(&self, mut query: Query) -> DocumentStoreResult<Option<D>> {
        query.limit = Some(1);
        self.find(query).await?.next().await
    }

    /// Runs a query and materializes the documents.
    pub async fn query(&self, query: Query) -> DocumentStoreResult<Vec<D>> {
        self.query_as(query).await
    }

    /// Runs a query and deserializes each result into `T`.
    ///
    /// Use this with a projection, where results no longer carry every field of `D`.
    pub async fn query_as<T: DeserializeOwned>(&self, query: Query) -> DocumentStoreResult<Vec<T>> {
        self.untyped()
            .query(query)
            .await?
            .into_iter()
            .map(|doc| -> DocumentStoreResult<T> { Ok(bson::de::deserialize_from_bson(doc)?) })
            .collect()
    }

    /// Counts documents matching `filter`, or all documents when `None`.
    pub async fn count(&self, filter: Option<Expr>) -> DocumentStoreResult<u64> {
        self.untyped().count(filter).await
    }
}
