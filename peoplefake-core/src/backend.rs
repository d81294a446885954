//! Storage backend abstraction for the document store.
//!
//! The [`StoreBackend`] trait is the seam between the demo code and whatever
//! actually stores documents. Connection management, query execution and
//! cursor iteration all live behind it.
//!
//! # Examples
//!
//! ```ignore
//! use peoplefake_core::backend::{InsertOrdering, StoreBackend};
//! use bson::{Uuid, Bson, doc};
//!
//! let id = Uuid::new();
//! let doc = Bson::Document(doc! { "_id": id, "name": "Kermit", "age": 50 });
//! let outcome = backend
//!     .insert_documents(vec![(id, doc)], "peopleFake", InsertOrdering::Ordered)
//!     .await?;
//! assert_eq!(outcome.inserted, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::{Bson, Uuid};
use std::fmt::Debug;

use crate::{
    cursor::DocumentCursor,
    error::DocumentStoreResult,
    query::{Expr, Query},
};

/// How a batch insert reacts to a failing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertOrdering {
    /// Insert in order and stop at the first failure. The failure is returned as an error.
    #[default]
    Ordered,
    /// Attempt every document; failures are reported in [`InsertOutcome::failures`].
    Unordered,
}

/// A single document that could not be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertFailure {
    /// Position of the document in the submitted batch.
    pub index: usize,
    /// Backend-provided reason.
    pub message: String,
}

/// Result of a batch insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Number of documents the backend accepted.
    pub inserted: usize,
    /// Documents that were rejected by an unordered insert.
    pub failures: Vec<InsertFailure>,
}

impl InsertOutcome {
    /// Returns `true` if every submitted document was inserted.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. The demos drive a backend from a
/// single task, one request at a time.
///
/// # Error Handling
///
/// Connection problems surface as
/// [`DocumentStoreError::Initialization`](crate::error::DocumentStoreError::Initialization)
/// or [`DocumentStoreError::Backend`](crate::error::DocumentStoreError::Backend).
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts new documents into a collection.
    ///
    /// The collection is created on first insert. With
    /// [`InsertOrdering::Ordered`] the first rejected document aborts the batch
    /// with an error; with [`InsertOrdering::Unordered`] every document is
    /// attempted and rejections are listed in the returned outcome.
    ///
    /// # Arguments
    ///
    /// * `documents` - (ID, BSON document) pairs to insert
    /// * `collection` - The name of the collection to insert into
    /// * `ordering` - Whether one failure stops the rest of the batch
    async fn insert_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
        ordering: InsertOrdering,
    ) -> DocumentStoreResult<InsertOutcome>;

    /// Runs a query and returns a lazy cursor over the matching documents.
    ///
    /// Filter, sort, offset, limit and projection from `query` are all applied
    /// by the backend. A missing collection yields an empty cursor.
    async fn find_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<DocumentCursor>;

    /// Runs a query and materializes every matching document.
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>> {
        self.find_documents(query, collection)
            .await?
            .collect()
            .await
    }

    /// Counts the documents matching `filter`, or every document when `filter` is `None`.
    async fn count_documents(
        &self,
        filter: Option<Expr>,
        collection: &str,
    ) -> DocumentStoreResult<u64>;

    /// Drops a collection and all its documents. Dropping a missing collection is not an error.
    async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()>;

    /// Lists the names of all collections in the store.
    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>>;

    /// Cleanly shuts down the backend, releasing its connections.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Creates a backend, connecting to it if necessary.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_without_failures_is_complete() {
        let outcome = InsertOutcome { inserted: 3, failures: vec![] };
        assert!(outcome.is_complete());

        let partial = InsertOutcome {
            inserted: 2,
            failures: vec![InsertFailure { index: 1, message: "duplicate".into() }],
        };
        assert!(!partial.is_complete());
    }
}
