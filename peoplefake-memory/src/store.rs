//! In-memory storage implementation for document stores.
//!
//! Documents are kept as BSON values in insertion order behind an async-aware
//! read-write lock, so an unsorted query returns documents in the order they
//! were inserted, like a freshly written server-side collection.

use std::{collections::{HashMap, HashSet}, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Uuid, Bson};
use tracing::debug;

use peoplefake_core::{
    backend::{InsertFailure, InsertOrdering, InsertOutcome, StoreBackend, StoreBackendBuilder},
    cursor::DocumentCursor,
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Query, SortDirection},
};

use crate::evaluator::{Comparable, DocumentEvaluator};

#[derive(Debug, Default)]
struct StoredCollection {
    ids: HashSet<String>,
    documents: Vec<Bson>,
}

type StoreMap = HashMap<String, StoredCollection>;


/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable; clones share the same underlying data.
/// Queries scan every document of the collection.
///
/// # Example
///
/// ```ignore
/// use peoplefake_memory::InMemoryStore;
/// use peoplefake_core::backend::{InsertOrdering, StoreBackend};
/// use bson::{Uuid, Bson, doc};
///
/// let store = InMemoryStore::new();
/// let id = Uuid::new();
/// let doc = Bson::Document(doc! { "_id": id, "name": "Kermit", "age": 50 });
/// store.insert_documents(vec![(id, doc)], "peopleFake", InsertOrdering::Ordered).await?;
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> documents
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    fn sort_documents(documents: &mut [Bson], field: &str, direction: SortDirection) {
        // Stable, so ties keep insertion order. Missing fields sort as null.
        documents.sort_by(|a, b| {
            let ordering = Self::field_value(a, field).sort_cmp(&Self::field_value(b, field));

            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    fn field_value<'a>(document: &'a Bson, field: &str) -> Comparable<'a> {
        document
            .as_document()
            .and_then(|doc| doc.get(field))
            .map(Comparable::from)
            .unwrap_or(Comparable::Null)
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
        ordering: InsertOrdering,
    ) -> DocumentStoreResult<InsertOutcome> {
        let mut store = self.store.write().await;
        let stored = store
            .entry(collection.to_string())
            .or_default();

        let mut outcome = InsertOutcome::default();

        for (index, (id, doc)) in documents.into_iter().enumerate() {
            let key = id.to_string();

            let rejection = if stored.ids.contains(&key) {
                Some(DocumentStoreError::DocumentAlreadyExists(key.clone(), collection.to_string()))
            } else if doc.as_document().is_none() {
                Some(DocumentStoreError::InvalidDocument(format!(
                    "Document {key} is not a key/value document"
                )))
            } else {
                None
            };

            match (rejection, ordering) {
                (None, _) => {
                    stored.ids.insert(key);
                    stored.documents.push(doc);
                    outcome.inserted += 1;
                }
                (Some(err), InsertOrdering::Ordered) => return Err(err),
                (Some(err), InsertOrdering::Unordered) => {
                    outcome.failures.push(InsertFailure { index, message: err.to_string() });
                }
            }
        }

        debug!(
            collection,
            inserted = outcome.inserted,
            failed = outcome.failures.len(),
            "memory insert"
        );

        Ok(outcome)
    }

    async fn find_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<DocumentCursor> {
        let store = self.store.read().await;
        let Some(stored) = store.get(collection) else {
            return Ok(DocumentCursor::from_documents(vec![]));
        };

        let mut documents = match &query.filter {
            Some(filter) => DocumentEvaluator::filter_documents(&stored.documents, filter)?,
            None => stored.documents.clone(),
        };

        if let Some(sort) = &query.sort {
            Self::sort_documents(&mut documents, &sort.field, sort.direction);
        }

        let documents = documents
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX));

        let documents: Vec<Bson> = match &query.projection {
            Some(projection) => documents
                .map(|doc| match doc {
                    Bson::Document(doc) => Bson::Document(projection.apply(&doc)),
                    other => other,
                })
                .collect(),
            None => documents.collect(),
        };

        Ok(DocumentCursor::from_documents(documents))
    }

    async fn count_documents(
        &self,
        filter: Option<Expr>,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        let store = self.store.read().await;
        let Some(stored) = store.get(collection) else {
            return Ok(0);
        };

        let count = match &filter {
            Some(filter) => DocumentEvaluator::filter_documents(&stored.documents, filter)?.len(),
            None => stored.documents.len(),
        };

        Ok(count as u64)
    }

    async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.store.write().await.remove(name);

        Ok(())
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        let mut names = self.store
            .read()
            .await
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        names.sort();

        Ok(names)
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
