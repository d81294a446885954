use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Document, Bson, Uuid};
use mongodb::{
    Client, Collection as MongoCollection,
    error::{Error as MongoError, ErrorKind},
    options::{ClientOptions, FindOptions},
};
use tracing::{debug, warn};
use peoplefake_core::{
    backend::{InsertFailure, InsertOrdering, InsertOutcome, StoreBackend, StoreBackendBuilder},
    cursor::DocumentCursor,
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Projection, Query},
};

use crate::query::MongoQueryTranslator;


#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    /// Ensures the stored `_id` is the id the document was submitted with.
    fn prepare_document(id: Uuid, document: Bson) -> DocumentStoreResult<Document> {
        let mut document = match document {
            Bson::Document(document) => document,
            _ => return Err(DocumentStoreError::InvalidDocument("Expected document".into())),
        };
        document.insert(Projection::ID_FIELD, id);

        Ok(document)
    }

    fn backend_error(err: MongoError) -> DocumentStoreError {
        DocumentStoreError::Backend(err.to_string())
    }

    /// Splits an unordered `insert_many` error into per-document failures.
    ///
    /// Anything other than plain write errors (connection loss, write concern
    /// failures) is still fatal.
    fn insert_failures(err: MongoError) -> DocumentStoreResult<Vec<InsertFailure>> {
        let failures = match err.kind.as_ref() {
            ErrorKind::InsertMany(failure) if failure.write_concern_error.is_none() => failure
                .write_errors
                .as_ref()
                .map(|write_errors| {
                    write_errors
                        .iter()
                        .map(|write_error| InsertFailure {
                            index: write_error.index,
                            message: write_error.message.clone(),
                        })
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        if failures.is_empty() {
            return Err(Self::backend_error(err));
        }

        Ok(failures)
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
        ordering: InsertOrdering,
    ) -> DocumentStoreResult<InsertOutcome> {
        let documents = documents
            .into_iter()
            .map(|(id, doc)| Self::prepare_document(id, doc))
            .collect::<DocumentStoreResult<Vec<Document>>>()?;
        let submitted = documents.len();

        if submitted == 0 {
            return Ok(InsertOutcome::default());
        }

        let result = self.get_collection(collection)
            .insert_many(documents)
            .ordered(ordering == InsertOrdering::Ordered)
            .await;

        match (result, ordering) {
            (Ok(result), _) => Ok(InsertOutcome {
                inserted: result.inserted_ids.len(),
                failures: vec![],
            }),
            (Err(err), InsertOrdering::Ordered) => Err(Self::backend_error(err)),
            (Err(err), InsertOrdering::Unordered) => {
                let failures = Self::insert_failures(err)?;
                warn!(collection, failed = failures.len(), "unordered insert skipped documents");

                Ok(InsertOutcome { inserted: submitted - failures.len(), failures })
            }
        }
    }

    async fn find_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<DocumentCursor> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(limit as i64);
        }
        if let Some(skip) = query.offset {
            options.skip = Some(skip as u64);
        }
        if let Some(sort) = &query.sort {
            options.sort = Some(MongoQueryTranslator::sort(sort));
        }
        if let Some(projection) = &query.projection {
            options.projection = Some(MongoQueryTranslator::projection(projection));
        }

        let filter = MongoQueryTranslator::filter(query.filter.as_ref())?;
        debug!(collection, %filter, "mongodb find");

        let cursor = self.get_collection(collection)
            .find(filter)
            .with_options(options)
            .await
            .map_err(Self::backend_error)?;

        Ok(DocumentCursor::new(
            cursor
                .map_err(Self::backend_error)
                .map_ok(Bson::Document)
        ))
    }

    async fn count_documents(
        &self,
        filter: Option<Expr>,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        self.get_collection(collection)
            .count_documents(MongoQueryTranslator::filter(filter.as_ref())?)
            .await
            .map_err(Self::backend_error)
    }

    async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.get_collection(name)
            .drop()
            .await
            .map_err(Self::backend_error)?;

        Ok(())
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        self.client
            .database(&self.database)
            .list_collection_names()
            .await
            .map_err(Self::backend_error)
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    /// Parses the connection string and creates the client.
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the
    /// first operation rather than here.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            )
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
