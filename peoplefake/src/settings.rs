//! Connection settings for the demos.
//!
//! The demos take no arguments; they always talk to a local server and the
//! `local` database. The collection name comes from
//! [`PersonDocument`](crate::person::PersonDocument).

#[cfg(feature = "mongodb")]
use peoplefake_core::{
    backend::StoreBackendBuilder,
    error::DocumentStoreResult,
    store::DocumentStore,
};
#[cfg(feature = "mongodb")]
use peoplefake_mongodb::MongoDbStore;

pub const DEFAULT_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "local";

/// Where the demos connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub uri: String,
    pub database: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

#[cfg(feature = "mongodb")]
impl ConnectionSettings {
    /// Creates a MongoDB client for these settings.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Initialization`] if the connection string
    /// cannot be parsed.
    ///
    /// [`DocumentStoreError::Initialization`]: crate::error::DocumentStoreError::Initialization
    pub async fn connect(&self) -> DocumentStoreResult<DocumentStore<MongoDbStore>> {
        Ok(DocumentStore::new(
            MongoDbStore::builder(&self.uri, &self.database)
                .build()
                .await?,
        ))
    }
}
