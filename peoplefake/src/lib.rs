//! Fake people written to and read from a document collection.
//!
//! Two demos share this crate. The write demo inserts one random person and
//! then a batch of fifty into `local.peopleFake`; the read demo runs six
//! queries against the same collection, each showing a different way to
//! filter a find or consume its results.
//!
//! Every operation takes the collection handle it works on, so the demos run
//! unchanged against MongoDB or the in-memory backend.
//!
//! # Quick Start
//!
//! ```ignore
//! use peoplefake::{prelude::*, memory::InMemoryStore, reader, writer};
//!
//! #[tokio::main]
//! async fn main() -> DemoResult<()> {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//!     let people: People<'_, _> = store.typed_collection();
//!
//!     writer::insert_person(&people, Person::new("Kermit", 50)?).await?;
//!     let kermit = reader::find_by_name_eq(&people, "Kermit").await?;
//!     println!("{kermit:?}");
//!
//!     store.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for tests and offline runs
//! - [`mongodb`] - MongoDB backend used by the binaries (requires `mongodb` feature)

pub mod error;
pub mod logging;
pub mod person;
pub mod prelude;
pub mod reader;
pub mod settings;
pub mod writer;

pub use peoplefake_core::{backend, collection, cursor, document, query, store};

// Re-export BSON types for convenience
pub use bson;

/// The people collection over backend `B`.
pub type People<'a, B> = collection::TypedCollection<'a, B, person::PersonDocument>;

/// In-memory storage backend implementations.
pub mod memory {
    pub use peoplefake_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use peoplefake_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
