//! MongoDB backend for peoplefake.
//!
//! Implements the `StoreBackend` trait on top of the official async MongoDB
//! driver. Filters are translated into MongoDB query documents; sort, skip,
//! limit and projection are passed through as find options, and results are
//! streamed from the server cursor.
//!
//! # Example
//!
//! ```ignore
//! use peoplefake_core::backend::StoreBackendBuilder;
//! use peoplefake_mongodb::MongoDbStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "local")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod store;
pub mod query;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
