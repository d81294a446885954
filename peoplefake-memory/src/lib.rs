//! In-memory document storage backend.
//!
//! A thread-safe implementation of the `StoreBackend` trait that keeps every
//! collection in process memory. It evaluates filters, sort, skip, limit and
//! projection itself, which makes it the backend of choice for tests.
//!
//! # Quick Start
//!
//! ```ignore
//! use peoplefake_core::{backend::StoreBackendBuilder, store::DocumentStore};
//! use peoplefake_memory::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await.unwrap());
//!     let people = store.typed_collection::<PersonDocument>();
//! }
//! ```

pub mod store;
pub mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
