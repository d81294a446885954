//! Document store abstraction used by the peoplefake demos.
//!
//! This crate provides:
//!
//! - **Document traits** ([`document`]) - Core traits for defining and serializing documents
//! - **Query and filtering API** ([`query`]) - Filters, projection, sort, skip and limit
//! - **Cursors** ([`cursor`]) - Lazy result sequences with pull, list and push consumption
//! - **Store backend abstraction** ([`backend`]) - Trait implemented by each storage backend
//! - **Collections interface** ([`collection`]) - Typed and untyped collection handles
//! - **Document store** ([`store`]) - Owner of a backend connection
//! - **Error handling** ([`error`]) - Error and result types

pub mod backend;
pub mod collection;
pub mod cursor;
pub mod document;
pub mod error;
pub mod query;
pub mod store;
