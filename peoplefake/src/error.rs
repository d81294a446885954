//! Error types for the demos.
//!
//! Store failures keep their [`DocumentStoreError`] and are wrapped in
//! [`DemoError::Store`]; writing the report and validating input add their own
//! variants.

use thiserror::Error;

pub use peoplefake_core::error::{DocumentStoreError, DocumentStoreResult};

#[derive(Error, Debug)]
pub enum DemoError {
    /// The document store failed, including failing to connect.
    #[error(transparent)]
    Store(#[from] DocumentStoreError),
    /// Writing the demo report failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
    /// A person was constructed with an empty name or an out-of-range age.
    #[error("Invalid person: {0}")]
    InvalidPerson(String),
}

pub type DemoResult<T> = Result<T, DemoError>;
