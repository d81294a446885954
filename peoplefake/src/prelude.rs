//! Convenient re-exports of commonly used types from peoplefake.
//!
//! ```ignore
//! use peoplefake::prelude::*;
//! ```
//!
//! This provides access to:
//! - The person model and its stored shapes
//! - Store, collection and cursor handles
//! - Query construction and filtering
//! - Error types

pub use peoplefake_core::{
    backend::{InsertFailure, InsertOrdering, InsertOutcome, StoreBackend, StoreBackendBuilder},
    collection::{Collection, TypedCollection},
    cursor::{DocumentCursor, TypedCursor},
    document::{Document, DocumentExt},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, FieldOp, Filter, Projection, Query, QueryBuilder, Sort, SortDirection},
    store::DocumentStore,
};

pub use crate::{
    People,
    error::{DemoError, DemoResult},
    person::{Person, PersonDocument, PersonSummary},
    reader::{AgeBound, ReadDemoParams},
    settings::ConnectionSettings,
};
