//! Database access for SmartCV.
//!
//! `DocumentRecords` is the trait the services depend on; `DocumentRepository`
//! is its Postgres implementation. Keeping the trait here lets service tests
//! substitute an in-memory implementation.

pub mod documents;

pub use documents::{DocumentRecords, DocumentRepository, NewDocument};
