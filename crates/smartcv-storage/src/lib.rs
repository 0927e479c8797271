//! Storage abstraction and backends for SmartCV.
//!
//! The `Storage` trait covers both the primary store (uploaded CVs) and the
//! secondary backup store. Two implementations exist: S3 via `object_store`
//! and a local filesystem backend for development and tests.
//!
//! # Storage key format
//!
//! Primary keys are user-scoped: `{user_id}/{file_name}`. Backup keys are
//! document-scoped: `backups/{document_id}/{file_name}`. Keys must not
//! contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
pub mod local;
pub mod s3;
pub mod traits;

pub use factory::{create_backup_storage, create_storage};
pub use local::LocalStorage;
pub use s3::S3Storage;
pub use smartcv_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult};
