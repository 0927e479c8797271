//! Core domain types for SmartCV: the `Document` record, the enhanced-CV
//! payload, the unified error type, and application configuration.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, ExtractionFailure, LogLevel};
pub use models::{Document, DocumentResponse, EnhancedCv};
pub use storage_types::{EnhancementProvider, StorageBackend};
