//! Orchestration services: the upload pipeline and the backup coordinator.

pub mod backup;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;

pub use backup::{BackupCoordinator, BackupOutcome, BackupReport};
pub use pipeline::{ProcessedUpload, UploadPipeline, UploadedFile};
