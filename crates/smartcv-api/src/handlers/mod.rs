pub mod backups;
pub mod documents;
pub mod health;
pub mod upload;
