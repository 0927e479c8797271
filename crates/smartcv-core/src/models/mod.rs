pub mod cv;
pub mod document;

pub use cv::{EducationEntry, EnhancedCv, ExperienceEntry, PersonalInfo};
pub use document::{Document, DocumentResponse};
