//! Document processing for SmartCV: PDF text extraction and the HTML
//! renderer for enhanced CVs. Everything in this crate is pure and
//! synchronous; it performs no IO beyond reading the byte slices it is
//! given.

pub mod extract;
pub mod render;

pub use extract::{ExtractionError, TextExtractor};
pub use render::render_cv;
