//! CSV loaders feeding the SMMLV experience engine.

pub mod documents;
pub mod experiences;
pub mod wages;

pub use documents::{DocumentLoadError, DocumentSet};
pub use experiences::{ExperienceDraft, ExperienceLoadError};
pub use wages::{WageTableLoader, WageTableLoaderError};
