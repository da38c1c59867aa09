mod addition;
mod document;
mod experience;
mod financial;
mod wage_entry;

pub use addition::{Addition, AdditionId};
pub use document::{Document, Folder};
pub use experience::{ExperienceDetails, ExperienceRecord, NewExperienceRecord};
pub use financial::{FinancialDerived, FinancialInputs};
pub use wage_entry::WageEntry;
