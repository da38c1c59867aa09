pub mod calculations;
pub mod db;
pub mod form;
pub mod models;

pub use db::repository::{ExperienceRepository, ExperienceStore, RepositoryError, WageRepository};
pub use models::*;
