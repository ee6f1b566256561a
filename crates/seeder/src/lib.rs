pub mod catalog;
pub mod error;

pub use catalog::{CatalogFile, CatalogSeeder, CatalogValidator, SeedSummary, ValidationReport};
pub use error::{Result, SeederError};
