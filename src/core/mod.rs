pub mod importer;
pub mod parser;
pub mod reconciler;

pub use crate::domain::model::{ImportDefaults, ImportSummary, RawRow};
pub use crate::domain::ports::{CatalogReader, CatalogWriter, ConfigProvider};
pub use crate::utils::error::Result;
