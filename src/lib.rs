pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::HttpCatalog;
pub use core::importer::ImportEngine;
pub use domain::model::{ImportDefaults, ImportSummary, Institution};
pub use utils::error::{ImportError, Result};
