use crate::domain::model::ImportDefaults;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "catalog-import")]
#[command(about = "Bulk import of institutions and degree programs from delimited text files")]
pub struct CliConfig {
    /// Delimited input file (.csv or .txt) with a header row
    #[arg(long)]
    pub input_file: String,

    /// Base URL of the catalog service API
    #[arg(long, default_value = "http://localhost:8080/api")]
    pub api_endpoint: String,

    /// Optional TOML configuration file overriding endpoint and placeholders
    #[arg(long)]
    pub config_file: Option<String>,

    /// HTTP timeout in seconds for catalog service calls
    #[arg(long, default_value = "30")]
    pub request_timeout: u64,

    /// Parse and reconcile without writing to the catalog service
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn request_timeout_secs(&self) -> u64 {
        self.request_timeout
    }

    fn import_defaults(&self) -> ImportDefaults {
        ImportDefaults::default()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_endpoint", &self.api_endpoint)?;
        validation::validate_path("input_file", &self.input_file)?;
        validation::validate_file_extension("input_file", &self.input_file, &["csv", "txt"])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> CliConfig {
        CliConfig {
            input_file: "catalogue.csv".to_string(),
            api_endpoint: "http://localhost:8080/api".to_string(),
            config_file: None,
            request_timeout: 30,
            dry_run: false,
            verbose: false,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let mut config = base_config();
        config.api_endpoint = "not-a-url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_input_extension_rejected() {
        let mut config = base_config();
        config.input_file = "catalogue.xlsx".to_string();
        assert!(config.validate().is_err());
    }
}
