use crate::domain::model::{ImportDefaults, Institution, Program};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read side of the remote catalog service: seeds the working snapshot the
/// reconciler matches against.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    async fn fetch_institutions(&self) -> Result<Vec<Institution>>;
}

/// Write side of the remote catalog service. The engine guarantees exactly
/// one call per mutation, in row-processing order; retry policy belongs to
/// the implementor's host, not here.
#[async_trait]
pub trait CatalogWriter: Send + Sync {
    /// Persists a new institution and returns the stored copy, which may
    /// carry a server-assigned identifier replacing the provisional one.
    async fn create_institution(&self, institution: &Institution) -> Result<Institution>;

    /// Persists an institution whose faculty list gained an entry.
    async fn update_institution(&self, institution: &Institution) -> Result<()>;

    async fn create_program(&self, program: &Program) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn request_timeout_secs(&self) -> u64;
    fn import_defaults(&self) -> ImportDefaults;
}
