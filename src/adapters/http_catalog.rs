use crate::domain::model::{Institution, Program};
use crate::domain::ports::{CatalogReader, CatalogWriter};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// JSON client for the remote catalog service. No retries: a failed call
/// surfaces as `ImportError::ApiError` and the caller decides what to do.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl CatalogReader for HttpCatalog {
    async fn fetch_institutions(&self) -> Result<Vec<Institution>> {
        tracing::debug!("Fetching institutions from {}", self.base_url);
        let response = self.client.get(self.url("institutions")).send().await?;
        let institutions: Vec<Institution> = response.error_for_status()?.json().await?;
        tracing::debug!("Fetched {} institutions", institutions.len());
        Ok(institutions)
    }
}

#[async_trait]
impl CatalogWriter for HttpCatalog {
    async fn create_institution(&self, institution: &Institution) -> Result<Institution> {
        let response = self
            .client
            .post(self.url("institutions"))
            .json(institution)
            .send()
            .await?;
        let persisted = response.error_for_status()?.json().await?;
        Ok(persisted)
    }

    async fn update_institution(&self, institution: &Institution) -> Result<()> {
        let response = self
            .client
            .put(self.url(&format!("institutions/{}", institution.id)))
            .json(institution)
            .send()
            .await?;
        response.error_for_status()?;
        Ok(())
    }

    async fn create_program(&self, program: &Program) -> Result<()> {
        let response = self
            .client
            .post(self.url("programs"))
            .json(program)
            .send()
            .await?;
        response.error_for_status()?;
        Ok(())
    }
}
