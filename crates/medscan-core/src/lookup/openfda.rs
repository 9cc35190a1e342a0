//! openFDA NDC directory client.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::error::LookupError;
use crate::models::config::LookupConfig;
use crate::models::medication::DrugRecord;

use super::ProductSource;

/// Response envelope of the NDC directory endpoint.
#[derive(Debug, Deserialize)]
struct NdcResponse {
    #[serde(default)]
    results: Vec<DrugRecord>,
}

/// Product source querying the openFDA NDC directory over HTTPS.
pub struct OpenFdaSource {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenFdaSource {
    /// Create a source from lookup configuration.
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self::with_client(client, &config.endpoint))
    }

    /// Create a source with an existing HTTP client.
    pub fn with_client(client: reqwest::Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }

    /// Build the exact-match query URL for a product NDC, limited to one result.
    pub fn query_url(&self, product_ndc: &str) -> Result<Url, LookupError> {
        let search = format!("product_ndc:\"{}\"", product_ndc);
        Url::parse_with_params(&self.endpoint, &[("search", search.as_str()), ("limit", "1")])
            .map_err(|e| LookupError::Transport(format!("invalid endpoint {}: {}", self.endpoint, e)))
    }
}

#[async_trait]
impl ProductSource for OpenFdaSource {
    async fn query(&self, product_ndc: &str) -> Result<Option<DrugRecord>, LookupError> {
        let url = self.query_url(product_ndc)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

/// Take the first result of an NDC directory response body.
fn parse_response(body: &str) -> Result<Option<DrugRecord>, LookupError> {
    let response: NdcResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;
    Ok(response.results.into_iter().next())
}
