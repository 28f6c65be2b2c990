//! System parameter lookup (selectable services, operational locations)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use super::client::{join_url, send_json};
use super::error::ApiError;

const SERVICE: &str = "parameters";

#[async_trait]
pub trait ParameterApi: Send + Sync {
    /// Values listed under a parameter code
    async fn fetch(&self, code: &str) -> Result<Vec<String>, ApiError>;

    /// Best-effort variant used by wizard pages: any failure is an empty list
    async fn options(&self, code: &str) -> Vec<String> {
        match self.fetch(code).await {
            Ok(values) => values,
            Err(e) => {
                warn!(code, error = %e, "parameter lookup failed, continuing without options");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ParameterResponse {
    #[serde(default)]
    data: Vec<String>,
}

pub struct HttpParameterApi {
    client: Client,
    base_url: String,
}

impl HttpParameterApi {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ParameterApi for HttpParameterApi {
    async fn fetch(&self, code: &str) -> Result<Vec<String>, ApiError> {
        let url = join_url(&self.base_url, code);
        let response: ParameterResponse = send_json(SERVICE, self.client.get(url)).await?;
        Ok(response.data)
    }
}
