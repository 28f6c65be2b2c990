//! Registration submission adapter
//!
//! Maps the wizard's accumulated record onto the registration service's wire
//! shape. Account credentials live at the top level; business attributes are
//! nested under `businessDetailsRequest`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::client::send_json;
use super::error::ApiError;
use crate::registration::RegistrationRecord;

const SERVICE: &str = "registration";

/// `userType` sent with every business registration
pub const BUSINESS_USER: &str = "BUSINESS_USER";

/// Fallback shown when the service gives no reason
pub const GENERIC_FAILURE: &str = "Registration failed";

/// What a successful registration hands back
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuccessToken {
    pub message: Option<String>,
}

/// Submits a completed registration
#[async_trait]
pub trait RegistrationApi: Send + Sync {
    async fn submit(&self, record: &RegistrationRecord) -> Result<SuccessToken, ApiError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub user_type: String,
    pub phone_number: Option<String>,
    pub business_details_request: BusinessDetailsRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDetailsRequest {
    pub business_name: String,
    pub company_name: String,
    pub official_email: Option<String>,
    pub official_phone_number: Option<String>,
    pub services: Vec<String>,
}

impl From<&RegistrationRecord> for RegisterRequest {
    fn from(record: &RegistrationRecord) -> Self {
        Self {
            // The service keys accounts by email; the wizard collects a username
            email: record.username.clone(),
            username: record.username.clone(),
            password: record.password.clone(),
            user_type: BUSINESS_USER.to_string(),
            phone_number: record.phone_number.clone(),
            business_details_request: BusinessDetailsRequest {
                business_name: record.company_name.clone(),
                company_name: record.company_name.clone(),
                official_email: record.official_email.clone(),
                official_phone_number: record.phone_number.clone(),
                services: record.services.clone(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// REST implementation against `api.registration_url`
pub struct HttpRegistrationApi {
    client: Client,
    url: String,
}

impl HttpRegistrationApi {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

#[async_trait]
impl RegistrationApi for HttpRegistrationApi {
    async fn submit(&self, record: &RegistrationRecord) -> Result<SuccessToken, ApiError> {
        if !self.is_configured() {
            return Err(ApiError::not_configured(SERVICE, "api.registration_url"));
        }
        let body = RegisterRequest::from(record);
        let response: RegisterResponse =
            send_json(SERVICE, self.client.post(&self.url).json(&body)).await?;

        if !response.success {
            warn!(company = %record.company_name, "registration rejected by service");
            return Err(ApiError::rejected(SERVICE, response.message));
        }

        info!(company = %record.company_name, "registration accepted");
        Ok(SuccessToken {
            message: response.message,
        })
    }
}
