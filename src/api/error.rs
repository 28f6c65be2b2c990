//! API error types shared by the remote service adapters

use thiserror::Error;

/// Errors that can occur when talking to the directory service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 401 Unauthorized - session token invalid or expired
    #[error("{service}: Unauthorized (401) - session expired")]
    Unauthorized { service: String },
    /// 403 Forbidden - token lacks required permissions
    #[error("{service}: Forbidden (403) - insufficient permissions")]
    Forbidden { service: String },
    /// Network, DNS or timeout error
    #[error("{service}: Network error - {message}")]
    Network { service: String, message: String },
    /// Non-success HTTP status; `message` is the server's own text when it sent one
    #[error("{service}: HTTP {status}{}", format_detail(.message))]
    Http {
        service: String,
        status: u16,
        message: Option<String>,
    },
    /// 2xx response whose body reported `success: false`
    #[error("{service}: request rejected{}", format_detail(.message))]
    Rejected {
        service: String,
        message: Option<String>,
    },
    /// Response body did not match the expected shape
    #[error("{service}: Could not parse response - {message}")]
    Decode { service: String, message: String },
    /// Required setting missing (endpoint, profile id, token)
    #[error("{service}: Not configured ({what})")]
    NotConfigured { service: String, what: String },
}

fn format_detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" - {m}"))
        .unwrap_or_default()
}

impl ApiError {
    /// Check if this is an authentication error (401 or 403)
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. } | ApiError::Forbidden { .. }
        )
    }

    /// Get the service name for this error
    pub fn service_name(&self) -> &str {
        match self {
            ApiError::Unauthorized { service }
            | ApiError::Forbidden { service }
            | ApiError::Network { service, .. }
            | ApiError::Http { service, .. }
            | ApiError::Rejected { service, .. }
            | ApiError::Decode { service, .. }
            | ApiError::NotConfigured { service, .. } => service,
        }
    }

    /// Human-readable text the server attached to the failure, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Http { message, .. } | ApiError::Rejected { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// Message to surface to the user: the server's text, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .map_or_else(|| fallback.to_string(), str::to_string)
    }

    pub fn unauthorized(service: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            service: service.into(),
        }
    }

    pub fn forbidden(service: impl Into<String>) -> Self {
        ApiError::Forbidden {
            service: service.into(),
        }
    }

    pub fn network(service: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Network {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Build an HTTP error, pulling `message` out of a JSON body when present
    pub fn http(service: impl Into<String>, status: u16, body: &str) -> Self {
        ApiError::Http {
            service: service.into(),
            status,
            message: extract_message(body),
        }
    }

    pub fn rejected(service: impl Into<String>, message: Option<String>) -> Self {
        ApiError::Rejected {
            service: service.into(),
            message: message.filter(|m| !m.trim().is_empty()),
        }
    }

    pub fn decode(service: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Decode {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn not_configured(service: impl Into<String>, what: impl Into<String>) -> Self {
        ApiError::NotConfigured {
            service: service.into(),
            what: what.into(),
        }
    }
}

/// Pull a non-empty `message` string out of a JSON error body
pub fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
