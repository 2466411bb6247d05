use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::validation::ValidationError;

/// Error envelope returned by the Assistants API
#[derive(Debug, Deserialize)]
struct ApiErrorPayload {
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    r#type: Option<String>,
    param: Option<String>,
    code: Option<Value>,
}

/// Classification of a non-success API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ApiErrorKind {
    NotFound,
    #[strum(serialize = "rate_limit_exceeded")]
    RateLimit,
    InvalidPrompt,
    #[strum(serialize = "authentication_error")]
    Authentication,
    PermissionDenied,
    BadRequest,
    Conflict,
    #[strum(serialize = "server_error")]
    Server,
    #[strum(serialize = "api_error")]
    Other,
}

impl ApiErrorKind {
    /// Error codes in the body take precedence over the HTTP status.
    pub fn classify(status: StatusCode, code: Option<&str>) -> Self {
        match code {
            Some("rate_limit_exceeded") => return Self::RateLimit,
            Some("invalid_prompt") => return Self::InvalidPrompt,
            _ => {}
        }

        match status.as_u16() {
            400 | 422 => Self::BadRequest,
            401 => Self::Authentication,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            409 => Self::Conflict,
            429 => Self::RateLimit,
            500..=599 => Self::Server,
            _ => Self::Other,
        }
    }
}

/// A request the API rejected or could not serve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (HTTP {status}): {message}")]
pub struct ApiError {
    pub status: u16,
    pub kind: ApiErrorKind,
    pub message: String,
    pub error_type: Option<String>,
    pub param: Option<String>,
    pub code: Option<String>,
}

/// Errors that can occur when calling the Assistants API
#[derive(Debug, Error)]
pub enum AssistantsError {
    /// The request was rejected locally before any network traffic
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The API answered with a non-success status
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The HTTP exchange could not be completed
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request body or query encoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A success response whose body does not match the expected shape
    #[error("Unexpected response from API: {0}")]
    UnexpectedResponse(String),

    #[error("Missing API key")]
    MissingApiKey,
}

impl AssistantsError {
    /// Stable, machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Api(error) => error.kind.into(),
            Self::Transport(_) => "transport_error",
            Self::Json(_) | Self::UnexpectedResponse(_) => "unexpected_response",
            Self::MissingApiKey => "configuration_error",
        }
    }

    /// The API error, if the remote rejected the request.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }
}

/// Parse an error response from the Assistants API
pub(crate) fn parse_error_response(status: StatusCode, bytes: &bytes::Bytes) -> AssistantsError {
    let body = serde_json::from_slice::<ApiErrorPayload>(bytes)
        .ok()
        .and_then(|payload| payload.error);

    let Some(body) = body else {
        let error_text = String::from_utf8_lossy(bytes);
        let message = if error_text.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("empty response body")
                .to_string()
        } else {
            error_text.into_owned()
        };
        return ApiError {
            status: status.as_u16(),
            kind: ApiErrorKind::classify(status, None),
            message,
            error_type: None,
            param: None,
            code: None,
        }
        .into();
    };

    let code = body.code.and_then(|code| match code {
        Value::String(code) => Some(code),
        Value::Null => None,
        other => Some(other.to_string()),
    });

    ApiError {
        status: status.as_u16(),
        kind: ApiErrorKind::classify(status, code.as_deref()),
        message: body
            .message
            .unwrap_or_else(|| format!("HTTP status {}", status.as_u16())),
        error_type: body.r#type,
        param: body.param,
        code,
    }
    .into()
}
