//! Per-invocation API key resolution.
//!
//! In `STATIC` mode every call uses the key configured at startup. In
//! `PASSTHROUGH` mode calls arriving over HTTP must carry their own key in the
//! `X-OpenAI-API-Key` header; calls without an HTTP request (stdio) fall back
//! to the static key.

use assistants_ox::AssistantsClient;
use http::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Header carrying the caller's key in `PASSTHROUGH` mode.
pub const API_KEY_HEADER: &str = "x-openai-api-key";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, strum::EnumString, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum CredentialMode {
    #[default]
    Static,
    Passthrough,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("OPENAI_API_KEY is not configured")]
    MissingStaticKey,

    #[error("missing or empty X-OpenAI-API-Key header")]
    MissingHeader,
}

impl CredentialError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingStaticKey => "configuration_error",
            Self::MissingHeader => "credential_error",
        }
    }
}

/// The inbound HTTP request a tool call arrived with.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    headers: HeaderMap,
}

impl RequestContext {
    pub fn new(headers: HeaderMap) -> Self {
        Self { headers }
    }

    /// Header value by case-insensitive name, if it is valid visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// Builds an [`AssistantsClient`] for each tool invocation.
#[derive(Debug)]
pub struct CredentialResolver {
    mode: CredentialMode,
    static_key: SecretString,
    base_url: String,
    http: reqwest::Client,
}

impl CredentialResolver {
    pub fn new(mode: CredentialMode, static_key: SecretString, base_url: impl Into<String>) -> Self {
        Self {
            mode,
            static_key,
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Share an existing connection pool between invocations.
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn mode(&self) -> CredentialMode {
        self.mode
    }

    pub fn has_static_key(&self) -> bool {
        !self.static_key.expose_secret().trim().is_empty()
    }

    pub fn resolve_api_key(
        &self,
        request: Option<&RequestContext>,
    ) -> Result<SecretString, CredentialError> {
        match (self.mode, request) {
            (CredentialMode::Passthrough, Some(request)) => request
                .header(API_KEY_HEADER)
                .filter(|key| !key.is_empty())
                .map(SecretString::from)
                .ok_or(CredentialError::MissingHeader),
            _ if self.has_static_key() => Ok(SecretString::from(self.static_key.expose_secret())),
            _ => Err(CredentialError::MissingStaticKey),
        }
    }

    /// A client bound to the key resolved for this invocation.
    pub fn client(&self, request: Option<&RequestContext>) -> Result<AssistantsClient, CredentialError> {
        let api_key = self.resolve_api_key(request)?;
        Ok(AssistantsClient::builder()
            .api_key(api_key.expose_secret())
            .base_url(self.base_url.clone())
            .http_client(self.http.clone())
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn resolver(mode: CredentialMode, key: &str) -> CredentialResolver {
        CredentialResolver::new(mode, SecretString::from(key), assistants_ox::DEFAULT_BASE_URL)
    }

    fn request_with_key(key: &str) -> RequestContext {
        let mut headers = HeaderMap::new();
        headers.insert("X-OpenAI-API-Key", HeaderValue::from_str(key).unwrap());
        RequestContext::new(headers)
    }

    #[test]
    fn test_mode_parsing_is_case_insensitive() {
        assert_eq!("STATIC".parse::<CredentialMode>().unwrap(), CredentialMode::Static);
        assert_eq!(
            "passthrough".parse::<CredentialMode>().unwrap(),
            CredentialMode::Passthrough
        );
        assert!("header".parse::<CredentialMode>().is_err());
        assert_eq!(CredentialMode::Passthrough.to_string(), "PASSTHROUGH");
    }

    #[test]
    fn test_stdio_uses_static_key() {
        let key = resolver(CredentialMode::Passthrough, "sk-static")
            .resolve_api_key(None)
            .unwrap();
        assert_eq!(key.expose_secret(), "sk-static");
    }

    #[test]
    fn test_static_mode_ignores_header() {
        let key = resolver(CredentialMode::Static, "sk-static")
            .resolve_api_key(Some(&request_with_key("sk-caller")))
            .unwrap();
        assert_eq!(key.expose_secret(), "sk-static");
    }

    #[test]
    fn test_passthrough_reads_header() {
        let key = resolver(CredentialMode::Passthrough, "")
            .resolve_api_key(Some(&request_with_key("sk-caller")))
            .unwrap();
        assert_eq!(key.expose_secret(), "sk-caller");
    }

    #[test]
    fn test_passthrough_without_header_fails() {
        let err = resolver(CredentialMode::Passthrough, "sk-static")
            .resolve_api_key(Some(&RequestContext::default()))
            .unwrap_err();
        assert_eq!(err, CredentialError::MissingHeader);

        let err = resolver(CredentialMode::Passthrough, "sk-static")
            .resolve_api_key(Some(&request_with_key("")))
            .unwrap_err();
        assert_eq!(err.code(), "credential_error");
    }

    #[test]
    fn test_passthrough_forwards_header_verbatim() {
        let key = resolver(CredentialMode::Passthrough, "")
            .resolve_api_key(Some(&request_with_key(" sk-caller\t")))
            .unwrap();
        assert_eq!(key.expose_secret(), " sk-caller\t");
    }

    #[test]
    fn test_empty_static_key_is_a_configuration_error() {
        let err = resolver(CredentialMode::Static, "").resolve_api_key(None).unwrap_err();
        assert_eq!(err, CredentialError::MissingStaticKey);
        assert_eq!(err.code(), "configuration_error");
    }

    #[test]
    fn test_debug_never_shows_key() {
        let resolver = resolver(CredentialMode::Static, "sk-very-secret");
        assert!(!format!("{resolver:?}").contains("sk-very-secret"));
    }
}
