use std::fmt;

use bon::Builder;

use crate::AssistantsError;
use crate::internal::RequestBuilder;

/// Default endpoint of the OpenAI REST API
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const DEFAULT_HEADERS: &[(&str, &str)] = &[("OpenAI-Beta", "assistants=v2")];

/// OpenAI Assistants API client
///
/// Cheap to clone; clones share the underlying connection pool. A client is
/// bound to one API key, callers serving several keys build one client per key
/// from a shared [`reqwest::Client`].
#[derive(Clone, Builder)]
pub struct AssistantsClient {
    /// API key for authentication
    #[builder(into)]
    api_key: String,

    /// Base URL for the API (allows for custom endpoints)
    #[builder(default = DEFAULT_BASE_URL.to_string(), into)]
    base_url: String,

    /// HTTP client for making requests
    #[builder(default)]
    http_client: reqwest::Client,
}

impl AssistantsClient {
    /// Create a new client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder().api_key(api_key).build()
    }

    /// Create a new client from `OPENAI_API_KEY` (and optionally `OPENAI_BASE_URL`)
    pub fn from_env() -> Result<Self, AssistantsError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(AssistantsError::MissingApiKey)?;

        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self::builder().api_key(api_key).base_url(base_url).build())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn request_builder(&self) -> RequestBuilder<'_> {
        RequestBuilder {
            client: &self.http_client,
            base_url: &self.base_url,
            api_key: &self.api_key,
            default_headers: DEFAULT_HEADERS,
        }
    }
}

impl fmt::Debug for AssistantsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantsClient")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = AssistantsClient::new("sk-test");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = AssistantsClient::builder()
            .api_key("sk-secret")
            .base_url("http://localhost:1234/v1")
            .build();
        let debug = format!("{client:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("localhost:1234"));
    }
}
