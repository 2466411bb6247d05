use reqwest::{Method, RequestBuilder as ReqwestRequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{self, AssistantsError};

/// HTTP method for API endpoints
#[derive(Debug, Clone, Copy)]
pub(crate) enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// Represents an API endpoint with its query string
#[derive(Debug, Clone)]
pub(crate) struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    pub query_params: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
            query_params: Vec::new(),
        }
    }

    /// Flattens a serializable query struct into `key=value` pairs.
    ///
    /// Unset fields are skipped, arrays become repeated `key[]` pairs.
    pub fn with_query<Q: Serialize>(mut self, query: &Q) -> Result<Self, AssistantsError> {
        let Value::Object(fields) = serde_json::to_value(query)? else {
            return Err(AssistantsError::UnexpectedResponse(
                "query parameters must serialize to an object".to_string(),
            ));
        };

        for (key, value) in fields {
            match value {
                Value::Null => {}
                Value::String(s) => self.query_params.push((key, s)),
                Value::Array(items) => {
                    for item in items {
                        let item = match item {
                            Value::String(s) => s,
                            other => other.to_string(),
                        };
                        self.query_params.push((format!("{key}[]"), item));
                    }
                }
                other => self.query_params.push((key, other.to_string())),
            }
        }

        Ok(self)
    }
}

/// Borrowed view over a client's connection settings that builds and sends requests.
pub(crate) struct RequestBuilder<'a> {
    pub client: &'a reqwest::Client,
    pub base_url: &'a str,
    pub api_key: &'a str,
    pub default_headers: &'a [(&'static str, &'static str)],
}

impl RequestBuilder<'_> {
    fn build_request(&self, endpoint: &Endpoint) -> ReqwestRequestBuilder {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.path.trim_start_matches('/')
        );

        let mut req = self
            .client
            .request(endpoint.method.into(), &url)
            .bearer_auth(self.api_key);

        if !endpoint.query_params.is_empty() {
            req = req.query(&endpoint.query_params);
        }

        for (key, value) in self.default_headers {
            req = req.header(*key, *value);
        }

        req
    }

    /// Execute a request with an optional JSON body and decode the response
    pub async fn request_json<T, B>(
        &self,
        endpoint: &Endpoint,
        body: Option<&B>,
    ) -> Result<T, AssistantsError>
    where
        T: for<'de> Deserialize<'de>,
        B: Serialize + ?Sized,
    {
        let mut req = self.build_request(endpoint);

        if let Some(body) = body {
            req = req.json(body);
        } else if matches!(endpoint.method, HttpMethod::Post) {
            // The API expects a JSON object even for body-less actions like cancel.
            req = req.json(&serde_json::Map::new());
        }

        tracing::debug!(
            method = ?endpoint.method,
            path = %endpoint.path,
            query = endpoint.query_params.len(),
            "sending Assistants API request"
        );

        let res = req.send().await?;
        self.handle_response(endpoint, res).await
    }

    /// Execute a request without body and decode the response
    pub async fn request<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &Endpoint,
    ) -> Result<T, AssistantsError> {
        self.request_json::<T, ()>(endpoint, None).await
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &Endpoint,
        res: Response,
    ) -> Result<T, AssistantsError> {
        let status = res.status();
        let bytes = res.bytes().await?;

        if !status.is_success() {
            let err = error::parse_error_response(status, &bytes);
            tracing::debug!(path = %endpoint.path, status = status.as_u16(), code = err.code(), "Assistants API request failed");
            return Err(err);
        }

        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            AssistantsError::UnexpectedResponse(format!(
                "HTTP {} but failed to decode JSON: {}; body: {}",
                status.as_u16(),
                e,
                String::from_utf8_lossy(&bytes)
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Query {
        limit: Option<u8>,
        order: Option<&'static str>,
        after: Option<&'static str>,
        include: Option<Vec<&'static str>>,
    }

    #[test]
    fn test_query_skips_unset_fields() {
        let endpoint = Endpoint::new("threads/t/messages", HttpMethod::Get)
            .with_query(&Query {
                limit: Some(10),
                order: Some("desc"),
                after: None,
                include: None,
            })
            .unwrap();

        assert_eq!(
            endpoint.query_params,
            vec![
                ("limit".to_string(), "10".to_string()),
                ("order".to_string(), "desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_expands_arrays() {
        let endpoint = Endpoint::new("steps", HttpMethod::Get)
            .with_query(&Query {
                limit: None,
                order: None,
                after: None,
                include: Some(vec!["a", "b"]),
            })
            .unwrap();

        assert_eq!(
            endpoint.query_params,
            vec![
                ("include[]".to_string(), "a".to_string()),
                ("include[]".to_string(), "b".to_string()),
            ]
        );
    }
}
