//! Ways of carrying JSON-RPC messages between an MCP client and [`McpServer`](crate::McpServer).

mod http;
mod stdio;

pub use self::http::{cors_layer, health, serve, sse_router, streamable_router};
pub use self::stdio::{serve_lines, serve_stdio};

use thiserror::Error;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
    strum::VariantNames,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Transport {
    /// Newline-delimited JSON over stdin/stdout.
    #[default]
    Stdio,
    /// `POST /mcp` with a JSON response.
    Http,
    /// Same endpoint as [`Transport::Http`].
    StreamableHttp,
    /// `GET /sse` event stream plus `POST /messages`.
    Sse,
}

impl Transport {
    pub fn is_http(&self) -> bool {
        !matches!(self, Self::Stdio)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode response: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_names() {
        assert_eq!("stdio".parse::<Transport>().unwrap(), Transport::Stdio);
        assert_eq!("HTTP".parse::<Transport>().unwrap(), Transport::Http);
        assert_eq!(
            "streamable-http".parse::<Transport>().unwrap(),
            Transport::StreamableHttp
        );
        assert_eq!("Sse".parse::<Transport>().unwrap(), Transport::Sse);
        assert!("websocket".parse::<Transport>().is_err());
        assert_eq!(Transport::StreamableHttp.to_string(), "streamable-http");
        assert!(!Transport::Stdio.is_http());
    }
}
