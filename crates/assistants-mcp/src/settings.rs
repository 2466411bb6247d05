use std::fmt;

use clap::Parser;
use mcp_ox::{CredentialMode, Transport};
use secrecy::SecretString;

use crate::logging::LogFormat;

/// Process configuration, read from flags or the environment (after `.env`).
#[derive(Clone, Parser)]
#[command(
    name = "assistants-mcp",
    version,
    about = "MCP server exposing the OpenAI Assistants API as tools"
)]
pub struct Settings {
    /// Deployment label, logged at startup.
    #[arg(long, env = "ENVIRONMENT", default_value = "development")]
    pub environment: String,

    /// Name reported to MCP clients.
    #[arg(long, env = "PROJECT_NAME", default_value = "openai-assistant-mcp")]
    pub project_name: String,

    /// Version reported to MCP clients.
    #[arg(long = "server-version", env = "VERSION", default_value = env!("CARGO_PKG_VERSION"))]
    pub server_version: String,

    /// Identifier of this server in an MCP registry, logged at startup when set.
    #[arg(long, env = "REGISTRY_ID", default_value = "")]
    pub registry_id: String,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// `text` or `json`.
    #[arg(long, env = "LOG_FORMAT", default_value = "text", value_parser = parse_log_format)]
    pub log_format: LogFormat,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8001)]
    pub port: u16,

    /// `stdio`, `http`, `streamable-http` or `sse`.
    #[arg(long, env = "TRANSPORT", default_value = "stdio", value_parser = parse_transport)]
    pub transport: Transport,

    /// `STATIC` uses OPENAI_API_KEY; `PASSTHROUGH` reads X-OpenAI-API-Key per HTTP request.
    #[arg(
        long,
        env = "MCP_CREDENTIAL_MODE",
        default_value = "STATIC",
        value_parser = parse_credential_mode
    )]
    pub credential_mode: CredentialMode,

    #[arg(long, env = "OPENAI_API_KEY", default_value = "", hide_env_values = true)]
    openai_api_key: String,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = assistants_ox::DEFAULT_BASE_URL)]
    pub openai_base_url: String,

    /// Comma-separated origins or a JSON array. `*` allows any origin.
    #[arg(long, env = "BACKEND_CORS_ORIGINS", default_value = "", value_parser = parse_cors_origins)]
    pub backend_cors_origins: CorsOrigins,
}

impl Settings {
    pub fn api_key(&self) -> SecretString {
        SecretString::from(self.openai_api_key.trim())
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("environment", &self.environment)
            .field("project_name", &self.project_name)
            .field("server_version", &self.server_version)
            .field("registry_id", &self.registry_id)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("transport", &self.transport)
            .field("credential_mode", &self.credential_mode)
            .field("openai_api_key", &"[REDACTED]")
            .field("openai_base_url", &self.openai_base_url)
            .field("backend_cors_origins", &self.backend_cors_origins)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsOrigins(pub Vec<String>);

fn parse_cors_origins(value: &str) -> Result<CorsOrigins, String> {
    let value = value.trim();
    let origins = if value.starts_with('[') {
        serde_json::from_str::<Vec<String>>(value).map_err(|e| format!("invalid JSON origin list: {e}"))?
    } else {
        value.split(',').map(str::to_string).collect()
    };

    Ok(CorsOrigins(
        origins
            .into_iter()
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect(),
    ))
}

fn parse_transport(value: &str) -> Result<Transport, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("unknown transport `{value}`, expected stdio, http, streamable-http or sse"))
}

fn parse_credential_mode(value: &str) -> Result<CredentialMode, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("unknown credential mode `{value}`, expected STATIC or PASSTHROUGH"))
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("unknown log format `{value}`, expected text or json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn parse(args: &[&str]) -> Result<Settings, clap::Error> {
        Settings::try_parse_from(std::iter::once("assistants-mcp").chain(args.iter().copied()))
    }

    #[test]
    fn test_cors_origins_forms() {
        assert_eq!(parse_cors_origins("").unwrap(), CorsOrigins::default());
        assert_eq!(
            parse_cors_origins("http://localhost:3000, https://app.example.com").unwrap().0,
            vec!["http://localhost:3000", "https://app.example.com"]
        );
        assert_eq!(
            parse_cors_origins(r#"["http://localhost:3000","*"]"#).unwrap().0,
            vec!["http://localhost:3000", "*"]
        );
        assert!(parse_cors_origins("[not json").is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let settings = parse(&[
            "--transport",
            "SSE",
            "--credential-mode",
            "passthrough",
            "--port",
            "9000",
            "--openai-api-key",
            "sk-flag",
            "--backend-cors-origins",
            "*",
        ])
        .unwrap();
        assert_eq!(settings.transport, Transport::Sse);
        assert_eq!(settings.credential_mode, CredentialMode::Passthrough);
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.api_key().expose_secret(), "sk-flag");
        assert_eq!(settings.backend_cors_origins.0, vec!["*"]);
    }

    #[test]
    fn test_server_identity() {
        let settings = parse(&[]).unwrap();
        assert_eq!(settings.server_version, env!("CARGO_PKG_VERSION"));
        assert!(settings.registry_id.is_empty());

        let settings = parse(&["--server-version", "2.3.0", "--registry-id", "io.example/assistants"]).unwrap();
        assert_eq!(settings.server_version, "2.3.0");
        assert_eq!(settings.registry_id, "io.example/assistants");
        assert!(format!("{settings:?}").contains("io.example/assistants"));
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        assert!(parse(&["--transport", "websocket"]).is_err());
        assert!(parse(&["--credential-mode", "header"]).is_err());
        assert!(parse(&["--log-format", "xml"]).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let settings = parse(&["--openai-api-key", "sk-very-secret"]).unwrap();
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
