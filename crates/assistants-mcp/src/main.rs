mod logging;
mod settings;

use clap::Parser;
use mcp_ox::transport::{self, Transport};
use mcp_ox::{CredentialMode, CredentialResolver, McpServer, ServerInfo};
use tracing::{info, warn};

use crate::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables take precedence.
    dotenvy::dotenv().ok();

    let settings = Settings::parse();
    logging::init(&settings.log_level, settings.log_format)?;

    info!(
        environment = %settings.environment,
        project = %settings.project_name,
        version = %settings.server_version,
        transport = %settings.transport,
        credential_mode = %settings.credential_mode,
        base_url = %settings.openai_base_url,
        "starting MCP server"
    );
    if !settings.registry_id.is_empty() {
        info!(registry_id = %settings.registry_id, "registry identity");
    }

    let credentials = CredentialResolver::new(
        settings.credential_mode,
        settings.api_key(),
        settings.openai_base_url.clone(),
    );
    if !credentials.has_static_key() {
        match (settings.credential_mode, settings.transport) {
            (CredentialMode::Static, _) | (CredentialMode::Passthrough, Transport::Stdio) => {
                warn!("OPENAI_API_KEY is empty; tool calls will fail with configuration_error");
            }
            (CredentialMode::Passthrough, _) => {}
        }
    }

    let server = McpServer::assistants(
        ServerInfo::new(settings.project_name.clone(), settings.server_version.clone()),
        credentials,
    );
    info!(tools = server.tools().definitions().len(), "tools registered");

    let router = match settings.transport {
        Transport::Stdio => {
            tokio::select! {
                result = transport::serve_stdio(&server) => result?,
                _ = tokio::signal::ctrl_c() => info!("interrupted"),
            }
            return Ok(());
        }
        Transport::Http | Transport::StreamableHttp => transport::streamable_router(server),
        Transport::Sse => transport::sse_router(server),
    };

    let router = match transport::cors_layer(&settings.backend_cors_origins.0) {
        Some(cors) => router.layer(cors),
        None => router,
    };
    transport::serve(router, &settings.host, settings.port).await?;
    Ok(())
}
