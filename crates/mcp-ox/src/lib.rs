//! # mcp-ox
//!
//! A Model Context Protocol server that exposes the OpenAI Assistants API as
//! tools. Each resource family (assistants, threads, messages, runs, run steps)
//! is a [`ToolBox`]; a [`ToolSet`] aggregates them and [`McpServer`] answers
//! `initialize`, `ping`, `tools/list` and `tools/call` over one of the
//! [`transport`]s.
//!
//! ```rust,no_run
//! use mcp_ox::{CredentialMode, CredentialResolver, McpServer, ServerInfo, transport};
//! use secrecy::SecretString;
//!
//! # async fn example() -> Result<(), mcp_ox::transport::TransportError> {
//! let credentials = CredentialResolver::new(
//!     CredentialMode::Static,
//!     SecretString::from("sk-..."),
//!     assistants_ox::DEFAULT_BASE_URL,
//! );
//! let server = McpServer::assistants(ServerInfo::new("openai-assistant-mcp", "0.1.0"), credentials);
//! transport::serve_stdio(&server).await?;
//! # Ok(())
//! # }
//! ```

pub mod credentials;
pub mod error;
pub mod protocol;
pub mod server;
pub mod tool;
pub mod tools;
pub mod transport;

pub use credentials::{API_KEY_HEADER, CredentialError, CredentialMode, CredentialResolver, RequestContext};
pub use error::ToolError;
pub use protocol::{PROTOCOL_VERSION, RpcError, ServerInfo, ToolDefinition};
pub use server::McpServer;
pub use tool::{ToolBox, ToolCall, ToolContext, ToolSet};
pub use tools::assistants_toolset;
pub use transport::{Transport, TransportError};
