use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::TransportError;
use crate::server::McpServer;

/// Serves the process's stdin/stdout until stdin is closed.
pub async fn serve_stdio(server: &McpServer) -> Result<(), TransportError> {
    tracing::info!("serving MCP over stdio");
    serve_lines(server, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

/// One JSON-RPC message per line in, one response per line out. Blank lines are skipped.
pub async fn serve_lines<R, W>(server: &McpServer, reader: R, mut writer: W) -> Result<(), TransportError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(response) = server.handle_raw(line, None).await {
            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
        }
    }

    tracing::info!("stdin closed");
    Ok(())
}
