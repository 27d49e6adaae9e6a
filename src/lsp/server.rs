use tokio::io::{AsyncRead, AsyncWrite};
use tower_lsp::{LspService, Server};
use tracing::info;

use crate::log::init;
use crate::lsp::backend::Backend;

/// Serves one LSP session on stdin/stdout with file logging enabled.
pub async fn run_server() -> anyhow::Result<()> {
    let _log_guard = init()?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting plaintext-lsp");
    serve(tokio::io::stdin(), tokio::io::stdout()).await;
    info!("plaintext-lsp stopped");

    Ok(())
}

/// Runs a session over an arbitrary byte stream until the input closes or
/// the editor sends `exit`.
pub async fn serve<I, O>(input: I, output: O)
where
    I: AsyncRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let (service, socket) = LspService::new(Backend::new);
    Server::new(input, output, socket).serve(service).await;
}
