use clap::Parser;

use plaintext_lsp::lsp::server::run_server;

/// Language server for plain text documents.
///
/// Speaks LSP over stdin/stdout.
#[derive(Debug, Parser)]
#[command(name = "plaintext-lsp", version, about)]
struct Cli {
    /// Use stdio transport (the default and only transport)
    #[arg(long)]
    stdio: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();
    run_server().await
}
