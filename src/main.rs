use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use uikit_mcp::registry::Registry;
use uikit_mcp::server::McpServer;
use uikit_mcp::tools::register_all_tools;
use uikit_mcp::types::McpResult;

/// MCP server exposing full-text search over UI development docs
#[derive(Parser, Debug)]
#[command(name = "uikit-server", version, about)]
struct Cli {
    /// Data directory (defaults to $UIKIT_DATA_DIR, then ./data)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Clear and reload every collection from its seed file
    #[arg(long)]
    force_resync: bool,
}

fn main() -> McpResult<()> {
    // stdout is the protocol channel; all diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let data_dir = Registry::resolve_data_dir(cli.data_dir);
    tracing::info!(data_dir = %data_dir.display(), "opening registry");

    let registry = Arc::new(Registry::open(&data_dir)?);
    let report = registry.sync_seed_data(cli.force_resync)?;
    tracing::info!(
        knowledge = report.knowledge.total,
        examples = report.examples.total,
        components = report.components.total,
        "collections ready"
    );

    let mut server = McpServer::default();
    register_all_tools(&mut server, registry);
    server.run()
}
