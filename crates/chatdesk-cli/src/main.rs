use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use chatdesk_application::SessionDashboard;
use chatdesk_core::config::{IdSource, PageConfig};
use chatdesk_core::navigation::Location;
use chatdesk_infrastructure::{ConfigService, HttpConversationSource, InMemoryHistory};

mod commands;
mod logging;
mod repl;

#[derive(Parser)]
#[command(name = "chatdesk")]
#[command(about = "chatdesk - browse backend conversations from the terminal", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Conversation backend base URL, e.g. http://localhost:8000/api
    #[arg(long)]
    backend_url: Option<String>,

    /// Page variant: `path` (/chat/{id}) or `query` (/dashboard?chat={id})
    #[arg(long)]
    page: Option<IdSource>,

    /// Initial location, e.g. /chat/abc
    #[arg(long)]
    location: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match &cli.config {
        Some(path) => ConfigService::new(path),
        None => ConfigService::new_default()?,
    };
    let mut config = config_service.get_config()?;
    if let Some(url) = cli.backend_url {
        config.backend.base_url = url;
    }
    if let Some(source) = cli.page {
        config.page = PageConfig::for_source(source);
    }

    let _log_guard = logging::init(&config.logging);
    tracing::info!(
        "[chatdesk] Starting: backend={}, page={}",
        config.backend.base_url,
        config.page.id_source
    );

    let source = Arc::new(HttpConversationSource::new(&config.backend)?);
    let initial = cli
        .location
        .map(Location::new)
        .unwrap_or_else(|| Location::new(config.page.base_path.clone()));
    let history = Arc::new(InMemoryHistory::new(initial));
    let dashboard = SessionDashboard::new(source, history.clone(), config.page)?;

    repl::run(dashboard, history).await
}
