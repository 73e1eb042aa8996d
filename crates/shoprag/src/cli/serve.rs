//! Serve command handler.

use super::resolve_config_path;
use shoprag_core::init_tracing;
use shoprag_server::{Settings, serve};
use std::path::PathBuf;

/// Loads settings, installs logging and serves until Ctrl-C.
pub async fn handle_serve_command(config: Option<PathBuf>) -> anyhow::Result<()> {
    let config = resolve_config_path(config);
    let settings = Settings::load(config.as_deref())?;
    init_tracing(settings.log_format).map_err(anyhow::Error::msg)?;

    tracing::info!(
        config = ?config,
        model = %settings.llm.model,
        "Starting OnlineShopRAG server"
    );
    serve(settings).await?;
    Ok(())
}
