use std::sync::Arc;

use skin_picker_lib::config::{default_config_path, AppConfig};
use skin_picker_lib::logging::init_logging;
use skin_picker_lib::server::run_server;
use skin_picker_lib::ConnectorContext;

#[tokio::main]
async fn main() {
    let config_path = default_config_path();
    let config = match AppConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[Config] {}; using defaults", e);
            AppConfig::default()
        }
    };

    // Keep the guard for the whole run or the live log loses buffered lines
    let _log_guard = init_logging(&config.log_dir());
    tracing::info!("[Main] Config loaded from {}", config_path.display());

    let ctx = match ConnectorContext::new(config) {
        Ok(ctx) => Arc::new(ctx),
        Err(e) => {
            tracing::error!("[Main] Failed to initialize: {}", e);
            std::process::exit(1);
        }
    };

    let mut events = ctx.connect_with_retry();
    let watcher = ctx.clone();
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match watcher.get_current_player().await {
                Ok(player) => tracing::info!(
                    "[Main] Connection #{} ready, logged in as {}",
                    event.generation,
                    player.display_name
                ),
                Err(e) => tracing::info!(
                    "[Main] Connection #{} ready, player not available yet: {}",
                    event.generation,
                    e
                ),
            }
        }
    });

    let addr = ctx.config().listen_addr.clone();
    if let Err(e) = run_server(ctx.clone(), &addr).await {
        tracing::error!("[Main] HTTP server stopped: {}", e);
    }
    ctx.disconnect();
}
