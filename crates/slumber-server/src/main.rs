mod config;
mod console;
mod host;
mod permissions;
mod persistence;
mod plugin_manager;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use config::ServerConfig;
use host::Host;
use permissions::PermissionManager;
use plugin_manager::PluginManager;
use slumber_plugin::SleepPlugin;
use tokio::io::AsyncBufReadExt;
use tracing::info;

#[tokio::main]
async fn main() {
    let config = match ServerConfig::load("server.toml") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load server.toml: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Slumber server v{} starting", env!("CARGO_PKG_VERSION"));
    info!("MOTD: {}", config.server.motd);
    info!(
        "Worlds: {} (default gamemode: {})",
        config.worlds.names.join(", "),
        config.server.gamemode
    );

    let plugins_dir = PathBuf::from(&config.plugins.directory);
    let mut plugin_manager = PluginManager::new(&plugins_dir);
    let data_dir = plugin_manager.plugin_dir(slumber_plugin::PLUGIN_NAME);
    plugin_manager.register(Box::new(SleepPlugin::new(data_dir)));
    plugin_manager.load_configs();

    let permissions = PermissionManager::load("ops.json", &config.permissions);
    let mut host = Host::new(&config, plugin_manager, permissions);
    host.enable_plugins();

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);

    // Handle Ctrl+C
    let shutdown_tx_ctrlc = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutdown signal received");
        let _ = shutdown_tx_ctrlc.send(true);
    });

    // Console REPL: read lines from stdin
    let (console_tx, mut console_rx) = tokio::sync::mpsc::channel::<String>(32);
    tokio::spawn(async move {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim().to_string();
            if !line.is_empty() && console_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    info!("Ready. Type 'help' for console commands.");
    let mut tick_interval = tokio::time::interval(Duration::from_millis(50));
    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                host.game_tick();
            }
            Some(line) = console_rx.recv() => {
                if host.handle_console_command(&line) {
                    break;
                }
            }
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    info!("Saving worlds before shutdown...");
    host.shutdown();
    info!("Server shut down after {} ticks.", host.current_tick());
}
