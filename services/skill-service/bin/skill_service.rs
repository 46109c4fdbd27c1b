//! Main Entrypoint for the Calico Skill Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment and the command line.
//! 2. Initializing logging to stdout and the rotating log file.
//! 3. Loading the skill manifests into a registry.
//! 4. Connecting to the MQTT broker and dispatching messages until shutdown.

use anyhow::Context;
use calico_core::{Outbound, Router, SkillContext, loader::SkillLoader, settings::SettingsStore};
use calico_skill_service::{bus::MqttBus, check, config::Config, logging};
use clap::Parser;
use std::{path::PathBuf, sync::Arc};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "skill_service")]
#[command(about = "Routes Hermes intents to Calico skills", long_about = None)]
struct Cli {
    /// Skill manifest directory (overrides SKILLS_DIR)
    #[arg(long)]
    skills_dir: Option<PathBuf>,

    /// Load the skills, print what was registered and exit
    #[arg(long)]
    check: bool,
}

/// Listens for the `Ctrl+C` signal to gracefully shut down the service.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // --- 1. Load Configuration ---
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(dir) = cli.skills_dir {
        config.skills_dir = dir;
    }

    // --- 2. Initialize Logging ---
    let log_file = if cli.check { None } else { config.log_file.as_deref() };
    logging::init(config.log_level, log_file, config.log_max_lines)?;
    info!("Configuration loaded. Starting Calico Skill Service...");

    // --- 3. Load Skills ---
    let (bus, eventloop) = MqttBus::connect(&config);
    let context = SkillContext {
        outbound: Outbound::new(Arc::new(bus.clone())),
        settings: SettingsStore::new(config.settings_path.clone()),
    };
    let skills_dir = config.skills_dir.clone();
    // Skill constructors may build blocking HTTP clients.
    let report = tokio::task::spawn_blocking(move || {
        let catalog = calico_skills::catalog();
        SkillLoader::new(&catalog, &context).load_all(&skills_dir)
    })
    .await
    .context("Skill loading task failed")?;

    if cli.check {
        let (text, ok) = check::render(&report);
        print!("{text}");
        if !ok {
            anyhow::bail!("{} skill manifest(s) failed to load", report.failures.len());
        }
        return Ok(());
    }

    // --- 4. Run the Bus ---
    let router = Router::new(report.into_registry());
    info!(
        host = %config.mqtt_host,
        port = config.mqtt_port,
        client_id = %config.mqtt_client_id,
        "Connecting to MQTT broker..."
    );
    tokio::select! {
        _ = bus.run(eventloop, router, config.reconnect_delay) => {}
        _ = shutdown_signal() => {}
    }

    info!("Skill service has shut down.");
    Ok(())
}
