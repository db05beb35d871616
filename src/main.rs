use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use brandgate::config::{self, AppState, Config};
use brandgate::{logger, server};

/// Branding front door for dashboard deployments
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file (extension optional)
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = Config::load_from(&cli.config)
        .with_context(|| format!("loading configuration from '{}'", cli.config))?;

    if cli.check {
        println!("configuration OK");
        return Ok(());
    }

    logger::init(&cfg.logging)?;

    // Worker count defaults to the number of CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> anyhow::Result<()> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)
        .with_context(|| format!("binding {addr}"))?;

    logger::log_server_start(&addr, &cfg);
    let state = Arc::new(AppState::new(cfg)?);

    server::serve(listener, state, server::signal::shutdown_signal()).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}
