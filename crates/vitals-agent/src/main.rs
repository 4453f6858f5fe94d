//! vitals-agent — local host monitoring agent.
//!
//! Wires the explicit process context together: configuration, the sample
//! store, the system collector, the sampling loop, and the HTTP server.
//! There are no ambient singletons; everything is constructed here and
//! passed down.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use vitals_core::{SampleStore, Sampler, SystemCollector};

#[derive(Parser)]
#[command(name = "vitals-agent")]
#[command(about = "Local host monitoring agent — CPU/RAM/GPU samples over HTTP")]
#[command(version = vitals_core::VERSION)]
struct Cli {
    /// Address to bind the HTTP server on.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port for the HTTP server.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Seconds between metric collections.
    #[arg(long, env = "INTERVAL_SEC", default_value_t = 30,
          value_parser = clap::value_parser!(u64).range(1..))]
    interval_sec: u64,

    /// Number of samples retained in the in-memory history buffer.
    #[arg(long, env = "HISTORY_SIZE", default_value_t = 720,
          value_parser = clap::value_parser!(u64).range(1..))]
    history_size: u64,
}

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    log::info!(
        "starting vitals-agent v{}: port={} interval={}s history={}",
        vitals_core::VERSION,
        cli.port,
        cli.interval_sec,
        cli.history_size
    );

    let store = Arc::new(SampleStore::new(cli.history_size as usize));

    let collector = SystemCollector::new();
    match collector.gpu_vendor() {
        Some(vendor) => log::info!("gpu backend detected: {vendor}"),
        None => log::info!("no gpu tooling found, samples will omit gpu metrics"),
    }

    let sampler = Sampler::spawn(
        Box::new(collector),
        Arc::clone(&store),
        Duration::from_secs(cli.interval_sec),
    );

    // Ctrl-C flips the watch flag; the server drains, then the sampler is
    // stopped below.
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    ctrlc::set_handler(move || {
        log::info!("shutdown requested");
        let _ = shutdown_tx.send(true);
    })
    .expect("failed to install ctrl-c handler");

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(vitals_server::run_server(
        Arc::clone(&store),
        cli.interval_sec,
        &cli.host,
        cli.port,
        async move {
            let mut shutdown_rx = shutdown_rx;
            let _ = shutdown_rx.wait_for(|stop| *stop).await;
        },
    ));

    sampler.stop();
    log::info!("vitals-agent stopped");
    result
}
