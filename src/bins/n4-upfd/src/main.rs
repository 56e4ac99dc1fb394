//! N4 UPF daemon entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::net::IpAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use n4_upfd::{N4Handler, PfcpServer, SessionStore, UpfConfig};

/// N4 UPF - PFCP endpoint of the User Plane Function
#[derive(Parser, Debug)]
#[command(name = "n4-upfd")]
#[command(author = "NextGCore")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Minimal UPF N4 (PFCP) endpoint", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, default_value = "etc/upf.yaml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'e', long, default_value = "info")]
    log_level: String,

    /// Disable color output
    #[arg(short = 'm', long)]
    no_color: bool,

    /// PFCP bind address (overrides pfcp.bind)
    #[arg(long)]
    pfcp_addr: Option<IpAddr>,

    /// PFCP port (overrides pfcp.port)
    #[arg(long)]
    pfcp_port: Option<u16>,

    /// Node ID address advertised to peers (overrides pfcp.node_ip)
    #[arg(long)]
    node_ip: Option<IpAddr>,
}

impl Args {
    fn apply_overrides(&self, config: &mut UpfConfig) {
        if let Some(addr) = self.pfcp_addr {
            config.pfcp.bind = addr;
        }
        if let Some(port) = self.pfcp_port {
            config.pfcp.port = port;
        }
        if let Some(ip) = self.node_ip {
            config.pfcp.node_ip = ip;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args)?;

    log::info!("N4 UPF v{} starting...", env!("CARGO_PKG_VERSION"));

    let shutdown = Arc::new(AtomicBool::new(false));
    setup_signal_handlers(shutdown.clone())?;

    let mut config = UpfConfig::load(Path::new(&args.config))
        .with_context(|| format!("Failed to load configuration from {}", args.config))?;
    args.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    let node_id = config.pfcp.node_id();
    log::info!("PFCP Node ID {:?}", node_id);

    let handler = N4Handler::new(node_id, SessionStore::new());
    let mut server = PfcpServer::bind(config.pfcp.bind_addr(), handler, shutdown)
        .await
        .context("Failed to create PFCP server")?;

    log::info!("N4 UPF ready");
    server.run().await.context("PFCP server error")?;

    log::info!(
        "N4 UPF terminated ({} sessions established)",
        server.handler().sessions().len()
    );
    Ok(())
}

/// Initialize logging
fn init_logging(args: &Args) -> Result<()> {
    let mut builder = env_logger::Builder::new();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };
    builder.filter_level(level);
    builder.format_timestamp_millis();

    if args.no_color {
        builder.write_style(env_logger::WriteStyle::Never);
    }

    builder.try_init().context("Failed to initialize logger")?;

    Ok(())
}

/// Set up signal handlers for graceful shutdown
fn setup_signal_handlers(shutdown: Arc<AtomicBool>) -> Result<()> {
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        shutdown.store(true, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;

    Ok(())
}
