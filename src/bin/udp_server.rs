//! TwinKV UDP Server Binary
//!
//! Serves the store over UDP from a single receive loop.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use twinkv::audit::TracingAudit;
use twinkv::config::MAX_DATAGRAM_SIZE;
use twinkv::network::DatagramServer;
use twinkv::{Dispatcher, ServerConfig};

/// TwinKV UDP Server
#[derive(Parser, Debug)]
#[command(name = "twinkv-udp-server")]
#[command(about = "In-memory key-value store over UDP")]
#[command(version)]
struct Args {
    /// Port to listen on
    port: u16,

    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Receive buffer size in bytes; longer packets are truncated
    #[arg(short, long, default_value_t = MAX_DATAGRAM_SIZE)]
    buffer_size: usize,

    /// Also append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = twinkv::logging::init(args.log_file.as_deref()) {
        eprintln!("Failed to set up logger: {}", e);
        std::process::exit(1);
    }

    tracing::info!("TwinKV UDP Server v{}", twinkv::VERSION);

    let config = ServerConfig::builder()
        .host(args.host)
        .port(args.port)
        .datagram_buffer_size(args.buffer_size)
        .build();

    let dispatcher = Arc::new(Dispatcher::new());
    let server = match DatagramServer::bind(config, dispatcher, Arc::new(TracingAudit)) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Server exception: {}", e);
            std::process::exit(1);
        }
    };

    let handle = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, initiating shutdown...");
        handle.shutdown();
    }) {
        tracing::warn!("Failed to install Ctrl+C handler: {}", e);
    }

    if let Err(e) = server.run() {
        tracing::error!("Server exception: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
