//! TwinKV TCP Server Binary
//!
//! Serves the store over TCP, one thread per connection.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use twinkv::audit::TracingAudit;
use twinkv::network::StreamServer;
use twinkv::{Dispatcher, ServerConfig};

/// TwinKV TCP Server
#[derive(Parser, Debug)]
#[command(name = "twinkv-tcp-server")]
#[command(about = "In-memory key-value store over TCP")]
#[command(version)]
struct Args {
    /// Port to listen on
    port: u16,

    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Maximum concurrent connections (0 = unbounded)
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Close connections idle for this long (milliseconds, 0 = never)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Close connections whose response writes block this long (milliseconds, 0 = never)
    #[arg(long, default_value = "0")]
    write_timeout_ms: u64,

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

    tracing::info!("TwinKV TCP Server v{}", twinkv::VERSION);

    let config = ServerConfig::builder()
        .host(args.host)
        .port(args.port)
        .max_connections(args.max_connections)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    let dispatcher = Arc::new(Dispatcher::new());
    let server = match StreamServer::bind(config, dispatcher, Arc::new(TracingAudit)) {
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
