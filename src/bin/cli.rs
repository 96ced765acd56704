//! TwinKV CLI Client
//!
//! Interactive console for either server: each input line is sent verbatim
//! and the server's response is printed.

use std::io::{self, BufRead, Write};
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use twinkv::network::{DatagramClient, StreamClient};
use twinkv::{ClientConfig, Result};

/// TwinKV CLI
#[derive(Parser, Debug)]
#[command(name = "twinkv-cli")]
#[command(about = "Interactive client for the TwinKV TCP/UDP servers")]
#[command(version)]
struct Args {
    /// Server host name or address
    host: String,

    /// Server port
    port: u16,

    /// Talk to the UDP server instead of the TCP server
    #[arg(short, long)]
    udp: bool,

    /// How long to wait for each response (milliseconds)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    /// Also append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

enum Client {
    Stream(StreamClient),
    Datagram(DatagramClient),
}

impl Client {
    fn request(&mut self, line: &str) -> Result<String> {
        match self {
            Client::Stream(client) => client.request(line),
            Client::Datagram(client) => client.request(line),
        }
    }

    fn server_addr(&self) -> SocketAddr {
        match self {
            Client::Stream(client) => client.server_addr(),
            Client::Datagram(client) => client.server_addr(),
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = twinkv::logging::init(args.log_file.as_deref()) {
        eprintln!("Failed to set up logger: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        tracing::error!("I/O error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = ClientConfig {
        response_timeout_ms: args.timeout_ms,
    };
    let addr = (args.host.as_str(), args.port);

    let mut client = if args.udp {
        Client::Datagram(DatagramClient::connect(addr, &config)?)
    } else {
        Client::Stream(StreamClient::connect(addr, &config)?)
    };

    tracing::info!(
        "Connected to {} ({})",
        client.server_addr(),
        if args.udp { "udp" } else { "tcp" }
    );

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    loop {
        write!(stdout, "Enter command: ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);

        if line.eq_ignore_ascii_case("exit") {
            break;
        }

        match client.request(line) {
            Ok(response) => writeln!(stdout, "Server response: {}", response)?,
            Err(e) => tracing::warn!("{}", e),
        }
    }

    Ok(())
}
