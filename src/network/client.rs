//! Client plumbing
//!
//! Send one request line, wait for one response, over either transport.

use std::io::{self, BufReader, BufWriter};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream, ToSocketAddrs, UdpSocket};

use crate::config::{ClientConfig, MAX_DATAGRAM_SIZE};
use crate::error::{KvError, Result};
use crate::protocol::{read_line, write_line};

/// Line-oriented TCP client
pub struct StreamClient {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
    server: SocketAddr,
}

impl StreamClient {
    /// Connect to a stream server
    pub fn connect(addr: impl ToSocketAddrs, config: &ClientConfig) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        stream.set_read_timeout(config.response_timeout())?;
        let server = stream.peer_addr()?;

        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: BufWriter::new(stream),
            server,
        })
    }

    /// Send one request line and wait for its response line
    pub fn request(&mut self, line: &str) -> Result<String> {
        write_line(&mut self.writer, line)?;

        match read_line(&mut self.reader) {
            Ok(Some(response)) => Ok(response),
            Ok(None) => Err(KvError::Network(format!("Server {} closed the connection", self.server))),
            Err(KvError::Io(ref e)) if is_timeout(e) => Err(no_response(line)),
            Err(e) => Err(e),
        }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server
    }
}

/// Packet-oriented UDP client
pub struct DatagramClient {
    socket: UdpSocket,
    server: SocketAddr,
    buf: Vec<u8>,
}

impl DatagramClient {
    /// Bind an ephemeral local socket aimed at a datagram server
    pub fn connect(addr: impl ToSocketAddrs, config: &ClientConfig) -> Result<Self> {
        let server = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| KvError::Config("No address resolved for server".to_string()))?;

        let local = match server.ip() {
            IpAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            IpAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };

        let socket = UdpSocket::bind(local)?;
        socket.connect(server)?;
        socket.set_read_timeout(config.response_timeout())?;

        Ok(Self {
            socket,
            server,
            buf: vec![0u8; MAX_DATAGRAM_SIZE],
        })
    }

    /// Send one request packet and wait for the response packet
    ///
    /// Nothing is retried; a lost packet surfaces as a `Network` error.
    pub fn request(&mut self, line: &str) -> Result<String> {
        self.socket.send(line.as_bytes())?;

        match self.socket.recv(&mut self.buf) {
            Ok(len) => Ok(String::from_utf8_lossy(&self.buf[..len]).into_owned()),
            Err(ref e) if is_timeout(e) => Err(no_response(line)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server
    }
}

fn no_response(line: &str) -> KvError {
    KvError::Network(format!("No response from server for command: {}", line))
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}
