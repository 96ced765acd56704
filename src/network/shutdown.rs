//! Shutdown signalling
//!
//! Both server loops block (in `accept` / `recv_from`), so stopping them means
//! raising a flag and then poking the socket once so the loop wakes up and
//! sees it.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const WAKE_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
enum Transport {
    Stream,
    Datagram,
}

/// Cloneable handle that stops a running server loop
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    addr: SocketAddr,
    transport: Transport,
}

impl ShutdownHandle {
    pub(crate) fn stream(flag: Arc<AtomicBool>, addr: SocketAddr) -> Self {
        Self { flag, addr, transport: Transport::Stream }
    }

    pub(crate) fn datagram(flag: Arc<AtomicBool>, addr: SocketAddr) -> Self {
        Self { flag, addr, transport: Transport::Datagram }
    }

    /// Ask the loop to stop; idempotent
    ///
    /// Stream workers that are already running are not interrupted.
    pub fn shutdown(&self) {
        if self.flag.swap(true, Ordering::SeqCst) {
            return;
        }

        let target = wake_addr(self.addr);
        let woke = match self.transport {
            Transport::Stream => TcpStream::connect_timeout(&target, WAKE_TIMEOUT).map(drop),
            Transport::Datagram => {
                let local = match target {
                    SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
                    SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
                };
                UdpSocket::bind(local).and_then(|socket| socket.send_to(&[], target)).map(drop)
            }
        };

        if let Err(e) = woke {
            tracing::debug!("Failed to wake server loop on {}: {}", target, e);
        }
    }

    /// Whether shutdown has been requested
    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// A wildcard bind address is not connectable; use loopback instead
fn wake_addr(addr: SocketAddr) -> SocketAddr {
    match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), addr.port())
        }
        IpAddr::V6(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), addr.port())
        }
        _ => addr,
    }
}
