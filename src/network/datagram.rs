//! UDP Server
//!
//! A single receive loop: one packet in, one dispatch, one packet back to
//! the sender. No per-client state and no internal concurrency.

use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::audit::{AuditSink, Direction};
use crate::config::ServerConfig;
use crate::dispatcher::Dispatcher;
use crate::error::{KvError, Result};
use crate::protocol::{decode_datagram, encode_datagram, Request};
use super::ShutdownHandle;

/// UDP server for TwinKV
///
/// ## Failure isolation
/// Nothing a single packet does can end the loop:
/// - an empty payload is logged as malformed and gets no reply
/// - a failed receive or send is logged and the loop continues
pub struct DatagramServer {
    config: ServerConfig,
    socket: UdpSocket,
    local_addr: SocketAddr,
    dispatcher: Arc<Dispatcher>,
    audit: Arc<dyn AuditSink>,
    shutdown: Arc<AtomicBool>,
}

impl DatagramServer {
    /// Bind the socket described by `config`
    pub fn bind(
        config: ServerConfig,
        dispatcher: Arc<Dispatcher>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self> {
        let addr = config.listen_addr()?;
        let socket = UdpSocket::bind(addr).map_err(|source| KvError::Bind { addr, source })?;
        let local_addr = socket.local_addr()?;

        Ok(Self {
            config,
            socket,
            local_addr,
            dispatcher,
            audit,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address the socket is actually bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle that stops `run` from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle::datagram(Arc::clone(&self.shutdown), self.local_addr)
    }

    /// Run the receive loop (blocking until shutdown)
    pub fn run(&self) -> Result<()> {
        tracing::info!("Server is listening on {} (udp)", self.local_addr);

        let mut buf = vec![0u8; self.config.datagram_buffer_size];

        loop {
            let received = self.socket.recv_from(&mut buf);

            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            match received {
                Ok((len, peer)) => self.handle_packet(&buf[..len], peer),
                Err(e) => tracing::warn!("Server exception while receiving: {}", e),
            }
        }

        tracing::info!("Datagram server on {} stopped", self.local_addr);
        Ok(())
    }

    /// Process one packet and reply to its origin
    fn handle_packet(&self, payload: &[u8], peer: SocketAddr) {
        let line = decode_datagram(payload);
        self.audit.record(Direction::Request, peer, &line);

        let Some(request) = Request::parse(&line) else {
            tracing::warn!(
                "Received malformed request of length {} from {}",
                payload.len(),
                peer
            );
            return;
        };

        let response = self.dispatcher.execute(&request);
        self.audit.record(Direction::Response, peer, &response.to_string());

        if let Err(e) = self.socket.send_to(&encode_datagram(&response), peer) {
            tracing::warn!("Server exception while replying to {}: {}", peer, e);
        }
    }
}
