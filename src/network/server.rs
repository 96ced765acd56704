//! TCP Server
//!
//! Accepts connections and hands each one to its own worker thread.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crate::audit::AuditSink;
use crate::config::ServerConfig;
use crate::dispatcher::Dispatcher;
use crate::error::{KvError, Result};
use super::{Connection, ShutdownHandle};

/// TCP server for TwinKV
///
/// ## Failure isolation
/// - Bind failure is fatal and surfaces from `bind`
/// - A failed `accept` is logged and the loop moves on
/// - A worker's I/O failure only ends that worker's connection
pub struct StreamServer {
    config: ServerConfig,
    listener: TcpListener,
    local_addr: SocketAddr,
    dispatcher: Arc<Dispatcher>,
    audit: Arc<dyn AuditSink>,
    shutdown: Arc<AtomicBool>,

    /// Number of live connection workers
    active: Arc<AtomicUsize>,
}

impl StreamServer {
    /// Bind the listener described by `config`
    pub fn bind(
        config: ServerConfig,
        dispatcher: Arc<Dispatcher>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self> {
        let addr = config.listen_addr()?;
        let listener =
            TcpListener::bind(addr).map_err(|source| KvError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            config,
            listener,
            local_addr,
            dispatcher,
            audit,
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Address the listener is actually bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle that stops `run` from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle::stream(Arc::clone(&self.shutdown), self.local_addr)
    }

    /// Number of connections currently being served
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Run the accept loop (blocking until shutdown)
    pub fn run(&self) -> Result<()> {
        tracing::info!("Server is listening on {} (tcp)", self.local_addr);

        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            match stream {
                Ok(stream) => self.accept(stream),
                Err(e) => tracing::warn!("Failed to accept connection: {}", e),
            }
        }

        tracing::info!("Stream server on {} stopped", self.local_addr);
        Ok(())
    }

    /// Spawn a worker for a freshly accepted connection
    fn accept(&self, stream: TcpStream) {
        let peer = match stream.peer_addr() {
            Ok(peer) => peer,
            Err(e) => {
                tracing::warn!("Dropping connection with unknown peer: {}", e);
                return;
            }
        };

        let Some(slot) = ConnectionSlot::acquire(&self.active, self.config.max_connections)
        else {
            tracing::warn!(
                "Connection limit ({}) reached, rejecting {}",
                self.config.max_connections,
                peer
            );
            return;
        };

        let dispatcher = Arc::clone(&self.dispatcher);
        let audit = Arc::clone(&self.audit);
        let read_timeout = self.config.read_timeout();
        let write_timeout = self.config.write_timeout();

        // Workers log through whatever subscriber the acceptor thread uses
        let log_dispatch = tracing::dispatcher::get_default(|current| current.clone());

        let spawned = thread::Builder::new()
            .name(format!("conn-{}", peer))
            .spawn(move || {
                let _slot = slot;
                tracing::dispatcher::with_default(&log_dispatch, || {
                    let result = Connection::new(stream, peer, dispatcher, audit)
                        .and_then(|mut conn| {
                            conn.set_timeouts(read_timeout, write_timeout)?;
                            conn.handle()
                        });
                    if let Err(e) = result {
                        tracing::warn!("Server exception on connection {}: {}", peer, e);
                    }
                });
            });

        if let Err(e) = spawned {
            tracing::warn!("Failed to spawn worker for {}: {}", peer, e);
        }
    }
}

/// Counts one live connection; released on drop
struct ConnectionSlot {
    active: Arc<AtomicUsize>,
}

impl ConnectionSlot {
    /// Reserve a slot unless `limit` (non-zero) is already reached
    fn acquire(active: &Arc<AtomicUsize>, limit: usize) -> Option<Self> {
        let reserved = active.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
            (limit == 0 || current < limit).then_some(current + 1)
        });

        reserved.ok().map(|_| Self {
            active: Arc::clone(active),
        })
    }
}

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
