//! Connection Handler
//!
//! Serves one client connection: read a line, dispatch, write the response
//! line, repeat until the peer goes away.

use std::io::{self, BufReader, BufWriter};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use crate::audit::{AuditSink, Direction};
use crate::dispatcher::Dispatcher;
use crate::error::{KvError, Result};
use crate::protocol::{read_line, write_response, Request, Response};

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer, flushed after every response
    writer: BufWriter<TcpStream>,

    dispatcher: Arc<Dispatcher>,
    audit: Arc<dyn AuditSink>,

    /// Peer address for logging
    peer: SocketAddr,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        dispatcher: Arc<Dispatcher>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self> {
        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            dispatcher,
            audit,
            peer,
        })
    }

    /// Configure connection timeouts (`None` blocks indefinitely)
    pub fn set_timeouts(&mut self, read: Option<Duration>, write: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(read)?;
        self.writer.get_ref().set_write_timeout(write)?;
        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Returns `Ok` when the peer closes, disconnects abruptly, or idles past
    /// the read timeout (the last two are logged as warnings); any other I/O
    /// failure is returned to the caller.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer);

        loop {
            let line = match read_line(&mut self.reader) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    tracing::debug!("Client {} disconnected", self.peer);
                    return Ok(());
                }
                Err(KvError::Io(ref e)) if is_timeout(e) => {
                    tracing::warn!("Read timeout for client {}, closing", self.peer);
                    return Ok(());
                }
                Err(KvError::Io(ref e)) if is_disconnect(e) => {
                    tracing::warn!("Server exception on connection {}: {}", self.peer, e);
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            let response = self.execute_line(&line);

            if let Err(e) = write_response(&mut self.writer, &response) {
                if let KvError::Io(ref io_err) = e {
                    if is_disconnect(io_err) {
                        tracing::warn!(
                            "Server exception on connection {} while sending response: {}",
                            self.peer,
                            e
                        );
                        return Ok(());
                    }
                }
                return Err(e);
            }
        }
    }

    /// Dispatch one request line, auditing both directions
    fn execute_line(&self, line: &str) -> Response {
        self.audit.record(Direction::Request, self.peer, line);

        // An empty line has no verb token at all
        let response = match Request::parse(line) {
            Some(request) => self.dispatcher.execute(&request),
            None => Response::InvalidCommand,
        };

        self.audit.record(Direction::Response, self.peer, &response.to_string());
        response
    }
}

fn is_timeout(e: &io::Error) -> bool {
    // Unix reports WouldBlock, Windows TimedOut
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof
    )
}
