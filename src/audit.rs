//! Audit Module
//!
//! Records every request and response line together with the peer it was
//! exchanged with. Sinks are infallible from the caller's side: a failing
//! sink never affects dispatch.

use std::fmt;
use std::net::SocketAddr;

use crossbeam::channel::{self, Receiver, Sender};

/// Which way a line travelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Client → server
    Request,
    /// Server → client
    Response,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Request => f.write_str("Received from"),
            Direction::Response => f.write_str("Response to"),
        }
    }
}

/// Destination for audit lines
pub trait AuditSink: Send + Sync {
    fn record(&self, direction: Direction, peer: SocketAddr, text: &str);
}

/// Emits audit lines as `tracing` events on target `twinkv::audit`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAudit;

impl AuditSink for TracingAudit {
    fn record(&self, direction: Direction, peer: SocketAddr, text: &str) {
        tracing::info!(target: "twinkv::audit", "{} {} - {}", direction, peer, text);
    }
}

/// A recorded audit line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub direction: Direction,
    pub peer: SocketAddr,
    pub text: String,
}

/// Forwards audit lines over an unbounded channel
///
/// Once the receiver is dropped, events are discarded silently.
#[derive(Debug, Clone)]
pub struct ChannelAudit {
    sender: Sender<AuditEvent>,
}

impl ChannelAudit {
    /// Create a sink and the receiving end of its channel
    pub fn new() -> (Self, Receiver<AuditEvent>) {
        let (sender, receiver) = channel::unbounded();
        (Self { sender }, receiver)
    }
}

impl AuditSink for ChannelAudit {
    fn record(&self, direction: Direction, peer: SocketAddr, text: &str) {
        let _ = self.sender.send(AuditEvent {
            direction,
            peer,
            text: text.to_string(),
        });
    }
}
