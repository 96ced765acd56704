//! Network Module
//!
//! Stream (TCP) and datagram (UDP) front ends over a shared dispatcher,
//! plus the client plumbing used by the console REPL.
//!
//! ## Architecture
//! - Stream: single acceptor thread, one worker thread per connection
//! - Datagram: one receive loop, one packet in, one packet out
//! - Both route commands through the same `Dispatcher`

mod server;
mod connection;
mod datagram;
mod shutdown;
mod client;

pub use server::StreamServer;
pub use connection::Connection;
pub use datagram::DatagramServer;
pub use shutdown::ShutdownHandle;
pub use client::{DatagramClient, StreamClient};
