//! # TwinKV
//!
//! A minimal in-memory key-value store served identically over two
//! transports:
//! - TCP: one worker thread per connection, newline-delimited requests
//! - UDP: a single receive loop, one request per packet
//! - Three-verb text protocol: `PUT`, `GET`, `DELETE`
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────┐      ┌──────────────────────────┐
//! │       Stream Server      │      │     Datagram Server      │
//! │  (thread per connection) │      │   (single recv loop)     │
//! └────────────┬─────────────┘      └────────────┬─────────────┘
//!              │   line                 packet   │
//!              └───────────────┬─────────────────┘
//!                              │
//!               ┌──────────────▼──────────────┐
//!               │         Dispatcher          │
//!               │ (arity check, verb routing) │
//!               └──────────────┬──────────────┘
//!                              │
//!                       ┌──────▼──────┐
//!                       │    Store    │
//!                       │  (RwLock)   │
//!                       └─────────────┘
//! ```
//!
//! Every request and response line is also handed to an [`audit::AuditSink`].

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod logging;

pub mod store;
pub mod protocol;
pub mod dispatcher;
pub mod audit;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::{ClientConfig, ServerConfig};
pub use dispatcher::Dispatcher;
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of TwinKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
