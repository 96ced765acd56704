//! Response definitions
//!
//! Represents responses to clients.

use std::fmt;

use super::Verb;

/// A response to send to a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// PUT or DELETE applied
    Ok,

    /// GET hit
    Value(String),

    /// GET miss
    NotFound,

    /// Too few arguments for the verb
    Usage(Verb),

    /// Unrecognized verb
    InvalidCommand,
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok => f.write_str("Operation successful."),
            Response::Value(value) => f.write_str(value),
            Response::NotFound => f.write_str("No record found."),
            Response::Usage(Verb::Put) => f.write_str("Sample Usage: PUT <key> <value>"),
            Response::Usage(verb) => write!(f, "Sample Usage: {} <key>", verb),
            Response::InvalidCommand => f.write_str("Invalid Command."),
        }
    }
}
