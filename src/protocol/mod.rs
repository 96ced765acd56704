//! Protocol Module
//!
//! Defines the plain-text wire protocol shared by both transports.
//!
//! ## Request Format
//! ```text
//! <VERB> <arg0> [arg1...]
//! ```
//! The line is split on its first space into verb and rest, and the rest on
//! its first space again into at most two arguments. A PUT value therefore
//! keeps any spaces it contains; GET/DELETE keys end at the first space.
//!
//! Values must not contain line breaks. A datagram PUT can store one (the
//! whole packet is the request), but a stream client reading that value back
//! receives it as several response lines and loses sync with its requests.
//!
//! ## Verbs
//! - PUT    - args: key, value
//! - GET    - args: key
//! - DELETE - args: key
//!
//! ## Response Format
//! A single line of text (stream) or a single packet (datagram):
//! - `Operation successful.`
//! - the stored value
//! - `No record found.`
//! - `Sample Usage: <VERB> ...`
//! - `Invalid Command.`
//!
//! ## Framing
//! - Stream: one request per `\n`-terminated line, one response line back
//! - Datagram: one request per packet, one response packet back

mod command;
mod response;
mod codec;

pub use command::{Request, Verb};
pub use response::Response;
pub use codec::{
    decode_datagram, encode_datagram, read_line, write_line, write_response,
};
