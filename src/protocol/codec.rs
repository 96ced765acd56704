//! Protocol codec
//!
//! Framing helpers for the two transports. Payloads are decoded as UTF-8
//! lossily, so arbitrary bytes never fail a read.

use std::io::{BufRead, Write};

use crate::error::Result;
use super::Response;

// =============================================================================
// Stream framing
// =============================================================================

/// Read one `\n`-terminated line, without its terminator
///
/// Returns `Ok(None)` at end of stream. A final line without a trailing
/// newline is still returned. A `\r` before the newline is dropped.
pub fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut buf = Vec::new();
    let read = reader.read_until(b'\n', &mut buf)?;
    if read == 0 {
        return Ok(None);
    }

    Ok(Some(decode_text(strip_terminator(&buf))))
}

/// Write a response as a single line and flush immediately
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    write_line(writer, &response.to_string())
}

/// Write raw text as a single line and flush immediately
pub fn write_line<W: Write>(writer: &mut W, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Datagram framing
// =============================================================================

/// Decode a packet payload into one request line
///
/// A single trailing line terminator is dropped so `echo`-style senders
/// behave like the console client.
pub fn decode_datagram(payload: &[u8]) -> String {
    decode_text(strip_terminator(payload))
}

/// Encode a response as a whole packet payload (no terminator)
pub fn encode_datagram(response: &Response) -> Vec<u8> {
    response.to_string().into_bytes()
}

// =============================================================================
// Helpers
// =============================================================================

fn strip_terminator(bytes: &[u8]) -> &[u8] {
    match bytes.strip_suffix(b"\n") {
        Some(line) => line.strip_suffix(b"\r").unwrap_or(line),
        None => bytes,
    }
}

fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
