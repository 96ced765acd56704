//! Command definitions
//!
//! Represents requests from clients.

use std::fmt;

/// Recognized verbs (case-sensitive, exact match)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Put,
    Get,
    Delete,
}

impl Verb {
    /// Parse a verb token; `None` for anything unrecognized
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "PUT" => Some(Verb::Put),
            "GET" => Some(Verb::Get),
            "DELETE" => Some(Verb::Delete),
            _ => None,
        }
    }

    /// Minimum number of arguments the verb requires
    pub fn arity(self) -> usize {
        match self {
            Verb::Put => 2,
            Verb::Get | Verb::Delete => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Put => "PUT",
            Verb::Get => "GET",
            Verb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded request line: the verb token plus 0-2 argument tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Raw verb token (may be unrecognized)
    pub verb: String,

    /// Arguments in order; PUT's second argument is the rest of the line
    pub args: Vec<String>,
}

impl Request {
    /// Split a request line into verb and arguments
    ///
    /// Returns `None` only when the line has no tokens at all (it is empty).
    /// Empty segments are kept: `"GET "` yields one empty argument.
    pub fn parse(line: &str) -> Option<Self> {
        if line.is_empty() {
            return None;
        }

        let (verb, rest) = match line.split_once(' ') {
            Some((verb, rest)) => (verb, Some(rest)),
            None => (line, None),
        };

        let args = match rest {
            Some(rest) => rest.splitn(2, ' ').map(str::to_string).collect(),
            None => Vec::new(),
        };

        Some(Self {
            verb: verb.to_string(),
            args,
        })
    }

    /// The recognized verb, if any
    pub fn kind(&self) -> Option<Verb> {
        Verb::parse(&self.verb)
    }
}
