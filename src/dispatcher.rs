//! Dispatcher Module
//!
//! Routes decoded requests to the store.
//!
//! ## Responsibilities
//! - Validate arity before touching the store
//! - Map each verb onto its store operation
//! - Render every outcome (including misuse) as a `Response`
//!
//! The dispatcher owns the store; nothing else mutates it. It is shared by
//! reference (`Arc<Dispatcher>`) between stream workers and the datagram loop.

use crate::protocol::{Request, Response, Verb};
use crate::store::Store;

/// Command dispatcher over an owned store
///
/// ## Concurrency
/// `dispatch` takes `&self` and may be called from any number of threads.
/// Each store operation is atomic for its key, so concurrent requests appear
/// in some total order; there are no multi-key transactions.
#[derive(Debug, Default)]
pub struct Dispatcher {
    store: Store,
}

impl Dispatcher {
    /// Create a dispatcher over an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher over an existing store
    pub fn with_store(store: Store) -> Self {
        Self { store }
    }

    /// Execute a decoded request
    pub fn execute(&self, request: &Request) -> Response {
        self.dispatch(&request.verb, &request.args)
    }

    /// Execute a verb with its argument list
    ///
    /// Arity is checked first; an arity violation or unknown verb never
    /// reaches the store.
    pub fn dispatch<S: AsRef<str>>(&self, verb: &str, args: &[S]) -> Response {
        let Some(verb) = Verb::parse(verb) else {
            return Response::InvalidCommand;
        };

        if args.len() < verb.arity() {
            return Response::Usage(verb);
        }

        let key = args[0].as_ref();
        match verb {
            Verb::Put => {
                self.store.put(key, args[1].as_ref());
                Response::Ok
            }
            Verb::Get => match self.store.get(key) {
                Some(value) => Response::Value(value),
                None => Response::NotFound,
            },
            Verb::Delete => {
                self.store.delete(key);
                Response::Ok
            }
        }
    }

    /// The underlying store (for inspection)
    pub fn store(&self) -> &Store {
        &self.store
    }
}
