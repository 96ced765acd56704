//! Store Module
//!
//! The single authoritative key → value mapping.
//!
//! ## Responsibilities
//! - Upsert, lookup and remove-if-present on string keys
//! - Safe concurrent access from every stream worker
//!
//! ## Data Structure Choice
//! A `HashMap` behind a `parking_lot::RwLock`:
//! - Every operation holds the lock for its whole duration, so each call is
//!   atomic at single-key granularity and no reader sees a half-applied write
//! - Readers proceed in parallel, writers are serialized
//! - No ordering is needed (nothing iterates the table)

mod table;

pub use table::Store;
