//! Persistent per-list update records (SQLite via sqlx).
//!
//! Stores the checksum of the last installed content plus title, rule count
//! and header metadata for each filter list id. The update pipeline never
//! touches this; the task adapter reads the stored checksum before a cycle
//! and writes the record after an `Updated` decision.

pub mod db;
pub mod types;

pub use db::*;
pub use types::*;
