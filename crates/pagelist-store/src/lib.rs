//! Minimal key-value state interface for paged lists.
//!
//! The paged list core never talks to a database directly. It consumes a
//! [`StateStore`], which offers exactly two operations: read one key and
//! write one key. There is no delete, no scan and no multi-key transaction;
//! this mirrors the state API available to smart-contract code.
//!
//! # Storage Backends
//!
//! - [`InMemoryStateStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileStateStore`] -- whole-keyspace JSON snapshot on disk, used by the CLI
//!
//! # Design Rules
//!
//! 1. A key that was never written reads as `None`, not as an error.
//! 2. The store never interprets values -- it is a pure key-value store.
//! 3. Durability and atomicity across several puts are the backend's business.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use file::FileStateStore;
pub use memory::InMemoryStateStore;
pub use traits::StateStore;
