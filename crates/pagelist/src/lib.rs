//! Paged lists over a single-key state store.
//!
//! A [`PagedList`] is an append-only sequence of strings stored in a
//! [`StateStore`](pagelist_store::StateStore) that only offers `get` and
//! `put` on individual keys. Elements are grouped into fixed-size page
//! records, and one metadata record per list tracks the element count and
//! the highest page in use.
//!
//! # Architecture
//!
//! - **Key / index mapper** ([`keys`]) -- pure arithmetic from a logical
//!   index to a `(page, offset)` pair, and the derivation of storage keys.
//! - **Metadata manager** ([`meta`]) -- loads and saves [`ListMeta`].
//! - **Traversal engine** ([`list`]) -- append, point reads and lazy,
//!   page-by-page range walks, checking every page it reads against the
//!   metadata.
//!
//! # Invariants
//!
//! 1. `last_page_number == ceil(total_count / page_size)`, 0 for an empty list.
//! 2. Every page below the last holds exactly `page_size` elements.
//! 3. The last page holds `total_count - (last_page_number - 1) * page_size`
//!    committed elements.
//! 4. Any stored state that contradicts the metadata is reported as
//!    [`ListError::DataInconsistency`] and never repaired. The one exception
//!    is an uncommitted tail on the last page, left by an append whose
//!    metadata write failed: reads skip it and the next append overwrites
//!    it, each logging a warning.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pagelist::PagedList;
//! use pagelist_store::InMemoryStateStore;
//!
//! let list = PagedList::new("orders", 3, Arc::new(InMemoryStateStore::new()));
//! for v in ["a", "b", "c", "d"] {
//!     list.append(v).unwrap();
//! }
//! assert_eq!(list.len().unwrap(), 4);
//! assert_eq!(list.get_page(2).unwrap(), vec!["d"]);
//! assert_eq!(list.get(3).unwrap(), "d");
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod keys;
pub mod list;
pub mod meta;

pub use codec::Encoding;
pub use config::{ListConfig, DEFAULT_PAGE_SIZE};
pub use error::{ListError, ListResult};
pub use keys::{append_target, expected_page_len, locate, ListKeys, Position};
pub use list::{PagedList, RangeIter};
pub use meta::ListMeta;
