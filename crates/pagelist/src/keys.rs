//! Storage key derivation and index arithmetic.
//!
//! Everything here is pure: no store access, no allocation beyond the key
//! strings themselves.
//!
//! Key layout for a list named `orders`:
//!
//! ```text
//! orders_meta      metadata record
//! orders_page_1    elements 0 .. page_size
//! orders_page_2    elements page_size .. 2*page_size
//! ```
//!
//! A metadata key always ends in `_meta` and a page key always ends in
//! `_page_<digits>`, so no key of one list can equal any key of another.
//! These formats must not change; stored lists depend on them.

use crate::meta::ListMeta;

/// Physical location of one logical index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    /// Page number, counting from 1.
    pub page: u64,
    /// Zero-based offset inside the page.
    pub offset: u64,
}

/// Key derivation for one list identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListKeys {
    identity: String,
}

impl ListKeys {
    /// Keys for the list named `identity`.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
        }
    }

    /// The list identity these keys derive from.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Key of the metadata record.
    pub fn meta_key(&self) -> String {
        format!("{}_meta", self.identity)
    }

    /// Key of page `page` (1-based).
    pub fn page_key(&self, page: u64) -> String {
        format!("{}_page_{}", self.identity, page)
    }
}

/// Map a logical index to its page and offset.
///
/// `page_size` must be non-zero.
pub fn locate(index: u64, page_size: u64) -> Position {
    Position {
        page: index / page_size + 1,
        offset: index % page_size,
    }
}

/// Page the next appended element belongs on.
///
/// The current last page while it has room, otherwise a fresh page. An empty
/// list yields page 1.
pub fn append_target(meta: &ListMeta, page_size: u64) -> u64 {
    if meta.total_count % page_size != 0 {
        meta.last_page_number
    } else {
        meta.last_page_number + 1
    }
}

/// Number of committed elements page `page` holds according to `meta`.
///
/// Full pages hold `page_size`, the last page holds the remainder, and any
/// page past the last holds nothing.
pub fn expected_page_len(meta: &ListMeta, page: u64, page_size: u64) -> u64 {
    if page == 0 || page > meta.last_page_number {
        0
    } else if page < meta.last_page_number {
        page_size
    } else {
        meta.total_count - (meta.last_page_number - 1) * page_size
    }
}
