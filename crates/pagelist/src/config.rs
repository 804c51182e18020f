use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::codec::Encoding;
use crate::error::{ListError, ListResult};

/// Page size used when none (or zero) is given.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Construction parameters for a [`PagedList`](crate::PagedList).
///
/// ```toml
/// page_size = 50
/// encoding = "json"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Maximum number of elements per page record.
    pub page_size: u64,
    /// Byte encoding for page and metadata records.
    pub encoding: Encoding,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            encoding: Encoding::Json,
        }
    }
}

impl ListConfig {
    /// Default configuration with the given page size.
    pub fn with_page_size(page_size: u64) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> ListResult<Self> {
        toml::from_str(s).map_err(|e| ListError::InvalidArgument(format!("list config: {e}")))
    }

    /// The page size actually used: zero falls back to [`DEFAULT_PAGE_SIZE`].
    pub fn effective_page_size(&self) -> u64 {
        if self.page_size == 0 {
            warn!(default = DEFAULT_PAGE_SIZE, "page size 0 is invalid, using default");
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }
}
