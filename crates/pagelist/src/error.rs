//! Error types for paged list operations.

use thiserror::Error;

/// Errors that can occur during paged list operations.
#[derive(Debug, Error)]
pub enum ListError {
    /// The underlying state store failed a get or put.
    #[error("store error: {0}")]
    Store(#[from] pagelist_store::StoreError),

    /// A page or metadata record could not be serialized.
    #[error("encode failed [key:{key}]: {reason}")]
    Encode { key: String, reason: String },

    /// Stored bytes could not be parsed as a page or metadata record.
    #[error("decode failed [key:{key}]: {reason}")]
    Decode { key: String, reason: String },

    /// A caller-supplied argument violates a precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The index or range falls outside `[0, len)`.
    #[error("index out of range: {index} (len {len})")]
    IndexOutOfRange { index: u64, len: u64 },

    /// The page number is past the list's last page.
    #[error("page not found: {page} (last page {last_page})")]
    PageNotFound { page: u64, last_page: u64 },

    /// Metadata and stored pages disagree.
    #[error("data inconsistency [key:{key}]: {reason}")]
    DataInconsistency { key: String, reason: String },
}

impl ListError {
    /// Returns `true` for [`ListError::IndexOutOfRange`].
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }

    /// Returns `true` for [`ListError::PageNotFound`].
    pub fn is_page_not_found(&self) -> bool {
        matches!(self, Self::PageNotFound { .. })
    }

    /// Returns `true` for [`ListError::DataInconsistency`].
    pub fn is_data_inconsistency(&self) -> bool {
        matches!(self, Self::DataInconsistency { .. })
    }
}

/// Convenience type alias for paged list operations.
pub type ListResult<T> = std::result::Result<T, ListError>;
