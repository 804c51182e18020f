//! The per-list metadata record.

use pagelist_store::StateStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::Encoding;
use crate::error::{ListError, ListResult};

/// Element count and highest allocated page of one list.
///
/// A list that was never written has the zero value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    /// Highest page number in use, 0 for an empty list.
    pub last_page_number: u64,
    /// Number of elements in the list.
    pub total_count: u64,
}

impl ListMeta {
    /// Returns `true` if the list holds no elements.
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Checks `last_page_number == ceil(total_count / page_size)`.
    pub fn is_consistent(&self, page_size: u64) -> bool {
        self.last_page_number == self.total_count.div_ceil(page_size)
    }
}

/// Read the metadata record stored under `key`.
///
/// An absent or empty value is the zero record. A record that violates the
/// page-count invariant for `page_size` is a data inconsistency.
pub(crate) fn load_meta(
    store: &dyn StateStore,
    key: &str,
    encoding: Encoding,
    page_size: u64,
) -> ListResult<ListMeta> {
    let meta = match store.get_state(key)? {
        Some(bytes) if !bytes.is_empty() => encoding.decode_meta(key, &bytes)?,
        _ => ListMeta::default(),
    };
    if !meta.is_consistent(page_size) {
        return Err(ListError::DataInconsistency {
            key: key.to_string(),
            reason: format!(
                "metadata claims {} elements on {} pages with page size {}",
                meta.total_count, meta.last_page_number, page_size
            ),
        });
    }
    Ok(meta)
}

/// Serialize `meta` and write it under `key`.
pub(crate) fn save_meta(
    store: &dyn StateStore,
    key: &str,
    encoding: Encoding,
    meta: &ListMeta,
) -> ListResult<()> {
    let bytes = encoding.encode_meta(key, meta)?;
    store.put_state(key, &bytes)?;
    debug!(
        key,
        total = meta.total_count,
        last_page = meta.last_page_number,
        "saved list metadata"
    );
    Ok(())
}
