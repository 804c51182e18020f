//! The paged list: append, point reads and page-by-page traversal.
//!
//! Every public operation starts from a fresh metadata read. Nothing is
//! cached between calls, so a list handle never works from stale counts
//! when the store is shared with other writers that the host serializes.
//!
//! Append writes the page first and the metadata second. Metadata is the
//! commit record: elements stored on the last page beyond the count it
//! implies belong to an append whose metadata write failed. Reads ignore
//! them and the next append overwrites them.

use std::iter::FusedIterator;
use std::sync::Arc;

use pagelist_store::StateStore;
use tracing::{debug, warn};

use crate::codec::Encoding;
use crate::config::ListConfig;
use crate::error::{ListError, ListResult};
use crate::keys::{append_target, expected_page_len, locate, ListKeys};
use crate::meta::{load_meta, save_meta, ListMeta};

/// An append-only sequence of strings partitioned into fixed-size pages.
///
/// The handle holds no list state of its own; it owns the identity, the page
/// size and a shared reference to the store.
pub struct PagedList {
    keys: ListKeys,
    page_size: u64,
    encoding: Encoding,
    store: Arc<dyn StateStore>,
}

impl std::fmt::Debug for PagedList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedList")
            .field("identity", &self.keys.identity())
            .field("page_size", &self.page_size)
            .field("encoding", &self.encoding)
            .finish()
    }
}

impl PagedList {
    /// Open the list named `identity` with JSON records.
    ///
    /// A `page_size` of 0 falls back to [`DEFAULT_PAGE_SIZE`](crate::DEFAULT_PAGE_SIZE).
    /// The page size must stay the same for the life of the stored list.
    pub fn new(identity: impl Into<String>, page_size: u64, store: Arc<dyn StateStore>) -> Self {
        Self::with_config(identity, &ListConfig::with_page_size(page_size), store)
    }

    /// Open the list named `identity` with an explicit configuration.
    pub fn with_config(
        identity: impl Into<String>,
        config: &ListConfig,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            keys: ListKeys::new(identity),
            page_size: config.effective_page_size(),
            encoding: config.encoding,
            store,
        }
    }

    /// The list identity.
    pub fn identity(&self) -> &str {
        self.keys.identity()
    }

    /// Maximum number of elements per page.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Storage keys for this list.
    pub fn keys(&self) -> &ListKeys {
        &self.keys
    }

    /// Current metadata record (zero for a list that was never written).
    pub fn meta(&self) -> ListResult<ListMeta> {
        load_meta(
            self.store.as_ref(),
            &self.keys.meta_key(),
            self.encoding,
            self.page_size,
        )
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Append `value` to the end of the list and return its index.
    ///
    /// Issues, in order: metadata read, page read, page write, metadata
    /// write. A failure after the page write leaves the value uncommitted;
    /// retrying the append stores it at the same index.
    pub fn append(&self, value: impl Into<String>) -> ListResult<u64> {
        let meta = self.meta()?;
        let target = append_target(&meta, self.page_size);
        let key = self.keys.page_key(target);

        let mut values = self.read_page(&key)?.unwrap_or_default();
        let committed = expected_page_len(&meta, target, self.page_size);
        let stored = values.len() as u64;
        if stored < committed {
            return Err(ListError::DataInconsistency {
                key,
                reason: format!("page holds {stored} elements, metadata expects {committed}"),
            });
        }
        if stored > committed {
            warn!(
                key = %key,
                stored,
                committed,
                "discarding uncommitted elements from an interrupted append"
            );
            values.truncate(committed as usize);
        }

        values.push(value.into());
        let bytes = self.encoding.encode_page(&key, &values)?;
        self.store.put_state(&key, &bytes)?;

        let index = meta.total_count;
        let next = ListMeta {
            last_page_number: target,
            total_count: meta.total_count + 1,
        };
        save_meta(self.store.as_ref(), &self.keys.meta_key(), self.encoding, &next)?;
        debug!(list = self.identity(), index, page = target, "appended element");
        Ok(index)
    }

    /// Alias of [`append`](Self::append).
    pub fn push_back(&self, value: impl Into<String>) -> ListResult<u64> {
        self.append(value)
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Number of elements in the list. Reads metadata only.
    pub fn len(&self) -> ListResult<u64> {
        Ok(self.meta()?.total_count)
    }

    /// Returns `true` if the list holds no elements.
    pub fn is_empty(&self) -> ListResult<bool> {
        Ok(self.meta()?.is_empty())
    }

    /// Elements of page `page` (1-based).
    ///
    /// Fails with `InvalidArgument` for page 0, `PageNotFound` past the last
    /// page, and `DataInconsistency` when the stored page is missing or does
    /// not have the length metadata implies.
    pub fn get_page(&self, page: u64) -> ListResult<Vec<String>> {
        if page < 1 {
            return Err(ListError::InvalidArgument(
                "page number must be >= 1".to_string(),
            ));
        }
        let meta = self.meta()?;
        if page > meta.last_page_number {
            return Err(ListError::PageNotFound {
                page,
                last_page: meta.last_page_number,
            });
        }
        self.load_page(&meta, page)
    }

    /// Element at logical `index`.
    pub fn get(&self, index: u64) -> ListResult<String> {
        let meta = self.meta()?;
        self.get_with(&meta, index)
    }

    /// Last element of the list.
    pub fn get_last(&self) -> ListResult<String> {
        Ok(self.last_entry()?.1)
    }

    /// Index and value of the last element, both taken from one metadata read.
    pub fn last_entry(&self) -> ListResult<(u64, String)> {
        let meta = self.meta()?;
        if meta.is_empty() {
            return Err(ListError::IndexOutOfRange { index: 0, len: 0 });
        }
        let index = meta.total_count - 1;
        Ok((index, self.get_with(&meta, index)?))
    }

    /// Visit elements `start..end` in index order.
    ///
    /// `end: None` means the end of the list. The range must be non-empty
    /// and within bounds, otherwise this fails with `IndexOutOfRange`, so
    /// any range over an empty list is an error. Returning `Err` from
    /// `visit` stops the walk before any further page is read and hands
    /// the error back to the caller.
    pub fn range<E, F>(&self, start: u64, end: Option<u64>, mut visit: F) -> Result<(), E>
    where
        E: From<ListError>,
        F: FnMut(u64, &str) -> Result<(), E>,
    {
        for item in self.iter_range(start, end)? {
            let (index, value) = item?;
            visit(index, &value)?;
        }
        Ok(())
    }

    /// Lazy form of [`range`](Self::range).
    ///
    /// Bounds are checked up front; pages are read one at a time as the
    /// iterator advances. The iterator ends after the first error.
    pub fn iter_range(&self, start: u64, end: Option<u64>) -> ListResult<RangeIter<'_>> {
        let meta = self.meta()?;
        let len = meta.total_count;
        let end = end.unwrap_or(len);
        if end > len {
            return Err(ListError::IndexOutOfRange { index: end, len });
        }
        if start >= end {
            return Err(ListError::IndexOutOfRange { index: start, len });
        }
        Ok(RangeIter {
            list: self,
            meta,
            next: start,
            end,
            buffer: Vec::new().into_iter(),
            done: false,
        })
    }

    // ---------------------------------------------------------------
    // Page access
    // ---------------------------------------------------------------

    fn get_with(&self, meta: &ListMeta, index: u64) -> ListResult<String> {
        if index >= meta.total_count {
            return Err(ListError::IndexOutOfRange {
                index,
                len: meta.total_count,
            });
        }
        let pos = locate(index, self.page_size);
        let mut values = self.load_page(meta, pos.page)?;
        if pos.offset >= values.len() as u64 {
            return Err(ListError::DataInconsistency {
                key: self.keys.page_key(pos.page),
                reason: format!(
                    "index {index} maps to offset {} but page holds {} elements",
                    pos.offset,
                    values.len()
                ),
            });
        }
        Ok(values.swap_remove(pos.offset as usize))
    }

    /// Raw page contents, `None` when the key is absent or empty.
    fn read_page(&self, key: &str) -> ListResult<Option<Vec<String>>> {
        match self.store.get_state(key)? {
            Some(bytes) if !bytes.is_empty() => Ok(Some(self.encoding.decode_page(key, &bytes)?)),
            _ => Ok(None),
        }
    }

    /// Committed contents of an existing page, checked against `meta`.
    fn load_page(&self, meta: &ListMeta, page: u64) -> ListResult<Vec<String>> {
        let key = self.keys.page_key(page);
        let committed = expected_page_len(meta, page, self.page_size);
        let Some(mut values) = self.read_page(&key)? else {
            return Err(ListError::DataInconsistency {
                key,
                reason: format!("page missing, metadata expects {committed} elements"),
            });
        };

        let stored = values.len() as u64;
        let is_last = page == meta.last_page_number;
        if stored < committed || stored > self.page_size || (stored > committed && !is_last) {
            return Err(ListError::DataInconsistency {
                key,
                reason: format!("page holds {stored} elements, metadata expects {committed}"),
            });
        }
        if stored > committed {
            warn!(
                key = %key,
                stored,
                committed,
                "ignoring uncommitted elements from an interrupted append"
            );
            values.truncate(committed as usize);
        }
        debug!(key = %key, len = values.len(), "loaded page");
        Ok(values)
    }
}

/// Iterator over `(index, value)` pairs of a range, reading one page at a
/// time. Created by [`PagedList::iter_range`].
pub struct RangeIter<'a> {
    list: &'a PagedList,
    meta: ListMeta,
    next: u64,
    end: u64,
    buffer: std::vec::IntoIter<String>,
    done: bool,
}

impl RangeIter<'_> {
    fn fill(&mut self) -> ListResult<()> {
        let pos = locate(self.next, self.list.page_size);
        let mut values = self.list.load_page(&self.meta, pos.page)?;
        let offset = pos.offset as usize;
        if values.len() <= offset {
            return Err(ListError::DataInconsistency {
                key: self.list.keys.page_key(pos.page),
                reason: format!(
                    "index {} maps to offset {offset} but page holds {} elements",
                    self.next,
                    values.len()
                ),
            });
        }
        let wanted = (self.end - self.next).min((values.len() - offset) as u64) as usize;
        values.truncate(offset + wanted);
        values.drain(..offset);
        self.buffer = values.into_iter();
        Ok(())
    }
}

impl Iterator for RangeIter<'_> {
    type Item = ListResult<(u64, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.next >= self.end {
            return None;
        }
        if self.buffer.as_slice().is_empty() {
            if let Err(e) = self.fill() {
                self.done = true;
                return Some(Err(e));
            }
        }
        let value = self.buffer.next()?;
        let index = self.next;
        self.next += 1;
        Some(Ok((index, value)))
    }
}

impl FusedIterator for RangeIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use pagelist_store::InMemoryStateStore;

    fn list(page_size: u64) -> (PagedList, Arc<InMemoryStateStore>) {
        let store = Arc::new(InMemoryStateStore::new());
        (PagedList::new("test_list", page_size, store.clone()), store)
    }

    fn collect(list: &PagedList, start: u64, end: Option<u64>) -> ListResult<Vec<String>> {
        let mut out = Vec::new();
        list.range(start, end, |_, v| {
            out.push(v.to_string());
            Ok::<_, ListError>(())
        })?;
        Ok(out)
    }

    #[test]
    fn new_list_is_empty() {
        let (l, _) = list(10);
        assert_eq!(l.meta().unwrap(), ListMeta::default());
        assert_eq!(l.len().unwrap(), 0);
        assert!(l.is_empty().unwrap());
    }

    #[test]
    fn append_single_element() {
        let (l, _) = list(10);
        assert_eq!(l.append("item1").unwrap(), 0);
        let meta = l.meta().unwrap();
        assert_eq!(meta.total_count, 1);
        assert_eq!(meta.last_page_number, 1);
        assert_eq!(l.get_page(1).unwrap(), vec!["item1"]);
    }

    #[test]
    fn append_rolls_onto_new_page() {
        let (l, _) = list(3);
        for v in ["a", "b", "c", "d"] {
            l.append(v).unwrap();
        }
        let meta = l.meta().unwrap();
        assert_eq!(meta.total_count, 4);
        assert_eq!(meta.last_page_number, 2);
        assert_eq!(l.get_page(1).unwrap(), vec!["a", "b", "c"]);
        assert_eq!(l.get_page(2).unwrap(), vec!["d"]);
        assert_eq!(l.get(3).unwrap(), "d");
        assert_eq!(collect(&l, 2, Some(4)).unwrap(), vec!["c", "d"]);
    }

    #[test]
    fn page_zero_is_invalid() {
        let (l, _) = list(3);
        assert!(matches!(l.get_page(0), Err(ListError::InvalidArgument(_))));
    }

    #[test]
    fn pages_past_the_end_are_not_found() {
        let (l, _) = list(10);
        assert!(l.get_page(1).unwrap_err().is_page_not_found());
        l.append("item1").unwrap();
        assert!(l.get_page(2).unwrap_err().is_page_not_found());
    }

    #[test]
    fn get_bounds() {
        let (l, _) = list(3);
        assert!(l.get(0).unwrap_err().is_index_out_of_range());
        for v in ["item1", "item2", "item3", "item4"] {
            l.append(v).unwrap();
        }
        assert_eq!(l.get(0).unwrap(), "item1");
        assert_eq!(l.get(2).unwrap(), "item3");
        assert!(l.get(4).unwrap_err().is_index_out_of_range());
    }

    #[test]
    fn get_last_follows_appends() {
        let (l, _) = list(3);
        assert!(l.get_last().unwrap_err().is_index_out_of_range());
        for v in ["item1", "item2", "item3", "item4"] {
            l.append(v).unwrap();
        }
        assert_eq!(l.get_last().unwrap(), "item4");
        l.append("item5").unwrap();
        assert_eq!(l.get_last().unwrap(), "item5");
    }

    #[test]
    fn range_rejects_bad_bounds() {
        let (l, _) = list(3);
        assert!(collect(&l, 0, Some(0)).unwrap_err().is_index_out_of_range());
        assert!(collect(&l, 0, None).unwrap_err().is_index_out_of_range());
        for v in ["a", "b", "c"] {
            l.append(v).unwrap();
        }
        assert!(collect(&l, 0, Some(4)).unwrap_err().is_index_out_of_range());
        assert!(collect(&l, 2, Some(2)).unwrap_err().is_index_out_of_range());
        assert!(collect(&l, 3, None).unwrap_err().is_index_out_of_range());
    }

    #[test]
    fn range_reports_indices() {
        let (l, _) = list(2);
        for v in ["a", "b", "c", "d", "e"] {
            l.append(v).unwrap();
        }
        let seen: Vec<(u64, String)> = l
            .iter_range(1, None)
            .unwrap()
            .collect::<ListResult<_>>()
            .unwrap();
        assert_eq!(
            seen,
            vec![
                (1, "b".to_string()),
                (2, "c".to_string()),
                (3, "d".to_string()),
                (4, "e".to_string()),
            ]
        );
    }

    #[test]
    fn visitor_error_stops_walk() {
        #[derive(Debug)]
        enum Visit {
            Stop(u64),
            List(ListError),
        }
        impl From<ListError> for Visit {
            fn from(e: ListError) -> Self {
                Visit::List(e)
            }
        }

        let (l, _) = list(2);
        for v in ["a", "b", "c", "d", "e"] {
            l.append(v).unwrap();
        }
        let mut visited = 0;
        let result = l.range(0, None, |i, _| {
            visited += 1;
            if i == 2 {
                Err(Visit::Stop(i))
            } else {
                Ok(())
            }
        });
        assert!(matches!(result, Err(Visit::Stop(2))));
        assert_eq!(visited, 3);
    }

    #[test]
    fn short_page_is_inconsistent() {
        let (l, store) = list(3);
        store
            .put_state("test_list_meta", br#"{"lastPageNumber":1,"totalCount":3}"#)
            .unwrap();
        store.put_state("test_list_page_1", b"[]").unwrap();
        let err = l.get(2).unwrap_err();
        assert!(err.to_string().contains("data inconsistency"));
    }

    #[test]
    fn missing_page_is_inconsistent() {
        let (l, store) = list(3);
        store
            .put_state("test_list_meta", br#"{"lastPageNumber":1,"totalCount":1}"#)
            .unwrap();
        assert!(l.get_last().unwrap_err().is_data_inconsistency());
        assert!(l.get_page(1).unwrap_err().is_data_inconsistency());
    }

    #[test]
    fn overfull_page_is_inconsistent() {
        let (l, store) = list(2);
        store
            .put_state("test_list_meta", br#"{"lastPageNumber":1,"totalCount":2}"#)
            .unwrap();
        store
            .put_state("test_list_page_1", br#"["a","b","c"]"#)
            .unwrap();
        assert!(l.get_page(1).unwrap_err().is_data_inconsistency());
    }

    #[test]
    fn uncommitted_tail_is_hidden_and_overwritten() {
        let (l, store) = list(3);
        l.append("a").unwrap();
        // Page write of a second append landed, its metadata write did not.
        store
            .put_state("test_list_page_1", br#"["a","orphan"]"#)
            .unwrap();

        assert_eq!(l.get_page(1).unwrap(), vec!["a"]);
        assert_eq!(l.len().unwrap(), 1);

        assert_eq!(l.append("b").unwrap(), 1);
        assert_eq!(l.get_page(1).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn last_entry_pairs_index_and_value() {
        let (l, _) = list(2);
        assert!(l.last_entry().unwrap_err().is_index_out_of_range());
        for v in ["a", "b", "c"] {
            l.append(v).unwrap();
        }
        assert_eq!(l.last_entry().unwrap(), (2, "c".to_string()));
    }

    #[test]
    fn ignored_tail_is_logged() {
        use std::io::Write;
        use std::sync::Mutex;

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl Write for Captured {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let (l, store) = list(3);
        l.append("a").unwrap();
        store
            .put_state("test_list_page_1", br#"["a","orphan"]"#)
            .unwrap();

        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();
        let page = tracing::subscriber::with_default(subscriber, || l.get_page(1).unwrap());

        assert_eq!(page, vec!["a"]);
        let logged = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("ignoring uncommitted elements"), "{logged}");
        assert!(logged.contains("test_list_page_1"), "{logged}");
    }

    #[test]
    fn debug_shows_identity() {
        let (l, _) = list(4);
        let debug = format!("{l:?}");
        assert!(debug.contains("test_list"));
        assert!(debug.contains("page_size"));
    }
}
