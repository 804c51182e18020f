//! Byte encodings for page and metadata records.
//!
//! JSON is the default and is what existing deployments have on disk: a page
//! is a JSON array of strings and metadata is a camelCase JSON object.
//! Bincode is available for stores that never need to be inspected by hand.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ListError, ListResult};
use crate::meta::ListMeta;

/// Serialization format for stored records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// `serde_json`, compatible with previously written lists.
    #[default]
    Json,
    /// `bincode` 1.x with its default options.
    Bincode,
}

impl Encoding {
    fn encode<T: Serialize + ?Sized>(self, key: &str, value: &T) -> ListResult<Vec<u8>> {
        let out = match self {
            Self::Json => serde_json::to_vec(value).map_err(|e| e.to_string()),
            Self::Bincode => bincode::serialize(value).map_err(|e| e.to_string()),
        };
        out.map_err(|reason| ListError::Encode {
            key: key.to_string(),
            reason,
        })
    }

    fn decode<T: DeserializeOwned>(self, key: &str, bytes: &[u8]) -> ListResult<T> {
        let out = match self {
            Self::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            Self::Bincode => bincode::deserialize(bytes).map_err(|e| e.to_string()),
        };
        out.map_err(|reason| ListError::Decode {
            key: key.to_string(),
            reason,
        })
    }

    /// Encode the element sequence of one page.
    pub fn encode_page(self, key: &str, values: &[String]) -> ListResult<Vec<u8>> {
        self.encode(key, values)
    }

    /// Decode the element sequence of one page.
    pub fn decode_page(self, key: &str, bytes: &[u8]) -> ListResult<Vec<String>> {
        self.decode(key, bytes)
    }

    /// Encode a metadata record.
    pub fn encode_meta(self, key: &str, meta: &ListMeta) -> ListResult<Vec<u8>> {
        self.encode(key, meta)
    }

    /// Decode a metadata record.
    pub fn decode_meta(self, key: &str, bytes: &[u8]) -> ListResult<ListMeta> {
        self.decode(key, bytes)
    }
}
