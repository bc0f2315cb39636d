//! Shapes exchanged with the remote store.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::store::StoreResult;

/// One untyped row as returned by the row API.
pub type Row = Map<String, Value>;

/// Rows plus the exact count when one was requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub rows: Vec<Row>,
    pub count: Option<usize>,
}

impl Selection {
    /// Deserialize every row into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> StoreResult<Vec<T>> {
        decode_rows(self.rows)
    }
}

/// One page of typed rows and the total number of matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paged<T> {
    pub rows: Vec<T>,
    pub count: usize,
}

impl<T> Default for Paged<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            count: 0,
        }
    }
}

/// An object listed from a storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Upload behaviour for [`crate::store::StorageClient::upload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub content_type: String,
    /// Overwrite an existing object with the same path.
    pub upsert: bool,
}

impl UploadOptions {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            upsert: false,
        }
    }

    pub fn upsert(mut self) -> Self {
        self.upsert = true;
        self
    }
}

pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Row>) -> StoreResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(Value::Object(row)).map_err(Into::into))
        .collect()
}

/// Serialize a typed record into a row, dropping `null` fields.
pub fn encode_row<T: Serialize>(value: &T) -> StoreResult<Row> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map.into_iter().filter(|(_, v)| !v.is_null()).collect()),
        other => Err(crate::store::StoreError::InvalidResponse {
            message: format!("expected an object, got {other}"),
        }),
    }
}

/// Render a scalar the way it appears in a query string. Strings are unquoted.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
