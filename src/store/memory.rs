//! In-process store with the row API's query semantics.
//!
//! Tables are vectors of rows kept in insertion order, buckets are path maps.
//! Used by tests and by offline demos of the CLI.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::Value;

use crate::store::{
    Condition, FileEntry, MutationClient, QueryClient, Remote, Row, Select, Selection,
    StorageClient, StoreError, StoreResult, UploadOptions, value_text,
};

const DEFAULT_BASE_URL: &str = "memory://local";

#[derive(Debug)]
pub struct MemoryStore {
    base_url: String,
    tables: DashMap<String, Vec<Row>>,
    buckets: DashMap<String, BTreeMap<String, Vec<u8>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            tables: DashMap::new(),
            buckets: DashMap::new(),
        }
    }

    /// Append rows as-is. Non-object values are ignored.
    pub fn seed(&self, table: &str, rows: impl IntoIterator<Item = Value>) {
        let mut entry = self.tables.entry(table.to_string()).or_default();
        entry.extend(rows.into_iter().filter_map(|v| match v {
            Value::Object(row) => Some(row),
            _ => None,
        }));
    }

    /// Snapshot of a table, empty when it was never written.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .get(table)
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }

    pub fn object(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        self.buckets
            .get(bucket)
            .and_then(|objects| objects.get(path).cloned())
    }
}

fn matches(row: &Row, condition: &Condition) -> bool {
    let field = |column: &str| row.get(column).filter(|v| !v.is_null());
    match condition {
        Condition::Eq { column, value } => field(column)
            .map(|v| value_text(v) == value_text(value))
            .unwrap_or(false),
        Condition::Gte { column, value } => field(column)
            .map(|v| compare(v, value) != Ordering::Less)
            .unwrap_or(false),
        Condition::Lte { column, value } => field(column)
            .map(|v| compare(v, value) != Ordering::Greater)
            .unwrap_or(false),
        Condition::Lt { column, value } => field(column)
            .map(|v| compare(v, value) == Ordering::Less)
            .unwrap_or(false),
        Condition::NotNull { column } => field(column).is_some(),
        Condition::In { column, values } => field(column)
            .map(|v| {
                let text = value_text(v);
                values.iter().any(|candidate| value_text(candidate) == text)
            })
            .unwrap_or(false),
        Condition::IlikeAny { columns, term } => {
            let needle = term.to_lowercase();
            columns.iter().any(|column| {
                field(column)
                    .map(|v| value_text(v).to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
        }
    }
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => value_text(a).cmp(&value_text(b)),
    }
}

/// Nulls sort last ascending and first descending.
fn compare_column(a: &Row, b: &Row, column: &str) -> Ordering {
    let get = |row: &Row| row.get(column).filter(|v| !v.is_null()).cloned();
    match (get(a), get(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => compare(&x, &y),
    }
}

fn project(row: &Row, columns: &str) -> Row {
    if columns.trim() == "*" {
        return row.clone();
    }
    columns
        .split(',')
        .map(str::trim)
        .filter_map(|c| row.get(c).map(|v| (c.to_string(), v.clone())))
        .collect()
}

fn next_id(rows: &[Row]) -> i64 {
    rows.iter()
        .filter_map(|r| r.get("id").and_then(Value::as_i64))
        .max()
        .unwrap_or(0)
        + 1
}

#[async_trait]
impl QueryClient for MemoryStore {
    async fn select(&self, query: &Select) -> StoreResult<Selection> {
        let mut rows: Vec<Row> = self
            .tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.conditions.iter().all(|c| matches(row, c)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if !query.order.is_empty() {
            rows.sort_by(|a, b| {
                query
                    .order
                    .iter()
                    .map(|o| {
                        let ord = compare_column(a, b, &o.column);
                        if o.ascending { ord } else { ord.reverse() }
                    })
                    .find(|ord| *ord != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        let count = query.count.then_some(rows.len());
        if query.head {
            return Ok(Selection {
                rows: Vec::new(),
                count,
            });
        }

        let (skip, take) = match query.range {
            Some((from, to)) if to >= from => (from, (to - from).saturating_add(1)),
            Some(_) => (0, 0),
            None => (0, usize::MAX),
        };
        let take = query.limit.map_or(take, |limit| take.min(limit));

        let rows = rows
            .iter()
            .skip(skip)
            .take(take)
            .map(|row| project(row, &query.columns))
            .collect();
        Ok(Selection { rows, count })
    }
}

#[async_trait]
impl MutationClient for MemoryStore {
    async fn insert(&self, table: &str, rows: Vec<Row>) -> StoreResult<Vec<Row>> {
        let mut existing = self.tables.entry(table.to_string()).or_default();
        let mut inserted = Vec::with_capacity(rows.len());
        for mut row in rows {
            match row.get("id").filter(|v| !v.is_null()) {
                Some(id) => {
                    let id = value_text(id);
                    if existing
                        .iter()
                        .any(|r| r.get("id").map(value_text).as_deref() == Some(id.as_str()))
                    {
                        return Err(StoreError::Conflict {
                            table: table.to_string(),
                            message: format!("duplicate key value: id={id}"),
                        });
                    }
                }
                None => {
                    row.insert("id".to_string(), Value::from(next_id(&existing)));
                }
            }
            row.entry("created_at")
                .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
            existing.push(row.clone());
            inserted.push(row);
        }
        Ok(inserted)
    }

    async fn update(
        &self,
        table: &str,
        patch: Row,
        filter: &[Condition],
    ) -> StoreResult<Vec<Row>> {
        let Some(mut rows) = self.tables.get_mut(table) else {
            return Ok(Vec::new());
        };
        let mut updated = Vec::new();
        for row in rows
            .iter_mut()
            .filter(|row| filter.iter().all(|c| matches(row, c)))
        {
            for (key, value) in &patch {
                row.insert(key.clone(), value.clone());
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filter: &[Condition]) -> StoreResult<Vec<Row>> {
        let Some(mut rows) = self.tables.get_mut(table) else {
            return Ok(Vec::new());
        };
        let (removed, kept): (Vec<Row>, Vec<Row>) = rows
            .drain(..)
            .partition(|row| filter.iter().all(|c| matches(row, c)));
        *rows = kept;
        Ok(removed)
    }
}

#[async_trait]
impl StorageClient for MemoryStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> StoreResult<String> {
        let mut objects = self.buckets.entry(bucket.to_string()).or_default();
        if !options.upsert && objects.contains_key(path) {
            return Err(StoreError::Storage {
                bucket: bucket.to_string(),
                message: format!("The resource already exists: {path}"),
            });
        }
        objects.insert(path.to_string(), bytes);
        Ok(path.to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, path
        )
    }

    async fn list(&self, bucket: &str, prefix: &str) -> StoreResult<Vec<FileEntry>> {
        let prefix = prefix.trim_matches('/');
        let Some(objects) = self.buckets.get(bucket) else {
            return Ok(Vec::new());
        };
        let entries = objects
            .keys()
            .filter_map(|key| {
                if prefix.is_empty() {
                    Some(key.as_str())
                } else {
                    key.strip_prefix(prefix)?.strip_prefix('/')
                }
            })
            .filter(|name| !name.contains('/'))
            .map(|name| FileEntry {
                name: name.to_string(),
                id: None,
                created_at: None,
            })
            .collect();
        Ok(entries)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> StoreResult<()> {
        if let Some(mut objects) = self.buckets.get_mut(bucket) {
            for path in paths {
                objects.remove(path);
            }
        }
        Ok(())
    }
}

impl Remote for MemoryStore {
    fn query(&self) -> &dyn QueryClient {
        self
    }

    fn mutate(&self) -> &dyn MutationClient {
        self
    }

    fn storage(&self) -> &dyn StorageClient {
        self
    }
}
