//! Entity hooks behind each dashboard screen.
//!
//! Paged screens (members, doctors, families, applications) are [`UseQuery`]
//! hooks over a [`Fetch`] implementation. Small lists (events, donations,
//! committees, news, businesses, magazines, birthdays) are `Fetch`
//! implementations that ignore paging and return every row.
//!
//! [`UseQuery`]: crate::hooks::UseQuery
//! [`Fetch`]: crate::hooks::Fetch

pub mod birthdays;
pub mod businesses;
pub mod committees;
pub mod doctors;
pub mod donations;
pub mod events;
pub mod families;
pub mod magazines;
pub mod news;
pub mod profiles;
pub mod submissions;


use serde::de::DeserializeOwned;

use crate::store::{Remote, Row, Select, StoreError, StoreResult, decode_rows};

/// Bucket holding promoted event and donation images.
pub const APPLICATION_DOCS_BUCKET: &str = "application-docs";

pub(crate) async fn select_all<T: DeserializeOwned>(
    remote: &dyn Remote,
    query: Select,
) -> StoreResult<Vec<T>> {
    decode_rows(remote.query().select(&query).await?.rows)
}

/// First returned row of a single-row write.
pub(crate) fn single<T: DeserializeOwned>(rows: Vec<Row>, table: &str, id: &str) -> StoreResult<T> {
    let row = rows.into_iter().next().ok_or_else(|| StoreError::NotFound {
        table: table.to_string(),
        id: id.to_string(),
    })?;
    Ok(serde_json::from_value(serde_json::Value::Object(row))?)
}

/// Reject blank required text before any remote call.
pub(crate) fn require(field: &str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        Err(StoreError::validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

/// File extension of `name`, defaulting to `jpg`.
pub(crate) fn extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && !ext.contains('/') => ext,
        _ => "jpg",
    }
}

/// Storage objects that are real files, not folder placeholders.
pub(crate) fn is_visible_object(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.')
}
