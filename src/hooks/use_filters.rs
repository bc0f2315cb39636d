//! Keyed filter accumulation.
//!
//! Screens expose filters as id/value pairs coming from select boxes and date
//! pickers. Empty-equivalent values (no value, JSON null, `""`, `"all"`, a date
//! range with neither bound) remove the key instead of filtering on it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;

use crate::store::Select;

/// Inclusive date bounds on one column. The upper bound covers the whole day,
/// so timestamp columns keep rows from the last day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub column: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(column: impl Into<String>, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self {
            column: column.into(),
            from,
            to,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// `eq(filter_id, value)`
    Equals(Value),
    /// `gte` on the first day and `lt` on the day after the last.
    Range(DateRange),
}

impl FilterValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Equals(Value::Null) => true,
            FilterValue::Equals(Value::String(s)) => s.is_empty() || s == "all",
            FilterValue::Equals(_) => false,
            FilterValue::Range(range) => range.is_empty(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Equals(Value::String(value.to_string()))
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        FilterValue::Equals(value)
    }
}

impl From<DateRange> for FilterValue {
    fn from(range: DateRange) -> Self {
        FilterValue::Range(range)
    }
}

/// Live filters, ordered by id so equal sets compare equal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    entries: BTreeMap<String, FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `id`, or remove `id` when the value is empty.
    pub fn apply(&mut self, id: impl Into<String>, value: Option<FilterValue>) {
        let id = id.into();
        match value.filter(|v| !v.is_empty()) {
            Some(value) => {
                self.entries.insert(id, value);
            }
            None => {
                self.entries.remove(&id);
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<FilterValue> {
        self.entries.remove(id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, id: &str) -> Option<&FilterValue> {
        self.entries.get(id)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterValue)> {
        self.entries.iter()
    }

    /// Add one condition per live filter to `query`.
    pub fn apply_to(&self, mut query: Select) -> Select {
        for (id, value) in &self.entries {
            query = match value {
                FilterValue::Equals(v) => query.eq(id.as_str(), v.clone()),
                FilterValue::Range(range) => {
                    let mut q = query;
                    if let Some(from) = range.from {
                        q = q.gte(range.column.as_str(), from.to_string());
                    }
                    if let Some(to) = range.to {
                        q = match to.succ_opt() {
                            Some(next) => q.lt(range.column.as_str(), next.to_string()),
                            None => q.lte(range.column.as_str(), to.to_string()),
                        };
                    }
                    q
                }
            };
        }
        query
    }
}
