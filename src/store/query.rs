//! Backend agnostic query description.
//!
//! A [`Select`] captures everything the dashboard asks of the row API: column
//! projection, exact counting, conditions, ordering and the page slice. Both the
//! HTTP client and the in-memory store interpret the same value, which keeps
//! query semantics identical across backends.

use serde_json::Value;

/// A single row predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column = value`
    Eq { column: String, value: Value },
    /// `column >= value`
    Gte { column: String, value: Value },
    /// `column <= value`
    Lte { column: String, value: Value },
    /// `column < value`
    Lt { column: String, value: Value },
    /// `column is not null`
    NotNull { column: String },
    /// `column in (values...)`
    In { column: String, values: Vec<Value> },
    /// Case-insensitive substring match on any of `columns` (OR-combined).
    IlikeAny { columns: Vec<String>, term: String },
}

impl Condition {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::Eq {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Sort direction for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// A read against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: String,
    /// Comma separated projection, `*` for every column.
    pub columns: String,
    /// Request the exact number of matching rows alongside the slice.
    pub count: bool,
    /// Only the count is wanted; no rows are returned.
    pub head: bool,
    pub conditions: Vec<Condition>,
    pub order: Vec<Order>,
    /// Inclusive row range `(from, to)`.
    pub range: Option<(usize, usize)>,
    pub limit: Option<usize>,
}

impl Select {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".to_string(),
            count: false,
            head: false,
            conditions: Vec::new(),
            order: Vec::new(),
            range: None,
            limit: None,
        }
    }

    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn exact_count(mut self) -> Self {
        self.count = true;
        self
    }

    /// Count only. Implies [`Select::exact_count`].
    pub fn head(mut self) -> Self {
        self.count = true;
        self.head = true;
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(Condition::eq(column, value))
    }

    pub fn gte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(Condition::Gte {
            column: column.into(),
            value: value.into(),
        })
    }

    pub fn lte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(Condition::Lte {
            column: column.into(),
            value: value.into(),
        })
    }

    pub fn lt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(Condition::Lt {
            column: column.into(),
            value: value.into(),
        })
    }

    pub fn not_null(self, column: impl Into<String>) -> Self {
        self.filter(Condition::NotNull {
            column: column.into(),
        })
    }

    pub fn is_in(self, column: impl Into<String>, values: Vec<Value>) -> Self {
        self.filter(Condition::In {
            column: column.into(),
            values,
        })
    }

    /// OR-combined ilike over `columns`. A blank term adds nothing.
    pub fn ilike_any(self, columns: &[&str], term: &str) -> Self {
        let term = term.trim();
        if term.is_empty() || columns.is_empty() {
            return self;
        }
        self.filter(Condition::IlikeAny {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            term: term.to_string(),
        })
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order.push(order);
        self
    }

    pub fn range(mut self, from: usize, to: usize) -> Self {
        self.range = Some((from, to));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
