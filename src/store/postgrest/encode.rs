//! Translation of [`Select`] and [`Condition`] values into PostgREST query
//! parameters.

use serde_json::Value;

use crate::store::{Condition, Order, Select, value_text};

/// Characters that make PostgREST treat a value as syntax inside `or=()` / `in.()`.
const RESERVED: &[char] = &[',', '(', ')', '.', ':', '"', '\\'];

/// Double-quote a value when it contains reserved characters.
pub fn quote(raw: &str) -> String {
    if raw.contains(RESERVED) {
        let escaped = raw.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        raw.to_string()
    }
}

/// `column=op.value` pair for a single condition.
pub fn condition_param(condition: &Condition) -> (String, String) {
    match condition {
        Condition::Eq { column, value } => (column.clone(), format!("eq.{}", value_text(value))),
        Condition::Gte { column, value } => {
            (column.clone(), format!("gte.{}", value_text(value)))
        }
        Condition::Lte { column, value } => {
            (column.clone(), format!("lte.{}", value_text(value)))
        }
        Condition::Lt { column, value } => (column.clone(), format!("lt.{}", value_text(value))),
        Condition::NotNull { column } => (column.clone(), "not.is.null".to_string()),
        Condition::In { column, values } => {
            let list = values
                .iter()
                .map(|v| quote(&value_text(v)))
                .collect::<Vec<_>>()
                .join(",");
            (column.clone(), format!("in.({list})"))
        }
        Condition::IlikeAny { columns, term } => {
            let pattern = quote(&format!("*{term}*"));
            let alternatives = columns
                .iter()
                .map(|c| format!("{c}.ilike.{pattern}"))
                .collect::<Vec<_>>()
                .join(",");
            ("or".to_string(), format!("({alternatives})"))
        }
    }
}

pub fn filter_params(conditions: &[Condition]) -> Vec<(String, String)> {
    conditions.iter().map(condition_param).collect()
}

fn order_param(order: &[Order]) -> Option<(String, String)> {
    if order.is_empty() {
        return None;
    }
    let value = order
        .iter()
        .map(|o| {
            let dir = if o.ascending { "asc" } else { "desc" };
            format!("{}.{dir}", o.column)
        })
        .collect::<Vec<_>>()
        .join(",");
    Some(("order".to_string(), value))
}

/// Every query parameter for a select, in a stable order.
pub fn select_params(query: &Select) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), query.columns.replace(' ', ""))];
    params.extend(filter_params(&query.conditions));
    params.extend(order_param(&query.order));

    let (offset, mut limit) = match query.range {
        Some((from, to)) => (Some(from), Some(to.saturating_sub(from).saturating_add(1))),
        None => (None, None),
    };
    if let Some(max) = query.limit {
        limit = Some(limit.map_or(max, |l| l.min(max)));
    }
    if let Some(offset) = offset.filter(|o| *o > 0) {
        params.push(("offset".to_string(), offset.to_string()));
    }
    if let Some(limit) = limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

/// Total from a `Content-Range` header such as `0-19/25` or `*/0`.
pub fn parse_content_range(header: &str) -> Option<usize> {
    let (_, total) = header.rsplit_once('/')?;
    total.trim().parse().ok()
}

/// Pulls the human readable message out of a PostgREST or storage error body.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
