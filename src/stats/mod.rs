//! Dashboard statistics.
//!
//! Everything is recomputed from the remote store on each call; nothing is
//! cached between calls.

mod gender;

#[cfg(test)]
#[path = "stats_test.rs"]
mod stats_test;

use std::collections::HashSet;

use futures_util::future::try_join_all;
use futures_util::try_join;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

pub use gender::{GenderBreakdown, gender_breakdown};

use crate::entities::committees::committee_key;
use crate::review::{Application, ApplicationKind, ApplicationStatus};
use crate::store::{Order, Remote, Select, StoreResult, decode_rows, value_text};

/// Number of recent event applications shown by default.
pub const DEFAULT_RECENT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_members: usize,
    pub gender: GenderBreakdown,
    pub total_families: usize,
    pub total_doctors: usize,
    pub total_committees: usize,
    pub event_applications: usize,
    pub donation_applications: usize,
    pub pending_applications: usize,
    pub recent_applications: Vec<Application>,
}

async fn count(remote: &dyn Remote, query: Select) -> StoreResult<usize> {
    Ok(remote.query().select(&query.head()).await?.count.unwrap_or(0))
}

async fn column(remote: &dyn Remote, table: &str, column: &str) -> StoreResult<Vec<Value>> {
    let selection = remote
        .query()
        .select(&Select::table(table).columns(column))
        .await?;
    Ok(selection
        .rows
        .into_iter()
        .map(|mut row| row.remove(column).unwrap_or(Value::Null))
        .collect())
}

/// Distinct non-null values after `normalize`.
fn distinct(values: &[Value], normalize: impl Fn(&str) -> String) -> usize {
    values
        .iter()
        .filter(|v| !v.is_null())
        .map(|v| normalize(&value_text(v)))
        .filter(|v| !v.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

impl DashboardStats {
    /// Run every aggregate query concurrently.
    #[instrument(skip(remote), err)]
    pub async fn collect(remote: &dyn Remote, recent: usize) -> StoreResult<Self> {
        let pending = try_join_all(ApplicationKind::ALL.iter().map(|kind| {
            count(
                remote,
                Select::table(kind.source_table()).eq("status", ApplicationStatus::Pending.as_str()),
            )
        }));
        let recent_rows = async {
            let selection = remote
                .query()
                .select(
                    &Select::table(ApplicationKind::Event.source_table())
                        .order(Order::desc("created_at"))
                        .limit(recent),
                )
                .await?;
            decode_rows::<Application>(selection.rows)
        };

        let (
            total_members,
            genders,
            family_numbers,
            total_doctors,
            committee_names,
            event_applications,
            donation_applications,
            pending,
            recent_applications,
        ) = try_join!(
            count(remote, Select::table("profiles")),
            column(remote, "profiles", "gender"),
            column(remote, "profiles", "family_no"),
            count(remote, Select::table("doctors")),
            column(remote, "committee", "name"),
            count(remote, Select::table(ApplicationKind::Event.source_table())),
            count(remote, Select::table(ApplicationKind::Donation.source_table())),
            pending,
            recent_rows,
        )?;

        Ok(Self {
            total_members,
            gender: gender_breakdown(genders.iter().map(Value::as_str)),
            total_families: distinct(&family_numbers, |s| s.trim().to_string()),
            total_doctors,
            total_committees: distinct(&committee_names, committee_key),
            event_applications,
            donation_applications,
            pending_applications: pending.iter().sum(),
            recent_applications,
        })
    }
}
