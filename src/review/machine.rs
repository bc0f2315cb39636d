//! Status transitions for applications.
//!
//! Approving an event or a donation promotes it: the row is copied into the
//! production table and then removed from the application table. The two writes
//! are not atomic, so the copy is skipped when the production table already
//! holds this application under the same id. Re-approving after a failed
//! removal finishes the promotion. An unrelated production row with the same
//! id is a conflict and leaves the application in place.

use tracing::{error, info, instrument, warn};

use crate::review::{ApplicationKind, ApplicationStatus, ReviewError, ReviewResult};
use crate::serde_utils::id_value;
use crate::store::{Condition, Remote, Row, Select, StoreError, value_text};

fn row_status(row: &Row) -> ReviewResult<ApplicationStatus> {
    match row.get("status").and_then(|v| v.as_str()) {
        Some(s) => s.parse(),
        None => Ok(ApplicationStatus::Pending),
    }
}

/// Whether `published` is the copy of `application` left by an earlier
/// promotion. Compares submitter, submission time and title; at least one of
/// them must be set on the application.
fn same_application(kind: ApplicationKind, application: &Row, published: &Row) -> bool {
    let mut compared = false;
    for column in ["user_id", "created_at", kind.title_column()] {
        let Some(expected) = application.get(column).filter(|v| !v.is_null()) else {
            continue;
        };
        compared = true;
        if published.get(column).map(value_text) != Some(value_text(expected)) {
            return false;
        }
    }
    compared
}

fn not_found(table: &str, id: &str) -> ReviewError {
    StoreError::NotFound {
        table: table.to_string(),
        id: id.to_string(),
    }
    .into()
}

/// Move one application out of `pending`.
#[instrument(skip(remote, kind, status), fields(kind = %kind, status = %status), err)]
pub async fn set_status(
    remote: &dyn Remote,
    kind: ApplicationKind,
    id: &str,
    status: ApplicationStatus,
) -> ReviewResult<()> {
    if status == ApplicationStatus::Pending {
        return Err(ReviewError::InvalidTransition {
            from: ApplicationStatus::Pending,
            to: status,
        });
    }

    match (kind.production_table(), status) {
        (Some(target), ApplicationStatus::Approved) => promote(remote, kind, target, id).await,
        _ => update_status(remote, kind, id, status).await,
    }
}

async fn promote(
    remote: &dyn Remote,
    kind: ApplicationKind,
    target: &str,
    id: &str,
) -> ReviewResult<()> {
    let source = kind.source_table();
    let key = id_value(id);

    let selection = remote
        .query()
        .select(&Select::table(source).eq("id", key.clone()).limit(1))
        .await?;
    let mut row = selection
        .rows
        .into_iter()
        .next()
        .ok_or_else(|| not_found(source, id))?;

    let current = row_status(&row)?;
    if !current.can_transition_to(ApplicationStatus::Approved) {
        return Err(ReviewError::InvalidTransition {
            from: current,
            to: ApplicationStatus::Approved,
        });
    }
    row.remove("status");
    info!(%id, from = source, to = target, "promotion started");

    let existing = remote
        .query()
        .select(&Select::table(target).eq("id", key.clone()).limit(1))
        .await?;
    match existing.rows.first() {
        Some(published) if same_application(kind, &row, published) => {
            warn!(%id, table = target, "row already promoted, skipping insert");
        }
        Some(_) => {
            warn!(%id, table = target, "production id taken by another row");
            return Err(StoreError::Conflict {
                table: target.to_string(),
                message: format!("id {id} already belongs to a different row"),
            }
            .into());
        }
        None => {
            remote.mutate().insert(target, vec![row]).await?;
            info!(%id, table = target, "promotion inserted");
        }
    }

    remote
        .mutate()
        .delete(source, &[Condition::eq("id", key)])
        .await
        .map_err(|e| {
            error!(%id, table = source, error = %e, "promotion incomplete");
            ReviewError::PartialPromotion {
                kind,
                id: id.to_string(),
                source: e,
            }
        })?;
    info!(%id, table = source, "promotion completed");
    Ok(())
}

async fn update_status(
    remote: &dyn Remote,
    kind: ApplicationKind,
    id: &str,
    status: ApplicationStatus,
) -> ReviewResult<()> {
    let source = kind.source_table();
    let key = id_value(id);

    let mut patch = Row::new();
    patch.insert("status".to_string(), status.as_str().into());
    let updated = remote
        .mutate()
        .update(
            source,
            patch,
            &[
                Condition::eq("id", key.clone()),
                Condition::eq("status", ApplicationStatus::Pending.as_str()),
            ],
        )
        .await?;
    if !updated.is_empty() {
        info!(%id, table = source, "status updated");
        return Ok(());
    }

    let selection = remote
        .query()
        .select(&Select::table(source).columns("id,status").eq("id", key).limit(1))
        .await?;
    match selection.rows.first() {
        None => Err(not_found(source, id)),
        Some(row) => Err(ReviewError::InvalidTransition {
            from: row_status(row)?,
            to: status,
        }),
    }
}
