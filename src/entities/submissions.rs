//! Public submission of event and donation applications.
//!
//! The row is inserted first as pending; the optional image is uploaded to
//! `application-pictures/<id>.<ext>` and its path written back to the row.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::entities::{extension, require, single};
use crate::review::{Application, ApplicationKind, ApplicationStatus};
use crate::store::{Condition, Remote, Row, StoreError, StoreResult, UploadOptions, encode_row};

pub const PICTURE_BUCKET: &str = "application-pictures";

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Guessed from the file name when unset.
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EventSubmission {
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub start_at: String,
    pub duration: String,
    pub organizers: Vec<String>,
    #[serde(skip)]
    pub image: Option<ImageUpload>,
}

impl EventSubmission {
    pub fn validate(&self) -> StoreResult<()> {
        require("user_id", &self.user_id)?;
        require("name", &self.name)?;
        require("description", &self.description)?;
        require("start_at", &self.start_at)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DonationSubmission {
    pub user_id: String,
    pub amount: f64,
    pub description: String,
    pub cause: String,
    pub open_till: String,
    #[serde(skip)]
    pub image: Option<ImageUpload>,
}

impl DonationSubmission {
    pub fn validate(&self) -> StoreResult<()> {
        require("user_id", &self.user_id)?;
        require("cause", &self.cause)?;
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(StoreError::validation("amount must be greater than zero"));
        }
        Ok(())
    }
}

pub async fn submit_event(remote: &dyn Remote, submission: EventSubmission) -> StoreResult<Application> {
    submission.validate()?;
    let row = encode_row(&submission)?;
    submit(remote, ApplicationKind::Event, row, submission.image).await
}

pub async fn submit_donation(
    remote: &dyn Remote,
    submission: DonationSubmission,
) -> StoreResult<Application> {
    submission.validate()?;
    let row = encode_row(&submission)?;
    submit(remote, ApplicationKind::Donation, row, submission.image).await
}

#[instrument(skip(remote, kind, row, image), fields(kind = %kind), err)]
async fn submit(
    remote: &dyn Remote,
    kind: ApplicationKind,
    mut row: Row,
    image: Option<ImageUpload>,
) -> StoreResult<Application> {
    let table = kind.source_table();
    row.insert(
        "status".to_string(),
        Value::String(ApplicationStatus::Pending.as_str().to_string()),
    );
    let inserted = remote.mutate().insert(table, vec![row]).await?;
    let application: Application = single(inserted, table, "new")?;
    info!(table, id = %application.id, "application submitted");

    let Some(image) = image else {
        return Ok(application);
    };
    let path = format!("{}.{}", application.id, extension(&image.file_name));
    let content_type = image.content_type.clone().unwrap_or_else(|| {
        mime_guess::from_path(&image.file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    });
    let stored = remote
        .storage()
        .upload(PICTURE_BUCKET, &path, image.bytes, &UploadOptions::new(content_type))
        .await?;

    let mut patch = Row::new();
    patch.insert("image_url".to_string(), Value::String(stored));
    let updated = remote
        .mutate()
        .update(table, patch, &[Condition::eq("id", application.id.as_str())])
        .await?;
    single(updated, table, &application.id)
}

#[cfg(test)]
#[path = "submissions_test.rs"]
mod submissions_test;
