//! Committees.
//!
//! The `committee` table is flat: one row per member, carrying the committee's
//! name. Rows are grouped into committees by a normalized name key.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::entities::{is_visible_object, require, select_all, single};
use crate::hooks::{Fetch, QueryParams};
use crate::serde_utils::{id_value, opt_string_or_number, string_or_number};
use crate::store::{
    Condition, Order, Remote, Row, Select, StoreError, StoreResult, UploadOptions, encode_row,
};

pub const TABLE: &str = "committee";
pub const IMAGE_BUCKET: &str = "committee-pictures";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitteeRow {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub created_at: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub phone: Option<String>,
    pub location: Option<String>,
    pub member_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MemberRole {
    Head,
    Member,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitteeMember {
    /// Row id of this membership.
    pub id: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub role: MemberRole,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Committee {
    pub key: String,
    pub name: String,
    pub image_url: Option<String>,
    pub members: Vec<CommitteeMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitteeImage {
    pub name: String,
    pub url: String,
    pub created_at: Option<String>,
}

/// Grouping key for a committee name.
pub fn committee_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn image_key(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _)| stem);
    committee_key(stem)
}

/// Group rows by committee in first-seen order.
///
/// The first row of a group names the committee and is its `Head`. Rows with a
/// blank name are skipped. The cover image is the file whose name without
/// extension matches the key.
pub fn group_committees(rows: &[CommitteeRow], images: &[CommitteeImage]) -> Vec<Committee> {
    let mut committees: Vec<Committee> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let Some(name) = row.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
            continue;
        };
        let key = committee_key(name);
        let position = *index.entry(key.clone()).or_insert_with(|| {
            committees.push(Committee {
                image_url: images
                    .iter()
                    .find(|img| image_key(&img.name) == key)
                    .map(|img| img.url.clone()),
                key,
                name: name.to_string(),
                members: Vec::new(),
            });
            committees.len() - 1
        });
        let committee = &mut committees[position];
        let role = if committee.members.is_empty() {
            MemberRole::Head
        } else {
            MemberRole::Member
        };
        committee.members.push(CommitteeMember {
            id: row.id.clone(),
            name: row.member_name.clone(),
            phone: row.phone.clone(),
            location: row.location.clone(),
            role,
        });
    }
    committees
}

pub async fn committee_rows(remote: &dyn Remote) -> StoreResult<Vec<CommitteeRow>> {
    select_all(remote, Select::table(TABLE).order(Order::desc("created_at"))).await
}

/// Every image in the committee bucket with its public URL.
pub async fn committee_images(remote: &dyn Remote) -> StoreResult<Vec<CommitteeImage>> {
    let storage = remote.storage();
    Ok(storage
        .list(IMAGE_BUCKET, "")
        .await?
        .into_iter()
        .filter(|f| is_visible_object(&f.name))
        .map(|f| CommitteeImage {
            url: storage.public_url(IMAGE_BUCKET, &f.name),
            name: f.name,
            created_at: f.created_at,
        })
        .collect())
}

/// Grouped committees with their cover images, newest rows first.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitteesQuery;

#[async_trait]
impl Fetch for CommitteesQuery {
    type Output = Vec<Committee>;

    async fn fetch(&self, remote: &dyn Remote, _params: &QueryParams) -> StoreResult<Vec<Committee>> {
        let (rows, images) =
            futures_util::try_join!(committee_rows(remote), committee_images(remote))?;
        Ok(group_committees(&rows, &images))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewCommittee {
    pub name: String,
    pub location: String,
    pub member_name: String,
    pub phone: String,
}

/// Create a committee with its first (head) member.
#[instrument(skip(remote, committee), fields(name = %committee.name), err)]
pub async fn add_committee(remote: &dyn Remote, committee: &NewCommittee) -> StoreResult<CommitteeRow> {
    require("committee name", &committee.name)?;
    require("member name", &committee.member_name)?;
    let rows = remote
        .mutate()
        .insert(TABLE, vec![encode_row(committee)?])
        .await?;
    single(rows, TABLE, "new")
}

/// Add a member row to an existing committee.
#[instrument(skip(remote, phone, location), err)]
pub async fn add_member(
    remote: &dyn Remote,
    committee_name: &str,
    member_name: &str,
    phone: &str,
    location: Option<&str>,
) -> StoreResult<CommitteeRow> {
    add_committee(
        remote,
        &NewCommittee {
            name: committee_name.trim().to_string(),
            location: location.unwrap_or_default().to_string(),
            member_name: member_name.to_string(),
            phone: phone.to_string(),
        },
    )
    .await
}

#[instrument(skip(remote, patch), err)]
pub async fn update_committee(remote: &dyn Remote, id: &str, patch: Row) -> StoreResult<CommitteeRow> {
    let rows = remote
        .mutate()
        .update(TABLE, patch, &[Condition::eq("id", id_value(id))])
        .await?;
    single(rows, TABLE, id)
}

/// Delete one membership row.
#[instrument(skip(remote), err)]
pub async fn delete_committee(remote: &dyn Remote, id: &str) -> StoreResult<()> {
    let removed = remote
        .mutate()
        .delete(TABLE, &[Condition::eq("id", id_value(id))])
        .await?;
    if removed.is_empty() {
        return Err(StoreError::NotFound {
            table: TABLE.to_string(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Delete every row of the committee named `name` (matched by key). Returns
/// the number of removed rows.
#[instrument(skip(remote), err)]
pub async fn delete_committee_by_name(remote: &dyn Remote, name: &str) -> StoreResult<usize> {
    let key = committee_key(name);
    let ids: Vec<_> = committee_rows(remote)
        .await?
        .into_iter()
        .filter(|row| row.name.as_deref().map(committee_key).as_deref() == Some(key.as_str()))
        .map(|row| id_value(&row.id))
        .collect();
    if ids.is_empty() {
        return Ok(0);
    }
    let removed = remote
        .mutate()
        .delete(TABLE, &[Condition::In {
            column: "id".to_string(),
            values: ids,
        }])
        .await?;
    Ok(removed.len())
}

/// Store `<name>.<ext>` in the committee bucket, replacing any previous file,
/// and return its public URL.
#[instrument(skip(remote, bytes), fields(size = bytes.len()), err)]
pub async fn upload_committee_image(
    remote: &dyn Remote,
    name: &str,
    bytes: Vec<u8>,
    ext: &str,
) -> StoreResult<String> {
    require("committee name", name)?;
    let ext = ext.trim().trim_start_matches('.');
    let path = format!("{}.{}", name.trim(), if ext.is_empty() { "jpg" } else { ext });
    let content_type = mime_guess::from_path(&path).first_or_octet_stream();
    let storage = remote.storage();
    let stored = storage
        .upload(
            IMAGE_BUCKET,
            &path,
            bytes,
            &UploadOptions::new(content_type.essence_str()).upsert(),
        )
        .await?;
    Ok(storage.public_url(IMAGE_BUCKET, &stored))
}

#[cfg(test)]
#[path = "committees_test.rs"]
mod committees_test;
