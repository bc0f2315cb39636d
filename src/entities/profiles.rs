//! Community members (`profiles` table).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::entities::{select_all, single};
use crate::hooks::TableQuery;
use crate::serde_utils::{id_value, opt_string_or_number};
use crate::store::{
    Condition, Remote, Select, StoreError, StoreResult, UploadOptions, encode_row, value_text,
};

pub const TABLE: &str = "profiles";
pub const PICTURE_BUCKET: &str = "profile-pictures";
pub const SEARCH_COLUMNS: &[&str] = &["name", "surname", "email", "mobile_no1"];

/// One member row. Every column except `id` may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub family_no: Option<String>,
    pub surname: Option<String>,
    pub name: Option<String>,
    pub fathers_or_husbands_name: Option<String>,
    pub father_in_laws_name: Option<String>,
    pub gender: Option<String>,
    pub relationship: Option<String>,
    pub marital_status: Option<String>,
    pub marriage_date: Option<String>,
    /// `DD/Mon/YY` or `DD/Mon/YYYY`
    pub date_of_birth: Option<String>,
    pub education: Option<String>,
    pub stream: Option<String>,
    pub qualification: Option<String>,
    pub occupation: Option<String>,
    pub email: Option<String>,
    pub profile_pic: Option<String>,
    pub family_cover_pic: Option<String>,
    pub blood_group: Option<String>,
    pub native_place: Option<String>,
    pub residential_address_line1: Option<String>,
    pub residential_address_state: Option<String>,
    pub residential_address_city: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub pin_code: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub residential_landline: Option<String>,
    pub office_address: Option<String>,
    pub office_address_state: Option<String>,
    pub office_address_city: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub office_address_pin: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub landline_office: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub mobile_no1: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub mobile_no2: Option<String>,
    pub date_of_demise: Option<String>,
    pub updated_at: Option<String>,
}

impl Profile {
    /// `name surname`, trimmed.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.name.as_deref().unwrap_or_default(),
            self.surname.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }
}

/// Paged member list searchable by name, surname, email and primary mobile.
pub fn profiles_query() -> TableQuery<Profile> {
    TableQuery::new(TABLE).search(SEARCH_COLUMNS)
}

pub async fn fetch_profile(remote: &dyn Remote, id: &str) -> StoreResult<Profile> {
    let rows = remote
        .query()
        .select(&Select::table(TABLE).eq("id", id_value(id)).limit(1))
        .await?
        .rows;
    single(rows, TABLE, id)
}

/// Every member registered under `family_no`.
pub async fn verify_family(remote: &dyn Remote, family_no: &str) -> StoreResult<Vec<Profile>> {
    select_all(remote, Select::table(TABLE).eq("family_no", id_value(family_no.trim()))).await
}

/// Decode the payload of a `data:image/...;base64,` URL.
fn decode_data_url(data_url: &str) -> StoreResult<Vec<u8>> {
    let payload = data_url
        .split_once(',')
        .map(|(_, payload)| payload)
        .ok_or_else(|| StoreError::validation("profile picture is not a data URL"))?;
    STANDARD
        .decode(payload.trim())
        .map_err(|e| StoreError::validation(format!("profile picture is not valid base64: {e}")))
}

/// Member writes.
pub struct MemberOperations<'a> {
    remote: &'a dyn Remote,
}

impl<'a> MemberOperations<'a> {
    pub fn new(remote: &'a dyn Remote) -> Self {
        Self { remote }
    }

    /// Insert a new member, or update `member.id` when `is_update` is set.
    ///
    /// A `data:image` profile picture is uploaded first and replaced by its
    /// public URL. Returns the stored row.
    #[instrument(skip(self, member), fields(id = ?member.id), err)]
    pub async fn save(&self, member: &Profile, is_update: bool) -> StoreResult<Profile> {
        let mut member = member.clone();
        member.updated_at = Some(Utc::now().to_rfc3339());

        if let Some(data_url) = member
            .profile_pic
            .clone()
            .filter(|pic| pic.starts_with("data:image"))
        {
            let bytes = decode_data_url(&data_url)?;
            let file_name = format!("profile-{}.jpg", Utc::now().timestamp_millis());
            let storage = self.remote.storage();
            storage
                .upload(
                    PICTURE_BUCKET,
                    &file_name,
                    bytes,
                    &UploadOptions::new("image/jpeg"),
                )
                .await?;
            debug!(file = %file_name, "uploaded profile picture");
            member.profile_pic = Some(storage.public_url(PICTURE_BUCKET, &file_name));
        }

        let id = member.id.take();
        let mut row = encode_row(&member)?;
        if let Some(family_no) = row.get("family_no").map(value_text) {
            row.insert("family_no".to_string(), id_value(family_no.trim()));
        }

        match id.filter(|_| is_update) {
            Some(id) => {
                let rows = self
                    .remote
                    .mutate()
                    .update(TABLE, row, &[Condition::eq("id", id_value(&id))])
                    .await?;
                single(rows, TABLE, &id)
            }
            None => {
                let rows = self.remote.mutate().insert(TABLE, vec![row]).await?;
                single(rows, TABLE, "new")
            }
        }
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let removed = self
            .remote
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
}

#[cfg(test)]
#[path = "profiles_test.rs"]
mod profiles_test;
