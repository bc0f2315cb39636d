//! Doctor directory.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::entities::{require, single};
use crate::hooks::TableQuery;
use crate::serde_utils::{id_value, opt_string_or_number};
use crate::store::{Condition, Order, Remote, Row, StoreResult, encode_row};

pub const TABLE: &str = "doctors";
pub const SEARCH_COLUMNS: &[&str] = &["name", "specialization", "qualification"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub qualification: Option<String>,
    pub experience_years: Option<i64>,
    pub clinic_address: Option<String>,
    pub contact_email: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub contact_phone: Option<String>,
    pub available_timings: Option<String>,
    pub created_at: Option<String>,
}

/// Input for [`add_doctor`]. Name, specialization and qualification are required.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewDoctor {
    pub name: String,
    pub specialization: String,
    pub qualification: String,
    pub experience_years: i64,
    pub clinic_address: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub available_timings: String,
}

impl NewDoctor {
    pub fn validate(&self) -> StoreResult<()> {
        require("name", &self.name)?;
        require("specialization", &self.specialization)?;
        require("qualification", &self.qualification)
    }
}

/// Paged doctors, newest first.
pub fn doctors_query() -> TableQuery<Doctor> {
    TableQuery::new(TABLE)
        .search(SEARCH_COLUMNS)
        .order(Order::desc("created_at"))
}

#[instrument(skip(remote, doctor), fields(name = %doctor.name), err)]
pub async fn add_doctor(remote: &dyn Remote, doctor: &NewDoctor) -> StoreResult<Doctor> {
    doctor.validate()?;
    let rows = remote.mutate().insert(TABLE, vec![encode_row(doctor)?]).await?;
    single(rows, TABLE, "new")
}

/// Apply a partial update to one doctor.
#[instrument(skip(remote, patch), err)]
pub async fn update_doctor(remote: &dyn Remote, id: &str, patch: Row) -> StoreResult<Doctor> {
    let rows = remote
        .mutate()
        .update(TABLE, patch, &[Condition::eq("id", id_value(id))])
        .await?;
    single(rows, TABLE, id)
}
