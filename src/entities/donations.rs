//! Published donation drives.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::{APPLICATION_DOCS_BUCKET, select_all};
use crate::hooks::{Fetch, QueryParams};
use crate::serde_utils::string_or_number;
use crate::store::{Order, Remote, Select, StoreResult};

pub const TABLE: &str = "donations";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub user_id: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub cause: Option<String>,
    pub open_till: Option<String>,
    pub submitted_at: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Option<String>,
}

/// Donations, most recently submitted first.
pub async fn list_donations(remote: &dyn Remote) -> StoreResult<Vec<Donation>> {
    let mut donations: Vec<Donation> =
        select_all(remote, Select::table(TABLE).order(Order::desc("submitted_at"))).await?;
    let storage = remote.storage();
    for donation in &mut donations {
        if let Some(path) = donation.image_url.as_deref().filter(|p| !p.is_empty()) {
            donation.image_url = Some(storage.public_url(APPLICATION_DOCS_BUCKET, path));
        }
    }
    Ok(donations)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DonationsQuery;

#[async_trait]
impl Fetch for DonationsQuery {
    type Output = Vec<Donation>;

    async fn fetch(&self, remote: &dyn Remote, _params: &QueryParams) -> StoreResult<Vec<Donation>> {
        list_donations(remote).await
    }
}
