//! Nari Sahas business directory.
//!
//! Logos and gallery images live in the `businesses` bucket under
//! `<user_id>/logo/` and `<user_id>/images/`.

use async_trait::async_trait;
use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::entities::{is_visible_object, select_all};
use crate::hooks::{Fetch, QueryParams};
use crate::serde_utils::string_or_number;
use crate::store::{Remote, Select, StoreResult};

pub const TABLE: &str = "nari_sahas";
pub const BUCKET: &str = "businesses";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub created_at: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Public URLs of the visible files under `folder`.
async fn folder_urls(remote: &dyn Remote, folder: &str) -> StoreResult<Vec<String>> {
    let storage = remote.storage();
    Ok(storage
        .list(BUCKET, folder)
        .await?
        .into_iter()
        .filter(|f| is_visible_object(&f.name))
        .map(|f| storage.public_url(BUCKET, &format!("{folder}/{}", f.name)))
        .collect())
}

async fn with_media(remote: &dyn Remote, mut business: Business) -> StoreResult<Business> {
    let Some(user_id) = business.user_id.clone().filter(|u| !u.is_empty()) else {
        return Ok(business);
    };
    let logo_folder = format!("{user_id}/logo");
    let image_folder = format!("{user_id}/images");
    let (logos, images) = futures_util::try_join!(
        folder_urls(remote, &logo_folder),
        folder_urls(remote, &image_folder),
    )?;
    business.logo = logos.into_iter().next();
    business.images = images;
    Ok(business)
}

pub async fn list_businesses(remote: &dyn Remote) -> StoreResult<Vec<Business>> {
    let businesses: Vec<Business> = select_all(remote, Select::table(TABLE)).await?;
    try_join_all(businesses.into_iter().map(|b| with_media(remote, b))).await
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BusinessesQuery;

#[async_trait]
impl Fetch for BusinessesQuery {
    type Output = Vec<Business>;

    async fn fetch(&self, remote: &dyn Remote, _params: &QueryParams) -> StoreResult<Vec<Business>> {
        list_businesses(remote).await
    }
}
