//! Shubh Chintak magazine issues.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::select_all;
use crate::hooks::{Fetch, QueryParams};
use crate::serde_utils::string_or_number;
use crate::store::{Order, Remote, Select, StoreResult};

pub const TABLE: &str = "shubh_chintak";
pub const BUCKET: &str = "shubh-chintak";
const COVER_FOLDER: &str = "magzine-cover";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Magazine {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub created_at: Option<String>,
    pub file_url: Option<String>,
    pub title: Option<String>,
    pub cover_image_name: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
}

/// Issues newest first, optionally capped at `limit`.
pub async fn list_magazines(remote: &dyn Remote, limit: Option<usize>) -> StoreResult<Vec<Magazine>> {
    let mut query = Select::table(TABLE).order(Order::desc("created_at"));
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    let mut magazines: Vec<Magazine> = select_all(remote, query).await?;
    let storage = remote.storage();
    for magazine in &mut magazines {
        if let Some(cover) = magazine.cover_image_name.as_deref().filter(|c| !c.is_empty()) {
            magazine.cover_image_url =
                Some(storage.public_url(BUCKET, &format!("{COVER_FOLDER}/{cover}.png")));
        }
    }
    Ok(magazines)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MagazinesQuery {
    pub limit: Option<usize>,
}

#[async_trait]
impl Fetch for MagazinesQuery {
    type Output = Vec<Magazine>;

    async fn fetch(&self, remote: &dyn Remote, _params: &QueryParams) -> StoreResult<Vec<Magazine>> {
        list_magazines(remote, self.limit).await
    }
}
