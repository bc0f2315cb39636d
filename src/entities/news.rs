use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::select_all;
use crate::hooks::{Fetch, QueryParams};
use crate::serde_utils::string_or_number;
use crate::store::{Remote, Select, StoreResult};

pub const TABLE: &str = "articles";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: Option<String>,
    pub body: Option<String>,
    pub header_image_url: Option<String>,
    pub created_at: Option<String>,
    #[serde(alias = "userName")]
    pub user_name: Option<String>,
}

pub async fn list_articles(remote: &dyn Remote) -> StoreResult<Vec<Article>> {
    select_all(remote, Select::table(TABLE)).await
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NewsQuery;

#[async_trait]
impl Fetch for NewsQuery {
    type Output = Vec<Article>;

    async fn fetch(&self, remote: &dyn Remote, _params: &QueryParams) -> StoreResult<Vec<Article>> {
        list_articles(remote).await
    }
}
