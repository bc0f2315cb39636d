//! Published events.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::{APPLICATION_DOCS_BUCKET, select_all};
use crate::hooks::{Fetch, QueryParams};
use crate::serde_utils::string_or_number;
use crate::store::{Order, Remote, Select, StoreResult};

pub const TABLE: &str = "events";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_at: Option<String>,
    pub duration: Option<String>,
    pub organizers: Option<Vec<String>>,
    pub submitted_at: Option<String>,
    /// Public URL once listed; a bucket path in the table.
    pub image_url: Option<String>,
    pub created_at: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
}

/// Events by start time, soonest first, with image paths resolved to URLs.
pub async fn list_events(remote: &dyn Remote) -> StoreResult<Vec<Event>> {
    let mut events: Vec<Event> =
        select_all(remote, Select::table(TABLE).order(Order::asc("start_at"))).await?;
    let storage = remote.storage();
    for event in &mut events {
        if let Some(path) = event.image_url.as_deref().filter(|p| !p.is_empty()) {
            event.image_url = Some(storage.public_url(APPLICATION_DOCS_BUCKET, path));
        }
    }
    Ok(events)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EventsQuery;

#[async_trait]
impl Fetch for EventsQuery {
    type Output = Vec<Event>;

    async fn fetch(&self, remote: &dyn Remote, _params: &QueryParams) -> StoreResult<Vec<Event>> {
        list_events(remote).await
    }
}
