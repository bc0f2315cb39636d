use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::{PostgrestClient, encode};
use crate::store::{FileEntry, StorageClient, StoreError, StoreResult, UploadOptions};

const LIST_LIMIT: usize = 100;

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(rename = "Key")]
    key: Option<String>,
}

async fn check_storage(response: Response, bucket: &str) -> StoreResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(StoreError::Storage {
        bucket: bucket.to_string(),
        message: encode::error_message(&body),
    })
}

#[async_trait]
impl StorageClient for PostgrestClient {
    #[instrument(skip(self, bytes, options), fields(size = bytes.len()), err)]
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> StoreResult<String> {
        let url = self.storage_url(&format!("object/{bucket}/{path}"));
        let request = self
            .authorize(self.client.post(url))
            .header("content-type", &options.content_type)
            .header("x-upsert", if options.upsert { "true" } else { "false" })
            .body(bytes);
        let response = check_storage(request.send().await?, bucket).await?;
        let uploaded: UploadResponse = response.json().await?;
        // The returned key is prefixed with the bucket name.
        Ok(uploaded
            .key
            .as_deref()
            .and_then(|k| k.strip_prefix(&format!("{bucket}/")).map(str::to_string))
            .unwrap_or_else(|| path.to_string()))
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.storage_url(&format!("object/public/{bucket}/{path}"))
    }

    #[instrument(skip(self), err)]
    async fn list(&self, bucket: &str, prefix: &str) -> StoreResult<Vec<FileEntry>> {
        let request = self
            .authorize(self.client.post(self.storage_url(&format!("object/list/{bucket}"))))
            .json(&json!({
                "prefix": prefix.trim_matches('/'),
                "limit": LIST_LIMIT,
                "offset": 0,
                "sortBy": { "column": "name", "order": "asc" },
            }));
        let response = check_storage(request.send().await?, bucket).await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self), err)]
    async fn remove(&self, bucket: &str, paths: &[String]) -> StoreResult<()> {
        let request = self
            .authorize(self.client.delete(self.storage_url(&format!("object/{bucket}"))))
            .json(&json!({ "prefixes": paths }));
        check_storage(request.send().await?, bucket).await?;
        Ok(())
    }
}
