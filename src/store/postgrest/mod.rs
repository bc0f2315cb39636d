//! HTTP client for the hosted row API (`/rest/v1`) and storage API
//! (`/storage/v1`).

mod client;
pub mod encode;
mod storage;

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use reqwest::{Client, RequestBuilder, Response};

use crate::config::Config;
use crate::store::{
    MutationClient, QueryClient, Remote, StorageClient, StoreError, StoreResult,
};

/// Remote client for one project.
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    base_url: String,
    anon_key: String,
    client: Client,
}

impl PostgrestClient {
    /// Build a client from resolved configuration.
    ///
    /// Installs the ring crypto provider for rustls if none is installed yet.
    pub fn new(config: &Config) -> StoreResult<Self> {
        let _ = rustls::crypto::ring::default_provider().install_default();
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn storage_url(&self, path: &str) -> String {
        format!("{}/storage/v1/{}", self.base_url, path)
    }

    /// Attach the project key as both `apikey` and bearer token.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }
}

/// Map a non-success row API response onto [`StoreError`].
async fn check(response: Response, table: &str) -> StoreResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let message = encode::error_message(&body);
    Err(match status {
        409 => StoreError::Conflict {
            table: table.to_string(),
            message,
        },
        _ => StoreError::Api { status, message },
    })
}

impl Remote for PostgrestClient {
    fn query(&self) -> &dyn QueryClient {
        self
    }

    fn mutate(&self) -> &dyn MutationClient {
        self
    }

    fn storage(&self) -> &dyn StorageClient {
        self
    }
}
