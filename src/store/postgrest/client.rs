use async_trait::async_trait;
use tracing::instrument;

use super::{PostgrestClient, check, encode};
use crate::store::{Condition, MutationClient, QueryClient, Row, Select, Selection, StoreResult};

const RETURN_REPRESENTATION: &str = "return=representation";

#[async_trait]
impl QueryClient for PostgrestClient {
    #[instrument(skip(self, query), fields(table = %query.table), err)]
    async fn select(&self, query: &Select) -> StoreResult<Selection> {
        let url = self.rest_url(&query.table);
        let request = if query.head {
            self.client.head(&url)
        } else {
            self.client.get(&url)
        };
        let mut request = self
            .authorize(request)
            .query(&encode::select_params(query));
        if query.count {
            request = request.header("Prefer", "count=exact");
        }

        let response = check(request.send().await?, &query.table).await?;
        let count = if query.count {
            response
                .headers()
                .get("content-range")
                .and_then(|v| v.to_str().ok())
                .and_then(encode::parse_content_range)
        } else {
            None
        };
        let rows = if query.head {
            Vec::new()
        } else {
            response.json::<Vec<Row>>().await?
        };
        Ok(Selection { rows, count })
    }
}

#[async_trait]
impl MutationClient for PostgrestClient {
    #[instrument(skip(self, rows), fields(rows = rows.len()), err)]
    async fn insert(&self, table: &str, rows: Vec<Row>) -> StoreResult<Vec<Row>> {
        let request = self
            .authorize(self.client.post(self.rest_url(table)))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&rows);
        let response = check(request.send().await?, table).await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self, patch, filter), err)]
    async fn update(
        &self,
        table: &str,
        patch: Row,
        filter: &[Condition],
    ) -> StoreResult<Vec<Row>> {
        let request = self
            .authorize(self.client.patch(self.rest_url(table)))
            .query(&encode::filter_params(filter))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&patch);
        let response = check(request.send().await?, table).await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self, filter), err)]
    async fn delete(&self, table: &str, filter: &[Condition]) -> StoreResult<Vec<Row>> {
        let request = self
            .authorize(self.client.delete(self.rest_url(table)))
            .query(&encode::filter_params(filter))
            .header("Prefer", RETURN_REPRESENTATION);
        let response = check(request.send().await?, table).await?;
        Ok(response.json().await?)
    }
}
