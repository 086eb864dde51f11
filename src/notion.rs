use anyhow::Context;
use serde::Deserialize;
use serde_json::json;

use crate::models::ApplicationRecord;

const NOTION_VERSION: &str = "2022-06-28";
const PAGE_SIZE: u32 = 100;

/// One page of a database query.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<ApplicationRecord>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

pub struct NotionClient {
    client: reqwest::Client,
    token: String,
    query_url: String,
}

impl NotionClient {
    pub fn new(token: String, database_id: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            query_url: format!("https://api.notion.com/v1/databases/{database_id}/query"),
        }
    }

    /// Fetches the complete record collection, following the pagination
    /// cursor until the source reports no further pages. Any non-success
    /// page aborts the whole fetch; already-fetched pages are discarded.
    pub async fn fetch_all(&self) -> anyhow::Result<Vec<ApplicationRecord>> {
        let mut all_results = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.query_page(cursor.as_deref()).await?;
            cursor = append_page(&mut all_results, page);
            if cursor.is_none() {
                break;
            }
        }

        Ok(all_results)
    }

    async fn query_page(&self, cursor: Option<&str>) -> anyhow::Result<QueryResponse> {
        let mut body = json!({ "page_size": PAGE_SIZE });
        if let Some(cursor) = cursor {
            body["start_cursor"] = json!(cursor);
        }

        let response = self
            .client
            .post(&self.query_url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .context("database query request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("database query returned {status}: {body}");
        }

        response
            .json::<QueryResponse>()
            .await
            .context("failed to decode query response")
    }
}

/// Appends one page of results and returns the cursor for the next request,
/// or `None` when the source signals the collection is exhausted.
fn append_page(
    all_results: &mut Vec<ApplicationRecord>,
    page: QueryResponse,
) -> Option<String> {
    all_results.extend(page.results);
    if page.has_more {
        page.next_cursor
    } else {
        None
    }
}
