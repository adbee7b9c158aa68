//! Reddit source connector — fetches newest posts from public JSON
//! listings (`/r/<name>/new.json`). No authentication required.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::SourceError;
use crate::pipeline::types::{CandidateItem, SourceConnector};

/// Timeout for a single listing fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Reddit identifies API consumers by User-Agent; default clients get
/// throttled aggressively.
const USER_AGENT: &str = concat!("jobscout/", env!("CARGO_PKG_VERSION"));

pub struct RedditSource {
    base_url: String,
    client: reqwest::Client,
}

// Listing wire format, reduced to the fields the pipeline needs.

#[derive(Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    children: Vec<ListingChild>,
}

#[derive(Deserialize)]
struct ListingChild {
    data: PostData,
}

#[derive(Deserialize)]
struct PostData {
    id: String,
    title: String,
    #[serde(default)]
    selftext: String,
    permalink: String,
}

impl RedditSource {
    pub fn new() -> Self {
        Self::with_base_url("https://www.reddit.com")
    }

    /// Override the API host (used by tests against a local stub).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

impl Default for RedditSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceConnector for RedditSource {
    fn name(&self) -> &str {
        "reddit"
    }

    async fn list_new(
        &self,
        source: &str,
        limit: usize,
    ) -> Result<Vec<CandidateItem>, SourceError> {
        let url = format!(
            "{}/r/{}/new.json?limit={}&raw_json=1",
            self.base_url, source, limit
        );

        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| SourceError::Fetch {
                source_name: source.to_string(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(SourceError::Fetch {
                source_name: source.to_string(),
                reason: format!("HTTP {}", resp.status()),
            });
        }

        let listing: Listing = resp.json().await.map_err(|e| SourceError::Decode {
            source_name: source.to_string(),
            reason: e.to_string(),
        })?;

        let items = listing
            .data
            .children
            .into_iter()
            .take(limit)
            .map(|child| CandidateItem {
                id: child.data.id,
                source: source.to_string(),
                title: child.data.title,
                body: child.data.selftext,
                permalink: format!("https://reddit.com{}", child.data.permalink),
            })
            .collect();

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_decodes_into_candidate_items() {
        let raw = serde_json::json!({
            "kind": "Listing",
            "data": {
                "children": [
                    {
                        "kind": "t3",
                        "data": {
                            "id": "1abc",
                            "title": "[Task] Need help with small job",
                            "selftext": "Pays $5",
                            "permalink": "/r/slavelabour/comments/1abc/task/",
                            "ups": 3
                        }
                    },
                    {
                        "kind": "t3",
                        "data": {
                            "id": "2def",
                            "title": "Link post, no body",
                            "permalink": "/r/slavelabour/comments/2def/link/"
                        }
                    }
                ]
            }
        });

        let listing: Listing = serde_json::from_value(raw).unwrap();
        assert_eq!(listing.data.children.len(), 2);
        assert_eq!(listing.data.children[0].data.id, "1abc");
        // selftext is optional on link posts
        assert_eq!(listing.data.children[1].data.selftext, "");
    }
}
