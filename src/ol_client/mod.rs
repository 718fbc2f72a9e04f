// Thin HTTP client for the Open Library catalog

use serde::Deserialize;

/// Cover image size selector for `OlClient::cover_url`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    Medium,
    Large,
}

impl CoverSize {
    fn suffix(self) -> &'static str {
        match self {
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

#[derive(Clone, Debug)]
pub struct OlClient {
    base_url: String,
    covers_base_url: String,
    client: reqwest::Client,
}

impl OlClient {
    /// Create a new client with the given base URLs (e.g. "https://openlibrary.org"
    /// and "https://covers.openlibrary.org").
    pub fn new(
        base_url: impl Into<String>,
        covers_base_url: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        let base_url_str = base_url.into();
        tracing::debug!(base_url = %base_url_str, "creating OlClient");
        Ok(OlClient {
            base_url: base_url_str.trim_end_matches('/').to_string(),
            covers_base_url: covers_base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// GET /search.json?q={query}&limit={limit}&offset={offset}
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn search(
        &self,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<SearchResponse> {
        let url = self.url("/search.json");
        tracing::debug!(%url, %query, limit, offset, "GET search");
        let req = self.client.get(&url).query(&[
            ("q", query.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ]);

        let resp = req.send().await?;
        let status = resp.error_for_status()?;
        let body = status.text().await?;
        match serde_json::from_str::<SearchResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                let snippet_len = body.len().min(2000);
                let snippet = &body[..snippet_len];
                tracing::error!(error = %e, body_snippet = %snippet, "failed to parse SearchResponse");
                Err(e.into())
            }
        }
    }

    /// GET /works/{work_id}.json
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_work(&self, work_id: &str) -> anyhow::Result<WorkResponse> {
        let url = self.url(&format!("/works/{}.json", work_id));
        tracing::debug!(%url, "GET work");
        let resp = self.client.get(&url).send().await?;
        let status = resp.error_for_status()?;
        let body = status.text().await?;
        let parsed: WorkResponse = serde_json::from_str(&body)?;
        Ok(parsed)
    }

    /// Build the public cover image URL for a numeric cover id. This does
    /// not perform a request; a book without a cover id has no URL.
    /// Example: client.cover_url(8739161, CoverSize::Medium)
    pub fn cover_url(&self, cover_id: i64, size: CoverSize) -> String {
        format!(
            "{}/b/id/{}-{}.jpg",
            self.covers_base_url,
            cover_id,
            size.suffix()
        )
    }
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct SearchDoc {
    /// Path-shaped key, e.g. "/works/OL45883W"
    pub key: String,
    pub title: String,
    pub author_name: Option<Vec<String>>,
    pub cover_i: Option<i64>,
    pub first_publish_year: Option<i64>,
    pub edition_count: Option<i64>,
    pub number_of_pages_median: Option<i64>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct WorkResponse {
    pub key: Option<String>,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text_or_value")]
    pub description: Option<String>,
    #[serde(default)]
    pub covers: Vec<i64>,
    pub first_publish_date: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
}

/// Internal serde helpers
pub mod de {
    use serde::{Deserialize, Deserializer};

    /// Accept Option<String> from either a plain string or a `{"value": "..."}`
    /// wrapper; the works endpoint returns both shapes. null/absent -> None.
    pub fn opt_text_or_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum TextOrValue {
            Plain(String),
            Wrapped { value: String },
        }

        let val: Option<TextOrValue> = Option::deserialize(deserializer)?;
        Ok(match val {
            None => None,
            Some(TextOrValue::Plain(s)) => Some(s),
            Some(TextOrValue::Wrapped { value }) => Some(value),
        })
    }
}
