use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::retry::{classify_status, with_retry, RetryConfig};
use crate::types::{BusinessRecord, CategoryRecord};

const BUSINESSES: &str = "businesses";
const CATEGORIES: &str = "categories";

/// Read-only client for the directory tables
///
/// The backend speaks the PostgREST dialect: every table lives under
/// `/rest/v1/<table>` and filters are query parameters like `category=eq.Food`.
pub struct DirectoryClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    retry_config: RetryConfig,
}

impl DirectoryClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        Self::with_timeout(base_url, api_key, Duration::from_secs(10))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("AltDir/0.1.0"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            retry_config: RetryConfig::default(),
        })
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub async fn list_businesses(&self) -> Result<Vec<BusinessRecord>> {
        self.select(BUSINESSES, &[("order", "id.asc".to_string())]).await
    }

    pub async fn businesses_by_category(&self, category: &str) -> Result<Vec<BusinessRecord>> {
        self.select(BUSINESSES, &[("category", format!("eq.{}", category))])
            .await
    }

    pub async fn businesses_by_subcategory(&self, subcategory: &str) -> Result<Vec<BusinessRecord>> {
        self.select(BUSINESSES, &[("subcategory", format!("eq.{}", subcategory))])
            .await
    }

    /// Rows whose `tags` array contains the given tag
    pub async fn businesses_by_tag(&self, tag: &str) -> Result<Vec<BusinessRecord>> {
        self.select(BUSINESSES, &[("tags", format!("cs.{{{}}}", tag))])
            .await
    }

    pub async fn business(&self, id: &str) -> Result<BusinessRecord> {
        let mut rows: Vec<BusinessRecord> = self
            .select(BUSINESSES, &[("id", format!("eq.{}", id)), ("limit", "1".into())])
            .await?;

        rows.pop().ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    /// Case-insensitive substring search over name and description
    pub async fn search_businesses(&self, query: &str) -> Result<Vec<BusinessRecord>> {
        let needle = sanitize_pattern(query);
        self.select(
            BUSINESSES,
            &[(
                "or",
                format!("(name.ilike.*{0}*,description.ilike.*{0}*)", needle),
            )],
        )
        .await
    }

    /// One page of businesses, pages numbered from 1
    pub async fn businesses_page(
        &self,
        page: u32,
        page_size: u32,
        category: Option<&str>,
    ) -> Result<Vec<BusinessRecord>> {
        let offset = page.saturating_sub(1) as u64 * page_size as u64;
        let mut params = vec![
            ("order", "id.asc".to_string()),
            ("limit", page_size.to_string()),
            ("offset", offset.to_string()),
        ];
        if let Some(category) = category {
            params.push(("category", format!("eq.{}", category)));
        }
        self.select(BUSINESSES, &params).await
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryRecord>> {
        self.select(CATEGORIES, &[("order", "name.asc".to_string())])
            .await
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        debug!("GET {} {:?}", url, filters);

        with_retry(&self.retry_config, || async {
            let mut request = self
                .client
                .get(&url)
                .query(&[("select", "*")])
                .query(filters);

            if let Some(ref key) = self.api_key {
                request = request.header("apikey", key).bearer_auth(key);
            }

            let response = request.send().await?;
            let status = response.status();

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(classify_status(status, body));
            }

            let bytes = response.bytes().await?;
            let rows: Vec<T> = serde_json::from_slice(&bytes)?;
            Ok(rows)
        })
        .await
    }
}

/// PostgREST reserves `,` `(` `)` inside `or=` groups and `*` as the wildcard
fn sanitize_pattern(query: &str) -> String {
    query
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '*'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_pattern_strips_reserved() {
        assert_eq!(sanitize_pattern("  food (delivery), fast*"), "food delivery fast");
        assert_eq!(sanitize_pattern("netflix"), "netflix");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = DirectoryClient::new("https://db.example.com/", None).unwrap();
        assert_eq!(client.base_url, "https://db.example.com");
    }
}
