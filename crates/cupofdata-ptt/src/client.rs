//! HTTP client for a PTT board's web front end.

use std::time::Duration;

use async_trait::async_trait;
use cupofdata_core::Document;
use cupofdata_extract::{ContentSource, SourceError};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::Client;

use crate::error::PttError;
use crate::parse::{parse_article, parse_board_rows, parse_latest_index};
use crate::retry::retry_with_backoff;
use crate::types::{Article, BoardRow};

/// Answers the age gate that some boards put in front of every page.
const OVER18_COOKIE: &str = "over18=1";

/// Reads board index pages and articles.
///
/// 429, 5xx and network failures are retried with back-off; 404 and parse
/// failures are returned as-is.
pub struct PttClient {
    client: Client,
    base_url: String,
    board: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PttClient {
    /// # Errors
    ///
    /// Returns [`PttError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        base_url: &str,
        board: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, PttError> {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static(OVER18_COOKIE));
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            board: board.to_string(),
            max_retries,
            backoff_base_ms,
        })
    }

    #[must_use]
    pub fn board(&self) -> &str {
        &self.board
    }

    fn index_url(&self, index: Option<u32>) -> String {
        match index {
            Some(n) => format!("{}/bbs/{}/index{n}.html", self.base_url, self.board),
            None => format!("{}/bbs/{}/index.html", self.base_url, self.board),
        }
    }

    /// Number of the newest index page.
    ///
    /// # Errors
    ///
    /// Transport errors after retries, or [`PttError::Parse`] when the board
    /// page has no "上頁" link.
    pub async fn latest_index(&self) -> Result<u32, PttError> {
        let html = self.get_html(&self.index_url(None)).await?;
        parse_latest_index(&html)
    }

    /// Rows on index page `index`.
    ///
    /// # Errors
    ///
    /// Transport errors after retries.
    pub async fn list_page(&self, index: u32) -> Result<Vec<BoardRow>, PttError> {
        let html = self.get_html(&self.index_url(Some(index))).await?;
        Ok(parse_board_rows(&html, &self.base_url))
    }

    /// Rows from the newest `pages` index pages, newest page first.
    ///
    /// Pages that fail are logged and skipped. Rows are deduplicated by URL
    /// and `pacing` is slept between page requests.
    ///
    /// # Errors
    ///
    /// Only a failure to find the newest index is fatal.
    pub async fn list_recent(
        &self,
        pages: u32,
        pacing: Duration,
    ) -> Result<Vec<BoardRow>, PttError> {
        let latest = self.latest_index().await?;
        let mut rows: Vec<BoardRow> = Vec::new();

        let pages = usize::try_from(pages).unwrap_or(usize::MAX);
        for (i, index) in (1..=latest).rev().take(pages).enumerate() {
            if i > 0 && !pacing.is_zero() {
                tokio::time::sleep(pacing).await;
            }
            match self.list_page(index).await {
                Ok(page) => {
                    let before = rows.len();
                    for row in page {
                        if !rows.iter().any(|r| r.url == row.url) {
                            rows.push(row);
                        }
                    }
                    tracing::debug!(
                        board = %self.board,
                        index,
                        added = rows.len() - before,
                        "index page listed"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        board = %self.board,
                        index,
                        error = %e,
                        "index page failed; skipping"
                    );
                }
            }
        }

        Ok(rows)
    }

    /// Fetch and parse one article.
    ///
    /// # Errors
    ///
    /// Transport errors after retries, [`PttError::NotFound`], or
    /// [`PttError::Parse`].
    pub async fn fetch_article(&self, url: &str) -> Result<Article, PttError> {
        let html = self.get_html(url).await?;
        parse_article(&html, url)
    }

    async fn get_html(&self, url: &str) -> Result<String, PttError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let response = self.client.get(url).send().await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(PttError::RateLimited {
                    url: url.to_string(),
                    retry_after_secs,
                });
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(PttError::NotFound {
                    url: url.to_string(),
                });
            }
            if !status.is_success() {
                return Err(PttError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            Ok(response.text().await?)
        })
        .await
    }
}

#[async_trait]
impl ContentSource for PttClient {
    async fn fetch(&self, id: &str) -> Result<Document, SourceError> {
        self.fetch_article(id)
            .await
            .map(Document::from)
            .map_err(|e| SourceError::new(id, e.to_string()))
    }
}

/// Rows whose title contains `brand`, in listing order, at most `limit`.
#[must_use]
pub fn select_targets(rows: &[BoardRow], brand: &str, limit: usize) -> Vec<BoardRow> {
    let brand = brand.trim();
    if brand.is_empty() {
        return Vec::new();
    }
    rows.iter()
        .filter(|row| row.title.contains(brand))
        .take(limit)
        .cloned()
        .collect()
}
