//! Sub-category API
//!
//! HTTP-GET abstraction plus the URL building and payload normalization
//! shared by every request the controller makes.

use async_trait::async_trait;
use gloo_net::http::Request;
use log::{debug, warn};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

use crate::config::FilterConfig;
use crate::error::FilterError;
use crate::models::{SubCategory, SubCategoryPayload};

/// Unreserved characters stay literal, everything else is escaped
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Minimal JSON GET used by the controller; swapped for a fake in tests
#[async_trait(?Send)]
pub trait FetchJson {
    async fn fetch_json(&self, url: &str) -> Result<Value, FilterError>;
}

/// Browser `fetch` via gloo-net
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooFetch;

#[async_trait(?Send)]
impl FetchJson for GlooFetch {
    async fn fetch_json(&self, url: &str) -> Result<Value, FilterError> {
        let response = Request::get(url)
            .header("Accept", "application/json")
            .send()
            .await?;
        if !response.ok() {
            return Err(FilterError::Status {
                status: response.status(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

pub struct SubCategoryApi<C> {
    client: C,
    base_url: String,
    follow_pagination: bool,
    max_pages: u32,
}

impl<C: FetchJson> SubCategoryApi<C> {
    pub fn new(client: C, config: &FilterConfig) -> Self {
        Self {
            client,
            base_url: config.endpoint.base_url().to_string(),
            follow_pagination: config.follow_pagination,
            max_pages: config.max_pages.max(1),
        }
    }

    /// List URL, scoped to `main_category` when given
    pub fn list_url(&self, main_category: Option<&str>) -> String {
        let Some(id) = main_category else {
            return self.base_url.clone();
        };
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}main_category={}",
            self.base_url,
            separator,
            utf8_percent_encode(id, QUERY_VALUE)
        )
    }

    /// Fetch the option list, following `next` links when enabled
    pub async fn list(&self, main_category: Option<&str>) -> Result<Vec<SubCategory>, FilterError> {
        let url = self.list_url(main_category);
        let first = self.fetch_page(&url).await?;
        let mut next = first.next_page().map(str::to_string);
        let mut options = first.into_options();

        if !self.follow_pagination {
            return Ok(options);
        }

        let mut pages = 1;
        while let Some(url) = next.take() {
            if pages >= self.max_pages {
                warn!("stopping after {} pages, {} left unread", pages, url);
                break;
            }
            match self.fetch_page(&url).await {
                Ok(page) => {
                    next = page.next_page().map(str::to_string);
                    options.extend(page.into_options());
                    pages += 1;
                }
                Err(err) => {
                    warn!("page {} failed, keeping {} options: {}", url, options.len(), err);
                    break;
                }
            }
        }
        Ok(options)
    }

    async fn fetch_page(&self, url: &str) -> Result<SubCategoryPayload, FilterError> {
        debug!("GET {}", url);
        let value = self.client.fetch_json(url).await?;
        Ok(serde_json::from_value(value)?)
    }
}
