//! Filter Configuration
//!
//! Options accepted by `initializeWithConfig`. Every key is optional and
//! may be given in snake_case or camelCase.

use log::LevelFilter;
use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::error::FilterError;

pub const DEFAULT_MAIN_FIELD_ID: &str = "id_main_category";
pub const DEFAULT_SUB_FIELD_ID: &str = "id_sub_category";
pub const DEFAULT_PLACEHOLDER: &str = "---------";

const PRODUCTS_API_URL: &str = "/api/products/sub-categories/";
const ADMIN_API_URL: &str = "/admin/api/subcategories/";

/// Where sub-categories are listed
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// Public product API
    #[default]
    #[serde(alias = "productsApi")]
    ProductsApi,
    /// Admin-only lookup view
    #[serde(alias = "adminApi")]
    AdminApi,
    Custom(String),
}

impl Endpoint {
    pub fn base_url(&self) -> &str {
        match self {
            Endpoint::ProductsApi => PRODUCTS_API_URL,
            Endpoint::AdminApi => ADMIN_API_URL,
            Endpoint::Custom(url) => url,
        }
    }
}

/// What to do when a scoped request fails in transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Leave only the placeholder
    #[serde(alias = "none")]
    Strict,
    /// Retry once without the main category scope
    #[default]
    #[serde(alias = "unscopedOnFailure")]
    UnscopedOnFailure,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    #[serde(alias = "mainFieldId")]
    pub main_field_id: String,
    #[serde(alias = "subFieldId")]
    pub sub_field_id: String,
    pub endpoint: Endpoint,
    pub fallback: FallbackPolicy,
    #[serde(alias = "placeholderLabel")]
    pub placeholder_label: String,
    #[serde(alias = "debounceMs")]
    pub debounce_ms: u32,
    #[serde(alias = "followPagination")]
    pub follow_pagination: bool,
    #[serde(alias = "maxPages")]
    pub max_pages: u32,
    #[serde(alias = "logLevel")]
    pub log_level: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            main_field_id: DEFAULT_MAIN_FIELD_ID.to_string(),
            sub_field_id: DEFAULT_SUB_FIELD_ID.to_string(),
            endpoint: Endpoint::default(),
            fallback: FallbackPolicy::default(),
            placeholder_label: DEFAULT_PLACEHOLDER.to_string(),
            debounce_ms: 0,
            follow_pagination: false,
            max_pages: 20,
            log_level: "info".to_string(),
        }
    }
}

impl FilterConfig {
    /// Read a config object handed over from JS; `undefined`/`null` mean defaults
    pub fn from_js(value: JsValue) -> Result<Self, FilterError> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        let config: Self = serde_wasm_bindgen::from_value(value)
            .map_err(|e| FilterError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        if self.main_field_id.trim().is_empty() || self.sub_field_id.trim().is_empty() {
            return Err(FilterError::Config("field ids must not be empty".into()));
        }
        if self.main_field_id == self.sub_field_id {
            return Err(FilterError::Config(format!(
                "main and sub fields share the id '{}'",
                self.main_field_id
            )));
        }
        if self.endpoint.base_url().trim().is_empty() {
            return Err(FilterError::Config("endpoint url must not be empty".into()));
        }
        if self.max_pages == 0 {
            return Err(FilterError::Config("max_pages must be at least 1".into()));
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, FilterError> {
        self.log_level
            .parse()
            .map_err(|_| FilterError::Config(format!("unknown log level '{}'", self.log_level)))
    }
}
