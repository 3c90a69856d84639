// aquashop/src/config.rs

//! API endpoint configuration. Every gateway call goes through
//! [`ApiConfig::endpoint`], so the base path is a single configuration point
//! (relative `/api` behind a proxy, or an absolute `host:port` URL).

use crate::error::{Result, StoreError};
use std::env;

/// Default base used when `AQUASHOP_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Clone)]
pub struct ApiConfig {
  base_url: String,
}

impl ApiConfig {
  /// Creates a config from an explicit base URL. A trailing slash is trimmed
  /// so `endpoint` can join with `/`-prefixed paths.
  pub fn new(base_url: impl Into<String>) -> Self {
    let base_url = base_url.into();
    Self {
      base_url: base_url.trim_end_matches('/').to_string(),
    }
  }

  /// Reads `AQUASHOP_API_URL` from the environment, falling back to
  /// [`DEFAULT_API_URL`]. An explicitly set but empty value is rejected.
  pub fn from_env() -> Result<Self> {
    match env::var("AQUASHOP_API_URL") {
      Ok(url) if url.trim().is_empty() => Err(StoreError::Config(
        "AQUASHOP_API_URL is set but empty".to_string(),
      )),
      Ok(url) => Ok(Self::new(url)),
      Err(_) => Ok(Self::new(DEFAULT_API_URL)),
    }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Joins a `/`-prefixed endpoint path onto the base URL.
  pub fn endpoint(&self, path: &str) -> String {
    debug_assert!(path.starts_with('/'), "endpoint paths start with '/'");
    format!("{}{}", self.base_url, path)
  }
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self::new(DEFAULT_API_URL)
  }
}
