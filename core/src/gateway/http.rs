// aquashop/src/gateway/http.rs

//! Shared JSON request plumbing for all gateways: base-URL join, bearer
//! header injection, and the error mapping described in the crate's error
//! taxonomy (401 -> `Unauthenticated`, other non-2xx -> `Remote` with the
//! server's `error` message, undecodable 2xx body -> `MalformedResponse`).

use crate::config::ApiConfig;
use crate::error::{Result, StoreError};
use crate::session::SessionContext;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

pub struct ApiClient {
  http: reqwest::Client,
  config: ApiConfig,
  session: SessionContext,
}

impl ApiClient {
  pub fn new(config: ApiConfig, session: SessionContext) -> Self {
    ApiClient {
      http: reqwest::Client::new(),
      config,
      session,
    }
  }

  pub fn config(&self) -> &ApiConfig {
    &self.config
  }

  pub fn session(&self) -> &SessionContext {
    &self.session
  }

  pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    self.request(Method::GET, path, None::<&()>, &[]).await
  }

  pub(crate) async fn get_json_query<T: DeserializeOwned>(
    &self,
    path: &str,
    query: &[(&str, &str)],
  ) -> Result<T> {
    self.request(Method::GET, path, None::<&()>, query).await
  }

  pub(crate) async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
    &self,
    path: &str,
    body: &B,
  ) -> Result<T> {
    self.request(Method::POST, path, Some(body), &[]).await
  }

  pub(crate) async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
    &self,
    path: &str,
    body: &B,
  ) -> Result<T> {
    self.request(Method::PUT, path, Some(body), &[]).await
  }

  /// DELETE, discarding whatever acknowledgement body the server sends.
  pub(crate) async fn delete(&self, path: &str) -> Result<()> {
    let _ack: Value = self.request(Method::DELETE, path, None::<&()>, &[]).await?;
    Ok(())
  }

  #[instrument(name = "ApiClient::request", skip_all, fields(%method, path), err(Display))]
  async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
    &self,
    method: Method,
    path: &str,
    body: Option<&B>,
    query: &[(&str, &str)],
  ) -> Result<T> {
    let url = self.config.endpoint(path);
    let mut req = self.http.request(method, &url);
    if !query.is_empty() {
      req = req.query(query);
    }
    if let Some(token) = self.session.bearer_token() {
      req = req.bearer_auth(token);
    }
    if let Some(body) = body {
      req = req.json(body);
    }

    let resp = req.send().await?;
    let status = resp.status();
    if !status.is_success() {
      if status == StatusCode::UNAUTHORIZED {
        debug!(path, "request rejected: no valid session server-side");
      }
      let body = resp.json::<Value>().await.ok();
      return Err(failure_error(status, body.as_ref()));
    }

    resp
      .json::<T>()
      .await
      .map_err(|e| StoreError::MalformedResponse(e.to_string()))
  }
}

/// Maps a non-success status and its (optional) JSON body to the client
/// error: 401 means no valid session server-side; everything else becomes
/// `Remote`, carrying the body's `error` field when the server sent one.
pub(crate) fn failure_error(status: StatusCode, body: Option<&Value>) -> StoreError {
  if status == StatusCode::UNAUTHORIZED {
    return StoreError::Unauthenticated;
  }
  let message = body
    .and_then(|v| v.get("error").and_then(Value::as_str))
    .map(str::to_string)
    .unwrap_or_else(|| "request failed".to_string());
  StoreError::Remote {
    status: status.as_u16(),
    message,
  }
}

/// Extracts a created-entity id from an acknowledgement body that may be the
/// created row itself, a bare id object, or a wrapper around either.
pub(crate) fn created_id(body: &Value, what: &str) -> Result<String> {
  let direct = body.get("_id").or_else(|| body.get("id"));
  let nested = ["item", "row", "favorite", "cartItem"]
    .iter()
    .filter_map(|k| body.get(*k))
    .find_map(|inner| inner.get("_id").or_else(|| inner.get("id")));
  direct
    .or(nested)
    .and_then(Value::as_str)
    .map(str::to_string)
    .ok_or_else(|| StoreError::MalformedResponse(format!("{what} response carries no id")))
}
