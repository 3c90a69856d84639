// aquashop/src/gateway/auth.rs

//! Login, registration, and logout against the credential endpoints.
//!
//! On successful login, the issued token is decoded into the shared
//! `SessionContext` and persisted through the `CredentialStore`; logout tears
//! both down. A token that does not decode is rejected client-side even when
//! the server accepted the credentials.

use crate::error::{Result, StoreError};
use crate::gateway::http::ApiClient;
use crate::session::CredentialStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, instrument};

pub struct AuthGateway {
  client: Arc<ApiClient>,
  store: Arc<dyn CredentialStore>,
}

impl AuthGateway {
  pub fn new(client: Arc<ApiClient>, store: Arc<dyn CredentialStore>) -> Self {
    AuthGateway { client, store }
  }

  #[instrument(skip(self, password), err(Display))]
  pub async fn login(&self, email: &str, password: &str) -> Result<()> {
    let body = json!({ "email": email, "password": password });
    let ack: Value = self.client.post_json("/login", &body).await?;
    let token = ack
      .get("token")
      .and_then(Value::as_str)
      .ok_or_else(|| StoreError::MalformedResponse("login response carries no token".to_string()))?;

    if !self.client.session().install_token(token) {
      return Err(StoreError::MalformedResponse(
        "login token does not decode to a claims payload".to_string(),
      ));
    }
    self.store.save(token);
    info!(email, "logged in");
    Ok(())
  }

  #[instrument(skip(self, password), err(Display))]
  pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<()> {
    let body = json!({ "name": name, "email": email, "password": password });
    let _ack: Value = self.client.post_json("/register", &body).await?;
    info!(email, "registered");
    Ok(())
  }

  pub fn logout(&self) {
    self.client.session().clear();
    self.store.clear();
    info!("logged out");
  }
}
