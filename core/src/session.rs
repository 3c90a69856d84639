// aquashop/src/session.rs

//! Client-side authentication session.
//!
//! The session is an explicit context object handed to every component that
//! needs it, not module-level state. It holds the bearer credential plus the
//! claims decoded from it; the decode is a plain base64url read of the JWT
//! payload segment, with no signature verification (the server verifies, the
//! client only displays).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use parking_lot::{Mutex, RwLock};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Claims the server encodes into the login token.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default)]
  pub role: Option<String>,
}

/// Decodes the payload segment of a JWT-shaped token. Any malformed input
/// yields `None`; this never panics.
pub fn decode_claims(token: &str) -> Option<Claims> {
  let payload = token.split('.').nth(1)?;
  // Tolerate both padded and unpadded encodings.
  let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
  serde_json::from_slice(&bytes).ok()
}

/// Fallback display name when the token carries no usable email.
const ANONYMOUS_DISPLAY_NAME: &str = "KULLANICI";

/// A decoded, live session: the credential plus presentation-ready claims.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
  pub token: String,
  pub email: Option<String>,
  pub role: Option<String>,
  /// Email local part, upper-cased; the backend issues no separate username.
  pub display_name: String,
}

impl AuthSession {
  /// Builds a session from a raw token, or `None` if the token does not
  /// decode to a claims payload.
  pub fn from_token(token: &str) -> Option<Self> {
    let claims = decode_claims(token)?;
    let display_name = claims
      .email
      .as_deref()
      .and_then(|e| e.split('@').next())
      .filter(|local| !local.is_empty())
      .map(str::to_uppercase)
      .unwrap_or_else(|| ANONYMOUS_DISPLAY_NAME.to_string());
    Some(AuthSession {
      token: token.to_string(),
      email: claims.email,
      role: claims.role,
      display_name,
    })
  }

  pub fn is_admin(&self) -> bool {
    self.role.as_deref() == Some("admin")
  }
}

/// Where the raw credential survives between runs (the localStorage analogue).
pub trait CredentialStore: Send + Sync {
  fn load(&self) -> Option<String>;
  fn save(&self, token: &str);
  fn clear(&self);
}

/// In-memory store; the default for tests and short-lived clients.
#[derive(Default)]
pub struct MemoryCredentialStore {
  token: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl CredentialStore for MemoryCredentialStore {
  fn load(&self) -> Option<String> {
    self.token.lock().clone()
  }

  fn save(&self, token: &str) {
    *self.token.lock() = Some(token.to_string());
  }

  fn clear(&self) {
    *self.token.lock() = None;
  }
}

/// Shared handle to the current session.
///
/// Cloning is cheap (Arc). Mutation happens only on login/logout; reads happen
/// from every gateway call. Lock guards never cross an `.await`.
#[derive(Clone, Default)]
pub struct SessionContext {
  inner: Arc<RwLock<Option<AuthSession>>>,
}

impl SessionContext {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builds a context from a stored credential, discarding a stored token
  /// that no longer decodes (matching startup behavior: a bad token is
  /// cleared, not surfaced).
  pub fn restore(store: &dyn CredentialStore) -> Self {
    let ctx = Self::new();
    if let Some(token) = store.load() {
      if ctx.install_token(&token) {
        debug!("session restored from stored credential");
      } else {
        warn!("stored credential no longer decodes; clearing it");
        store.clear();
      }
    }
    ctx
  }

  /// Decodes and installs a token. Returns false (leaving the current session
  /// untouched) when the token does not decode.
  pub fn install_token(&self, token: &str) -> bool {
    match AuthSession::from_token(token) {
      Some(session) => {
        *self.inner.write() = Some(session);
        true
      }
      None => false,
    }
  }

  pub fn clear(&self) {
    *self.inner.write() = None;
  }

  pub fn current(&self) -> Option<AuthSession> {
    self.inner.read().clone()
  }

  pub fn bearer_token(&self) -> Option<String> {
    self.inner.read().as_ref().map(|s| s.token.clone())
  }

  pub fn is_authenticated(&self) -> bool {
    self.inner.read().is_some()
  }

  pub fn is_admin(&self) -> bool {
    self.inner.read().as_ref().map_or(false, AuthSession::is_admin)
  }
}
