// aquashop/src/error.rs

use thiserror::Error;

/// Error taxonomy for the storefront client core.
///
/// Gateways are the only layer that produces these; view controllers are the
/// only layer that turns them into user-visible messaging. Aggregation never
/// fails: malformed rows degrade per-entry instead (see `cart::aggregate`).
#[derive(Debug, Error)]
pub enum StoreError {
  /// A session-requiring operation was attempted without a valid session.
  #[error("not authenticated")]
  Unauthenticated,

  /// The server answered with a non-success status. `message` carries the
  /// server-supplied `error` field when present.
  #[error("server error ({status}): {message}")]
  Remote { status: u16, message: String },

  /// The request never produced a usable response (connect failure, timeout).
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  /// The server answered 2xx but the payload is missing its expected shape.
  #[error("malformed server response: {0}")]
  MalformedResponse(String),

  #[error("configuration error: {0}")]
  Config(String),
}

impl StoreError {
  /// True for a `Remote` error with the given HTTP status.
  pub fn is_status(&self, status: u16) -> bool {
    matches!(self, StoreError::Remote { status: s, .. } if *s == status)
  }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
