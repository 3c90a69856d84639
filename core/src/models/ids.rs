// aquashop/src/models/ids.rs

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! opaque_id {
  ($(#[$doc:meta])* $name:ident) => {
    $(#[$doc])*
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct $name(pub String);

    impl $name {
      pub fn as_str(&self) -> &str {
        &self.0
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
      }
    }

    impl From<&str> for $name {
      fn from(s: &str) -> Self {
        $name(s.to_string())
      }
    }

    impl From<String> for $name {
      fn from(s: String) -> Self {
        $name(s)
      }
    }
  };
}

opaque_id!(
  /// Server-assigned identifier of a catalog product.
  ProductId
);
opaque_id!(
  /// Server-assigned identifier of one cart row (one unit-addition event).
  RowId
);
opaque_id!(
  /// Server-assigned identifier of a favorite entry.
  FavoriteId
);
