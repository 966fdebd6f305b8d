//! The authenticated identity performing a write.
//!
//! There is no ambient "current user": whoever authenticates the request
//! builds an [`Actor`] and hands it to the operations that record it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
  pub username: String,
}

impl Actor {
  pub fn new(username: impl Into<String>) -> Self {
    Self { username: username.into() }
  }
}
