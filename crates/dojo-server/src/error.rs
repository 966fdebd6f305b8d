//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
}

/// Reasons a [`crate::ServerConfig`] cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read configuration: {0}")]
  Source(#[from] config::ConfigError),

  #[error("max_expansion_days must be at least 1, got {0}")]
  MaxExpansionDays(i64),

  #[error("auth_username must not be empty")]
  EmptyUsername,

  #[error("auth_password_hash is not a PHC string: {0}")]
  PasswordHash(String),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res =
          (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"dojo\""),
        );
        res
      }
    }
  }
}
