//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use dojo_core::expand::ExpandError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a store error, surfacing any [`dojo_core::Error`] in its source
  /// chain with the matching status instead of a blanket 500.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    let mut cur: Option<&(dyn std::error::Error + 'static)> = Some(&e);
    while let Some(err) = cur {
      if let Some(mapped) = err.downcast_ref::<dojo_core::Error>().and_then(Self::from_core) {
        return mapped;
      }
      cur = err.source();
    }
    Self::Store(Box::new(e))
  }

  fn from_core(e: &dojo_core::Error) -> Option<Self> {
    use dojo_core::Error as E;
    match e {
      e if e.is_not_found() => Some(Self::NotFound(e.to_string())),
      e if e.is_invalid_input() => Some(Self::BadRequest(e.to_string())),
      E::DuplicateSession { .. } => Some(Self::Conflict(e.to_string())),
      _ => None,
    }
  }
}

impl<E> From<ExpandError<E>> for ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  fn from(e: ExpandError<E>) -> Self {
    match e {
      ExpandError::InvalidRange { .. } | ExpandError::DateOutOfRange(_) => {
        Self::BadRequest(e.to_string())
      }
      ExpandError::LocationNotFound(_) => Self::NotFound(e.to_string()),
      ExpandError::Read(inner) | ExpandError::Write(inner) => Self::store(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      // Backend detail stays in the log.
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal storage error".to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
