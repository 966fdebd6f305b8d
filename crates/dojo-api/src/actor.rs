//! Extractor for the identity attached to a request by the auth layer.

use axum::{extract::FromRequestParts, http::request::Parts};
use dojo_core::actor::Actor;

/// The [`Actor`] stored in the request extensions, if an upstream layer
/// authenticated the request. Never rejects.
pub struct CurrentActor(pub Option<Actor>);

impl<S: Send + Sync> FromRequestParts<S> for CurrentActor {
  type Rejection = std::convert::Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    Ok(CurrentActor(parts.extensions.get::<Actor>().cloned()))
  }
}
