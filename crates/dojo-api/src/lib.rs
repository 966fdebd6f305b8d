//! JSON REST API for Dojo.
//!
//! Exposes an axum [`Router`] backed by any [`dojo_core::store::ScheduleStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility; an auth
//! layer may attach a [`dojo_core::actor::Actor`] to request extensions, and
//! handlers that create rows record it.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", dojo_api::api_router(store.clone(), ApiLimits::default()))
//! ```

pub mod actor;
pub mod error;
pub mod expansion;
pub mod locations;
pub mod sessions;
pub mod templates;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use dojo_core::store::ScheduleStore;

pub use error::ApiError;

/// Enough for any calendar year plus the following one.
pub const DEFAULT_MAX_EXPANSION_DAYS: i64 = 731;

/// Tunables applied by the handlers.
#[derive(Debug, Clone, Copy)]
pub struct ApiLimits {
  /// Longest date range, in days, a single expansion may cover.
  pub max_expansion_days: i64,
}

impl Default for ApiLimits {
  fn default() -> Self {
    Self { max_expansion_days: DEFAULT_MAX_EXPANSION_DAYS }
  }
}

/// State shared by every handler.
pub struct ApiState<S> {
  pub store:              Arc<S>,
  pub max_expansion_days: i64,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:              Arc::clone(&self.store),
      max_expansion_days: self.max_expansion_days,
    }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, limits: ApiLimits) -> Router<()>
where
  S: ScheduleStore + 'static,
{
  let state = ApiState { store, max_expansion_days: limits.max_expansion_days };

  Router::new()
    // Locations
    .route("/locations", get(locations::list::<S>).post(locations::create::<S>))
    .route("/locations/{id}", get(locations::get_one::<S>))
    // Templates
    .route(
      "/locations/{id}/templates",
      get(templates::list::<S>).post(templates::create::<S>),
    )
    .route("/templates/{id}/deactivate", post(templates::deactivate::<S>))
    // Sessions
    .route(
      "/locations/{id}/sessions",
      get(sessions::list::<S>).post(sessions::create::<S>),
    )
    .route("/sessions/{id}/cancel", post(sessions::cancel::<S>))
    // Expansion
    .route("/locations/{id}/expand", post(expansion::handler::<S>))
    .with_state(state)
}
