//! HTTP server wiring for Dojo.
//!
//! Mounts the [`dojo_api`] JSON API under `/api` behind HTTP Basic auth,
//! backed by any [`ScheduleStore`].

pub mod auth;
pub mod error;

pub use error::{ConfigError, Error};

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use argon2::PasswordHash;
use axum::{Router, middleware, routing::get};
use dojo_api::{ApiLimits, DEFAULT_MAX_EXPANSION_DAYS};
use dojo_core::store::ScheduleStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `DOJO_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
  #[serde(default = "default_max_expansion_days")]
  pub max_expansion_days: i64,
}

fn default_max_expansion_days() -> i64 { DEFAULT_MAX_EXPANSION_DAYS }

impl ServerConfig {
  /// Layer the TOML file at `path` (if it exists) under `DOJO_*` environment
  /// variables, then validate the result.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let cfg: Self = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("DOJO"))
      .build()?
      .try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.max_expansion_days < 1 {
      return Err(ConfigError::MaxExpansionDays(self.max_expansion_days));
    }
    if self.auth_username.is_empty() {
      return Err(ConfigError::EmptyUsername);
    }
    PasswordHash::new(&self.auth_password_hash)
      .map_err(|e| ConfigError::PasswordHash(e.to_string()))?;
    Ok(())
  }

  /// `store_path` with a leading `~/` resolved against `$HOME`.
  pub fn resolved_store_path(&self) -> PathBuf {
    let s = self.store_path.to_string_lossy();
    if let Some(rest) = s.strip_prefix("~/")
      && let Ok(home) = std::env::var("HOME")
    {
      return PathBuf::from(home).join(rest);
    }
    self.store_path.clone()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn limits(&self) -> ApiLimits {
    ApiLimits { max_expansion_days: self.max_expansion_days }
  }

  pub fn auth(&self) -> AuthConfig {
    AuthConfig {
      username:      self.auth_username.clone(),
      password_hash: self.auth_password_hash.clone(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router needs.
#[derive(Clone)]
pub struct AppState<S: ScheduleStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the server's [`Router`]: `/api/*` requires authentication,
/// `/health` does not.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ScheduleStore + 'static,
{
  let api = dojo_api::api_router(state.store, state.config.limits())
    .layer(middleware::from_fn_with_state(state.auth, require_auth));

  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
