//! The `ScheduleStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `dojo-store-sqlite`).
//! Higher layers (`dojo-api`, the expansion engine) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  location::{Location, NewLocation},
  schedule::{NewTemplate, ScheduleTemplate},
  session::{NewSession, SessionInstance},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`ScheduleStore::list_sessions`].
#[derive(Debug, Clone)]
pub struct SessionQuery {
  pub location_id:      Uuid,
  /// Inclusive lower bound on `session_date`.
  pub from:             Option<NaiveDate>,
  /// Inclusive upper bound on `session_date`.
  pub to:               Option<NaiveDate>,
  /// If `false`, cancelled sessions are left out.
  pub include_inactive: bool,
}

impl SessionQuery {
  /// Active sessions of a location within `[from, to]`.
  pub fn active_between(location_id: Uuid, from: NaiveDate, to: NaiveDate) -> Self {
    Self {
      location_id,
      from: Some(from),
      to: Some(to),
      include_inactive: false,
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a schedule store backend.
///
/// Nothing is ever hard-deleted: templates are deactivated and sessions are
/// cancelled by clearing their `active` flag.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ScheduleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Locations ─────────────────────────────────────────────────────────

  fn add_location(
    &self,
    input: NewLocation,
  ) -> impl Future<Output = Result<Location, Self::Error>> + Send + '_;

  /// Retrieve a location by UUID. Returns `None` if not found.
  fn get_location(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Location>, Self::Error>> + Send + '_;

  fn list_locations(
    &self,
  ) -> impl Future<Output = Result<Vec<Location>, Self::Error>> + Send + '_;

  // ── Templates ─────────────────────────────────────────────────────────

  /// Persist a new, active template.
  ///
  /// Returns an error if the time range is empty or the location does not
  /// exist.
  fn add_template(
    &self,
    input: NewTemplate,
  ) -> impl Future<Output = Result<ScheduleTemplate, Self::Error>> + Send + '_;

  fn get_template(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ScheduleTemplate>, Self::Error>>
  + Send
  + '_;

  /// Templates of a location ordered by day of week, then start time.
  fn list_templates(
    &self,
    location_id: Uuid,
    include_inactive: bool,
  ) -> impl Future<Output = Result<Vec<ScheduleTemplate>, Self::Error>> + Send + '_;

  /// Switch a template off. Deactivating an inactive template is a no-op.
  fn deactivate_template(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<ScheduleTemplate, Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Create a single session by hand.
  ///
  /// Returns an error if an active session already occupies the slot.
  fn add_session(
    &self,
    input: NewSession,
  ) -> impl Future<Output = Result<SessionInstance, Self::Error>> + Send + '_;

  fn get_session(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<SessionInstance>, Self::Error>>
  + Send
  + '_;

  /// Sessions matching `query`, ordered by date, then start time.
  fn list_sessions<'a>(
    &'a self,
    query: &'a SessionQuery,
  ) -> impl Future<Output = Result<Vec<SessionInstance>, Self::Error>> + Send + 'a;

  /// Soft-delete a session, freeing its slot.
  fn cancel_session(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<SessionInstance, Self::Error>> + Send + '_;

  /// Insert many sessions in one round trip.
  ///
  /// Rows whose slot is already held by an active session are skipped rather
  /// than failing the batch. Returns the number of rows actually inserted.
  /// Any other failure rejects the whole batch.
  fn insert_sessions(
    &self,
    rows: Vec<NewSession>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
