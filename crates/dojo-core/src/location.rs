//! Location ("polo"): an academy site owning templates and sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
  pub location_id: Uuid,
  pub name:        String,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::ScheduleStore::add_location`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLocation {
  pub name: String,
}
