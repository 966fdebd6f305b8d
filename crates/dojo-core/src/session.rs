//! Session instances: concrete, dated occurrences of training.
//!
//! At most one *active* session may occupy a given [`SlotKey`] at a location.
//! Sessions are soft-deleted by clearing `active`; a cancelled session no
//! longer occupies its slot.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, schedule::validate_times};

/// A dated training session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInstance {
  pub session_id:    Uuid,
  pub location_id:   Uuid,
  pub class_id:      Option<Uuid>,
  pub session_date:  NaiveDate,
  pub start_time:    NaiveTime,
  pub end_time:      NaiveTime,
  pub instructor_id: Option<Uuid>,
  pub description:   Option<String>,
  pub capacity:      Option<u32>,
  pub active:        bool,
  /// Username of whoever created the row, when known.
  pub created_by:    Option<String>,
  pub created_at:    DateTime<Utc>,
}

impl SessionInstance {
  pub fn slot(&self) -> SlotKey {
    SlotKey::new(self.session_date, self.start_time, self.end_time)
  }
}

/// Input to [`crate::store::ScheduleStore::add_session`] and
/// [`crate::store::ScheduleStore::insert_sessions`].
///
/// `session_id`, `active` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSession {
  pub location_id:   Uuid,
  pub class_id:      Option<Uuid>,
  pub session_date:  NaiveDate,
  pub start_time:    NaiveTime,
  pub end_time:      NaiveTime,
  pub instructor_id: Option<Uuid>,
  pub description:   Option<String>,
  pub capacity:      Option<u32>,
  pub created_by:    Option<String>,
}

impl NewSession {
  /// Convenience constructor with all optional fields empty.
  pub fn new(
    location_id: Uuid,
    session_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
  ) -> Self {
    Self {
      location_id,
      class_id: None,
      session_date,
      start_time,
      end_time,
      instructor_id: None,
      description: None,
      capacity: None,
      created_by: None,
    }
  }

  pub fn validate(&self) -> Result<()> {
    validate_date(self.session_date)?;
    validate_times(self.start_time, self.end_time)
  }
}

/// The identity of a session slot within one location.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
pub struct SlotKey {
  pub date:  NaiveDate,
  pub start: NaiveTime,
  pub end:   NaiveTime,
}

impl SlotKey {
  pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
    Self { date, start, end }
  }
}

/// Dates are kept to four-digit years so that `YYYY-MM-DD` text sorts in
/// calendar order.
pub fn validate_date(date: NaiveDate) -> Result<()> {
  if (0..=9999).contains(&date.year()) {
    Ok(())
  } else {
    Err(Error::DateOutOfRange(date))
  }
}
