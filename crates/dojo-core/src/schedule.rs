//! Weekly schedule templates, the generators of dated sessions.
//!
//! A template says "every Monday from 18:00 to 19:30 at this location".
//! Templates are never hard-deleted; they are switched off with the `active`
//! flag so that history referring to them stays intact.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── DayOfWeek ───────────────────────────────────────────────────────────────

/// Day of the week numbered from Sunday: `0 = Sunday .. 6 = Saturday`.
///
/// Serialised as the bare integer.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayOfWeek(u8);

impl DayOfWeek {
  pub const SUNDAY: Self = Self(0);
  pub const MONDAY: Self = Self(1);
  pub const TUESDAY: Self = Self(2);
  pub const WEDNESDAY: Self = Self(3);
  pub const THURSDAY: Self = Self(4);
  pub const FRIDAY: Self = Self(5);
  pub const SATURDAY: Self = Self(6);

  pub fn new(n: u8) -> Result<Self> {
    if n <= 6 { Ok(Self(n)) } else { Err(Error::InvalidDayOfWeek(n)) }
  }

  pub fn number(self) -> u8 { self.0 }

  /// The day of week a calendar date falls on.
  pub fn of(date: NaiveDate) -> Self { Self::from(date.weekday()) }

  pub fn weekday(self) -> Weekday {
    match self.0 {
      0 => Weekday::Sun,
      1 => Weekday::Mon,
      2 => Weekday::Tue,
      3 => Weekday::Wed,
      4 => Weekday::Thu,
      5 => Weekday::Fri,
      _ => Weekday::Sat,
    }
  }
}

impl From<Weekday> for DayOfWeek {
  fn from(w: Weekday) -> Self { Self(w.num_days_from_sunday() as u8) }
}

impl TryFrom<u8> for DayOfWeek {
  type Error = Error;

  fn try_from(n: u8) -> Result<Self> { Self::new(n) }
}

impl From<DayOfWeek> for u8 {
  fn from(d: DayOfWeek) -> Self { d.0 }
}

impl std::fmt::Display for DayOfWeek {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.weekday())
  }
}

// ─── Templates ───────────────────────────────────────────────────────────────

/// A recurring weekly slot for a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleTemplate {
  pub template_id:   Uuid,
  pub location_id:   Uuid,
  pub class_id:      Option<Uuid>,
  pub day_of_week:   DayOfWeek,
  pub start_time:    NaiveTime,
  pub end_time:      NaiveTime,
  pub instructor_id: Option<Uuid>,
  pub description:   Option<String>,
  pub capacity:      Option<u32>,
  /// Inactive templates never produce sessions.
  pub active:        bool,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::ScheduleStore::add_template`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTemplate {
  pub location_id:   Uuid,
  pub class_id:      Option<Uuid>,
  pub day_of_week:   DayOfWeek,
  pub start_time:    NaiveTime,
  pub end_time:      NaiveTime,
  pub instructor_id: Option<Uuid>,
  pub description:   Option<String>,
  pub capacity:      Option<u32>,
}

impl NewTemplate {
  /// Convenience constructor with all optional fields empty.
  pub fn new(
    location_id: Uuid,
    day_of_week: DayOfWeek,
    start_time: NaiveTime,
    end_time: NaiveTime,
  ) -> Self {
    Self {
      location_id,
      class_id: None,
      day_of_week,
      start_time,
      end_time,
      instructor_id: None,
      description: None,
      capacity: None,
    }
  }

  pub fn validate(&self) -> Result<()> {
    validate_times(self.start_time, self.end_time)
  }
}

/// Sessions and templates must start strictly before they end, on whole
/// seconds.
pub fn validate_times(start: NaiveTime, end: NaiveTime) -> Result<()> {
  for t in [start, end] {
    if t.nanosecond() != 0 {
      return Err(Error::SubsecondTime(t));
    }
  }
  if start < end {
    Ok(())
  } else {
    Err(Error::InvalidTimeRange { start, end })
  }
}
