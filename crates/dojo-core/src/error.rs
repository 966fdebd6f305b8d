//! Error types for `dojo-core`.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("location not found: {0}")]
  LocationNotFound(Uuid),

  #[error("schedule template not found: {0}")]
  TemplateNotFound(Uuid),

  #[error("session not found: {0}")]
  SessionNotFound(Uuid),

  #[error("day of week must be 0 (Sunday) to 6 (Saturday), got {0}")]
  InvalidDayOfWeek(u8),

  #[error("start time {start} must be before end time {end}")]
  InvalidTimeRange { start: NaiveTime, end: NaiveTime },

  #[error("times are whole seconds, got {0}")]
  SubsecondTime(NaiveTime),

  #[error("date {0} is outside the supported years 0000 to 9999")]
  DateOutOfRange(NaiveDate),

  #[error(
    "an active session already exists at location {location_id} on {date} \
     from {start} to {end}"
  )]
  DuplicateSession {
    location_id: Uuid,
    date:        NaiveDate,
    start:       NaiveTime,
    end:         NaiveTime,
  },
}

impl Error {
  /// `true` for input that can never be stored, whatever the store holds.
  pub fn is_invalid_input(&self) -> bool {
    matches!(
      self,
      Self::InvalidDayOfWeek(_)
        | Self::InvalidTimeRange { .. }
        | Self::SubsecondTime(_)
        | Self::DateOutOfRange(_)
    )
  }

  /// `true` for the "no such row" family of errors.
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::LocationNotFound(_)
        | Self::TemplateNotFound(_)
        | Self::SessionNotFound(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
