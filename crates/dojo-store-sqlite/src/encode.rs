//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, dates `YYYY-MM-DD`, times `HH:MM:SS`.
//! These formats sort lexicographically in the same order as the values they
//! encode, which the range queries rely on. That holds only for four-digit
//! years and whole seconds; `NewTemplate::validate` and
//! `NewSession::validate` reject anything else before it reaches a column. UUIDs are hyphenated lowercase
//! strings; flags are `0`/`1` integers.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use dojo_core::{
  location::Location,
  schedule::{DayOfWeek, ScheduleTemplate},
  session::SessionInstance,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Parse(format!("timestamp {s:?}: {e}")))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Parse(format!("date {s:?}: {e}")))
}

pub fn encode_time(t: NaiveTime) -> String { t.format("%H:%M:%S").to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, "%H:%M:%S")
    .map_err(|e| Error::Parse(format!("time {s:?}: {e}")))
}

fn decode_day_of_week(n: i64) -> Result<DayOfWeek> {
  let n = u8::try_from(n)
    .map_err(|_| Error::Parse(format!("day of week out of range: {n}")))?;
  Ok(DayOfWeek::new(n)?)
}

fn decode_capacity(n: Option<i64>) -> Result<Option<u32>> {
  n.map(|n| {
    u32::try_from(n).map_err(|_| Error::Parse(format!("capacity out of range: {n}")))
  })
  .transpose()
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const LOCATION_COLUMNS: &str = "location_id, name, created_at";

/// Raw values read directly from a `locations` row.
pub struct RawLocation {
  pub location_id: String,
  pub name:        String,
  pub created_at:  String,
}

impl RawLocation {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      location_id: row.get(0)?,
      name:        row.get(1)?,
      created_at:  row.get(2)?,
    })
  }

  pub fn into_location(self) -> Result<Location> {
    Ok(Location {
      location_id: decode_uuid(&self.location_id)?,
      name:        self.name,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub const TEMPLATE_COLUMNS: &str = "template_id, location_id, class_id, day_of_week, \
  start_time, end_time, instructor_id, description, capacity, active, created_at";

/// Raw values read directly from a `schedule_templates` row.
pub struct RawTemplate {
  pub template_id:   String,
  pub location_id:   String,
  pub class_id:      Option<String>,
  pub day_of_week:   i64,
  pub start_time:    String,
  pub end_time:      String,
  pub instructor_id: Option<String>,
  pub description:   Option<String>,
  pub capacity:      Option<i64>,
  pub active:        bool,
  pub created_at:    String,
}

impl RawTemplate {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      template_id:   row.get(0)?,
      location_id:   row.get(1)?,
      class_id:      row.get(2)?,
      day_of_week:   row.get(3)?,
      start_time:    row.get(4)?,
      end_time:      row.get(5)?,
      instructor_id: row.get(6)?,
      description:   row.get(7)?,
      capacity:      row.get(8)?,
      active:        row.get(9)?,
      created_at:    row.get(10)?,
    })
  }

  pub fn into_template(self) -> Result<ScheduleTemplate> {
    Ok(ScheduleTemplate {
      template_id:   decode_uuid(&self.template_id)?,
      location_id:   decode_uuid(&self.location_id)?,
      class_id:      decode_opt_uuid(self.class_id)?,
      day_of_week:   decode_day_of_week(self.day_of_week)?,
      start_time:    decode_time(&self.start_time)?,
      end_time:      decode_time(&self.end_time)?,
      instructor_id: decode_opt_uuid(self.instructor_id)?,
      description:   self.description,
      capacity:      decode_capacity(self.capacity)?,
      active:        self.active,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub const SESSION_COLUMNS: &str = "session_id, location_id, class_id, session_date, \
  start_time, end_time, instructor_id, description, capacity, active, created_by, created_at";

/// Raw values read directly from a `sessions` row.
pub struct RawSession {
  pub session_id:    String,
  pub location_id:   String,
  pub class_id:      Option<String>,
  pub session_date:  String,
  pub start_time:    String,
  pub end_time:      String,
  pub instructor_id: Option<String>,
  pub description:   Option<String>,
  pub capacity:      Option<i64>,
  pub active:        bool,
  pub created_by:    Option<String>,
  pub created_at:    String,
}

impl RawSession {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      session_id:    row.get(0)?,
      location_id:   row.get(1)?,
      class_id:      row.get(2)?,
      session_date:  row.get(3)?,
      start_time:    row.get(4)?,
      end_time:      row.get(5)?,
      instructor_id: row.get(6)?,
      description:   row.get(7)?,
      capacity:      row.get(8)?,
      active:        row.get(9)?,
      created_by:    row.get(10)?,
      created_at:    row.get(11)?,
    })
  }

  pub fn into_session(self) -> Result<SessionInstance> {
    Ok(SessionInstance {
      session_id:    decode_uuid(&self.session_id)?,
      location_id:   decode_uuid(&self.location_id)?,
      class_id:      decode_opt_uuid(self.class_id)?,
      session_date:  decode_date(&self.session_date)?,
      start_time:    decode_time(&self.start_time)?,
      end_time:      decode_time(&self.end_time)?,
      instructor_id: decode_opt_uuid(self.instructor_id)?,
      description:   self.description,
      capacity:      decode_capacity(self.capacity)?,
      active:        self.active,
      created_by:    self.created_by,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
