//! [`SqliteStore`]: the SQLite implementation of [`ScheduleStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use dojo_core::{
  location::{Location, NewLocation},
  schedule::{NewTemplate, ScheduleTemplate},
  session::{NewSession, SessionInstance},
  store::{ScheduleStore, SessionQuery},
};

use crate::{
  encode::{
    encode_date, encode_dt, encode_time, encode_uuid, RawLocation, RawSession,
    RawTemplate, LOCATION_COLUMNS, SESSION_COLUMNS, TEMPLATE_COLUMNS,
  },
  schema::SCHEMA,
  Error, Result,
};

/// Skips the row instead of failing when the active-slot index already
/// holds a session for the same slot.
const INSERT_SESSION: &str = "INSERT INTO sessions (
    session_id, location_id, class_id, session_date, start_time, end_time,
    instructor_id, description, capacity, active, created_by, created_at
  ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, ?10, ?11)
  ON CONFLICT DO NOTHING";

// ─── Encoded rows ────────────────────────────────────────────────────────────

/// A [`NewSession`] with every column already encoded, ready to move onto the
/// database thread.
struct EncodedSession {
  session_id:    String,
  location_id:   String,
  class_id:      Option<String>,
  session_date:  String,
  start_time:    String,
  end_time:      String,
  instructor_id: Option<String>,
  description:   Option<String>,
  capacity:      Option<i64>,
  created_by:    Option<String>,
  created_at:    String,
}

impl EncodedSession {
  fn new(session_id: Uuid, input: &NewSession, created_at: chrono::DateTime<Utc>) -> Self {
    Self {
      session_id:    encode_uuid(session_id),
      location_id:   encode_uuid(input.location_id),
      class_id:      input.class_id.map(encode_uuid),
      session_date:  encode_date(input.session_date),
      start_time:    encode_time(input.start_time),
      end_time:      encode_time(input.end_time),
      instructor_id: input.instructor_id.map(encode_uuid),
      description:   input.description.clone(),
      capacity:      input.capacity.map(i64::from),
      created_by:    input.created_by.clone(),
      created_at:    encode_dt(created_at),
    }
  }

  /// Returns the number of rows written: 0 if the slot was taken.
  fn insert(&self, conn: &rusqlite::Connection) -> rusqlite::Result<usize> {
    conn.prepare_cached(INSERT_SESSION)?.execute(rusqlite::params![
      self.session_id,
      self.location_id,
      self.class_id,
      self.session_date,
      self.start_time,
      self.end_time,
      self.instructor_id,
      self.description,
      self.capacity,
      self.created_by,
      self.created_at,
    ])
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A schedule store backed by a single SQLite file.
///
/// Cloning is cheap, the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn require_location(&self, location_id: Uuid) -> Result<()> {
    match self.get_location(location_id).await? {
      Some(_) => Ok(()),
      None => Err(dojo_core::Error::LocationNotFound(location_id).into()),
    }
  }
}

// ─── ScheduleStore impl ──────────────────────────────────────────────────────

impl ScheduleStore for SqliteStore {
  type Error = Error;

  // ── Locations ─────────────────────────────────────────────────────────────

  async fn add_location(&self, input: NewLocation) -> Result<Location> {
    let location = Location {
      location_id: Uuid::new_v4(),
      name:        input.name,
      created_at:  Utc::now(),
    };

    let id_str = encode_uuid(location.location_id);
    let name   = location.name.clone();
    let at_str = encode_dt(location.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO locations (location_id, name, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(location)
  }

  async fn get_location(&self, id: Uuid) -> Result<Option<Location>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawLocation> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {LOCATION_COLUMNS} FROM locations WHERE location_id = ?1"),
            rusqlite::params![id_str],
            RawLocation::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawLocation::into_location).transpose()
  }

  async fn list_locations(&self) -> Result<Vec<Location>> {
    let raws: Vec<RawLocation> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {LOCATION_COLUMNS} FROM locations ORDER BY name"))?;
        let rows = stmt
          .query_map([], RawLocation::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLocation::into_location).collect()
  }

  // ── Templates ─────────────────────────────────────────────────────────────

  async fn add_template(&self, input: NewTemplate) -> Result<ScheduleTemplate> {
    input.validate()?;
    self.require_location(input.location_id).await?;

    let template = ScheduleTemplate {
      template_id:   Uuid::new_v4(),
      location_id:   input.location_id,
      class_id:      input.class_id,
      day_of_week:   input.day_of_week,
      start_time:    input.start_time,
      end_time:      input.end_time,
      instructor_id: input.instructor_id,
      description:   input.description,
      capacity:      input.capacity,
      active:        true,
      created_at:    Utc::now(),
    };

    let id_str          = encode_uuid(template.template_id);
    let location_str    = encode_uuid(template.location_id);
    let class_str       = template.class_id.map(encode_uuid);
    let day             = i64::from(template.day_of_week.number());
    let start_str       = encode_time(template.start_time);
    let end_str         = encode_time(template.end_time);
    let instructor_str  = template.instructor_id.map(encode_uuid);
    let description     = template.description.clone();
    let capacity        = template.capacity.map(i64::from);
    let at_str          = encode_dt(template.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO schedule_templates (
             template_id, location_id, class_id, day_of_week, start_time,
             end_time, instructor_id, description, capacity, active, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, ?10)",
          rusqlite::params![
            id_str,
            location_str,
            class_str,
            day,
            start_str,
            end_str,
            instructor_str,
            description,
            capacity,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(template_id = %template.template_id, "added schedule template");
    Ok(template)
  }

  async fn get_template(&self, id: Uuid) -> Result<Option<ScheduleTemplate>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawTemplate> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {TEMPLATE_COLUMNS} FROM schedule_templates WHERE template_id = ?1"
            ),
            rusqlite::params![id_str],
            RawTemplate::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawTemplate::into_template).transpose()
  }

  async fn list_templates(
    &self,
    location_id:      Uuid,
    include_inactive: bool,
  ) -> Result<Vec<ScheduleTemplate>> {
    let location_str = encode_uuid(location_id);

    let raws: Vec<RawTemplate> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TEMPLATE_COLUMNS}
           FROM schedule_templates
           WHERE location_id = ?1
             AND (?2 OR active = 1)
           ORDER BY day_of_week, start_time, end_time"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![location_str, include_inactive],
            RawTemplate::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTemplate::into_template).collect()
  }

  async fn deactivate_template(&self, id: Uuid) -> Result<ScheduleTemplate> {
    let id_str = encode_uuid(id);

    let raw: Option<RawTemplate> = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE schedule_templates SET active = 0 WHERE template_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(conn
          .query_row(
            &format!(
              "SELECT {TEMPLATE_COLUMNS} FROM schedule_templates WHERE template_id = ?1"
            ),
            rusqlite::params![id_str],
            RawTemplate::from_row,
          )
          .optional()?)
      })
      .await?;

    raw
      .ok_or(dojo_core::Error::TemplateNotFound(id))?
      .into_template()
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn add_session(&self, input: NewSession) -> Result<SessionInstance> {
    input.validate()?;
    self.require_location(input.location_id).await?;

    let session = SessionInstance {
      session_id:    Uuid::new_v4(),
      location_id:   input.location_id,
      class_id:      input.class_id,
      session_date:  input.session_date,
      start_time:    input.start_time,
      end_time:      input.end_time,
      instructor_id: input.instructor_id,
      description:   input.description.clone(),
      capacity:      input.capacity,
      active:        true,
      created_by:    input.created_by.clone(),
      created_at:    Utc::now(),
    };

    let encoded = EncodedSession::new(session.session_id, &input, session.created_at);
    let written = self
      .conn
      .call(move |conn| Ok(encoded.insert(conn)?))
      .await?;

    if written == 0 {
      return Err(
        dojo_core::Error::DuplicateSession {
          location_id: session.location_id,
          date:        session.session_date,
          start:       session.start_time,
          end:         session.end_time,
        }
        .into(),
      );
    }

    Ok(session)
  }

  async fn get_session(&self, id: Uuid) -> Result<Option<SessionInstance>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE session_id = ?1"),
            rusqlite::params![id_str],
            RawSession::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSession::into_session).transpose()
  }

  async fn list_sessions(&self, query: &SessionQuery) -> Result<Vec<SessionInstance>> {
    let location_str     = encode_uuid(query.location_id);
    let from_str         = query.from.map(encode_date);
    let to_str           = query.to.map(encode_date);
    let include_inactive = query.include_inactive;

    let raws: Vec<RawSession> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SESSION_COLUMNS}
           FROM sessions
           WHERE location_id = ?1
             AND (?2 IS NULL OR session_date >= ?2)
             AND (?3 IS NULL OR session_date <= ?3)
             AND (?4 OR active = 1)
           ORDER BY session_date, start_time, end_time"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![location_str, from_str, to_str, include_inactive],
            RawSession::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSession::into_session).collect()
  }

  async fn cancel_session(&self, id: Uuid) -> Result<SessionInstance> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE sessions SET active = 0 WHERE session_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(conn
          .query_row(
            &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE session_id = ?1"),
            rusqlite::params![id_str],
            RawSession::from_row,
          )
          .optional()?)
      })
      .await?;

    raw
      .ok_or(dojo_core::Error::SessionNotFound(id))?
      .into_session()
  }

  async fn insert_sessions(&self, rows: Vec<NewSession>) -> Result<usize> {
    if rows.is_empty() {
      return Ok(0);
    }
    for row in &rows {
      row.validate()?;
    }

    let now = Utc::now();
    let staged = rows.len();
    let encoded: Vec<EncodedSession> = rows
      .iter()
      .map(|row| EncodedSession::new(Uuid::new_v4(), row, now))
      .collect();

    // One call, one transaction: either every non-conflicting row lands or
    // none does.
    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0;
        for row in &encoded {
          inserted += row.insert(&tx)?;
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    tracing::debug!(staged, inserted, "batch inserted sessions");
    Ok(inserted)
  }
}
