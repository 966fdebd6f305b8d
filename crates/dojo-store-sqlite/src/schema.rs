//! SQL schema for the Dojo SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS locations (
    location_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

-- Weekly recurring slots. Never deleted; switched off via `active`.
CREATE TABLE IF NOT EXISTS schedule_templates (
    template_id   TEXT PRIMARY KEY,
    location_id   TEXT NOT NULL REFERENCES locations(location_id),
    class_id      TEXT,
    day_of_week   INTEGER NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),  -- 0 = Sunday
    start_time    TEXT NOT NULL,   -- HH:MM:SS
    end_time      TEXT NOT NULL,
    instructor_id TEXT,
    description   TEXT,
    capacity      INTEGER,
    active        INTEGER NOT NULL DEFAULT 1,
    created_at    TEXT NOT NULL,
    CHECK (start_time < end_time)
);

-- Dated sessions, created by hand or by schedule expansion.
CREATE TABLE IF NOT EXISTS sessions (
    session_id    TEXT PRIMARY KEY,
    location_id   TEXT NOT NULL REFERENCES locations(location_id),
    class_id      TEXT,
    session_date  TEXT NOT NULL,   -- YYYY-MM-DD
    start_time    TEXT NOT NULL,
    end_time      TEXT NOT NULL,
    instructor_id TEXT,
    description   TEXT,
    capacity      INTEGER,
    active        INTEGER NOT NULL DEFAULT 1,
    created_by    TEXT,
    created_at    TEXT NOT NULL,
    CHECK (start_time < end_time)
);

-- At most one active session per slot. Cancelled rows do not count.
CREATE UNIQUE INDEX IF NOT EXISTS sessions_active_slot_idx
    ON sessions(location_id, session_date, start_time, end_time)
    WHERE active = 1;

CREATE INDEX IF NOT EXISTS templates_location_idx ON schedule_templates(location_id);
CREATE INDEX IF NOT EXISTS sessions_location_date_idx ON sessions(location_id, session_date);

PRAGMA user_version = 1;
";
