//! Schedule expansion: materialising dated sessions from weekly templates.
//!
//! [`expand`] turns the active templates of a location into
//! [`SessionInstance`] rows for every matching day of an inclusive date range.
//! It is idempotent: slots that already hold an active session are skipped,
//! so running it twice over the same range creates nothing the second time.
//!
//! The engine does two reads (templates, then every active session already
//! in the range) and at most one write (a single batch insert). The
//! day-by-day matching in between is the pure function [`plan_sessions`].

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  actor::Actor,
  schedule::{DayOfWeek, ScheduleTemplate},
  session::{NewSession, SessionInstance, SlotKey, validate_date},
  store::{ScheduleStore, SessionQuery},
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Why an expansion failed. `E` is the store's error type.
///
/// A location without active templates is not an error; see
/// [`ExpansionReport::no_templates`].
#[derive(Debug, Error)]
pub enum ExpandError<E: std::error::Error + 'static> {
  #[error("start date {start} is after end date {end}")]
  InvalidRange { start: NaiveDate, end: NaiveDate },

  #[error("date {0} is outside the supported years 0000 to 9999")]
  DateOutOfRange(NaiveDate),

  #[error("location not found: {0}")]
  LocationNotFound(Uuid),

  /// Loading the location, templates or existing sessions failed. Nothing
  /// was written.
  #[error("failed to read schedule: {0}")]
  Read(#[source] E),

  /// The batch insert was rejected. No row from this call is considered
  /// committed.
  #[error("failed to insert sessions: {0}")]
  Write(#[source] E),
}

// ─── Request / report ────────────────────────────────────────────────────────

/// Input to [`expand`]. Both bounds are inclusive.
#[derive(Debug, Clone)]
pub struct ExpansionRequest {
  pub location_id:  Uuid,
  pub start:        NaiveDate,
  pub end:          NaiveDate,
  /// Recorded as `created_by` on every session the expansion creates.
  pub requested_by: Option<Actor>,
}

impl ExpansionRequest {
  pub fn new(location_id: Uuid, start: NaiveDate, end: NaiveDate) -> Self {
    Self { location_id, start, end, requested_by: None }
  }

  /// 1 January to 31 December of `year`. `None` if the year is out of
  /// chrono's representable range.
  pub fn for_year(location_id: Uuid, year: i32) -> Option<Self> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
    Some(Self::new(location_id, start, end))
  }

  pub fn requested_by(mut self, actor: Actor) -> Self {
    self.requested_by = Some(actor);
    self
  }

  /// Number of calendar days covered, counting both ends. Zero or negative
  /// when the range is inverted.
  pub fn days(&self) -> i64 { (self.end - self.start).num_days() + 1 }
}

/// What an expansion did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionReport {
  /// Active templates found for the location.
  pub templates:  usize,
  /// Template/date matches considered.
  pub candidates: usize,
  /// Matches whose slot was already taken by an active session.
  pub skipped:    usize,
  /// Sessions inserted by this call.
  pub created:    usize,
}

impl ExpansionReport {
  /// The location has no active templates, so there was nothing to do.
  pub fn no_templates(&self) -> bool { self.templates == 0 }
}

// ─── Planning ────────────────────────────────────────────────────────────────

/// The sessions an expansion would create, plus the counts behind them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
  pub sessions:   Vec<NewSession>,
  pub candidates: usize,
  pub skipped:    usize,
}

/// Match `templates` against every day in `[start, end]` and stage one new
/// session per match whose slot is not held by an active session in
/// `existing`.
///
/// Inactive templates and cancelled sessions are ignored. Two templates
/// describing the same slot stage a single session. Output is ordered by
/// date, then start time.
pub fn plan_sessions(
  templates: &[ScheduleTemplate],
  existing: &[SessionInstance],
  start: NaiveDate,
  end: NaiveDate,
  created_by: Option<&Actor>,
) -> Plan {
  let mut by_day: [Vec<&ScheduleTemplate>; 7] = Default::default();
  for t in templates.iter().filter(|t| t.active) {
    by_day[t.day_of_week.number() as usize].push(t);
  }
  for bucket in &mut by_day {
    bucket.sort_by_key(|t| (t.start_time, t.end_time));
  }

  let mut taken: HashSet<(Uuid, SlotKey)> = existing
    .iter()
    .filter(|s| s.active)
    .map(|s| (s.location_id, s.slot()))
    .collect();

  let mut plan = Plan::default();
  for date in start.iter_days().take_while(|d| *d <= end) {
    for t in &by_day[DayOfWeek::of(date).number() as usize] {
      plan.candidates += 1;
      let slot = SlotKey::new(date, t.start_time, t.end_time);
      if !taken.insert((t.location_id, slot)) {
        plan.skipped += 1;
        continue;
      }
      plan.sessions.push(NewSession {
        location_id:   t.location_id,
        class_id:      t.class_id,
        session_date:  date,
        start_time:    t.start_time,
        end_time:      t.end_time,
        instructor_id: t.instructor_id,
        description:   t.description.clone(),
        capacity:      t.capacity,
        created_by:    created_by.map(|a| a.username.clone()),
      });
    }
  }
  plan
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Materialise the active templates of `request.location_id` as sessions
/// over `[request.start, request.end]`, creating only the missing ones.
///
/// All new rows go to the store in a single
/// [`ScheduleStore::insert_sessions`] call. No retries are attempted; any
/// store failure is returned to the caller.
pub async fn expand<S>(
  store: &S,
  request: ExpansionRequest,
) -> Result<ExpansionReport, ExpandError<S::Error>>
where
  S: ScheduleStore + ?Sized,
{
  let ExpansionRequest { location_id, start, end, requested_by } = request;

  if start > end {
    return Err(ExpandError::InvalidRange { start, end });
  }
  for date in [start, end] {
    if validate_date(date).is_err() {
      return Err(ExpandError::DateOutOfRange(date));
    }
  }

  if store
    .get_location(location_id)
    .await
    .map_err(ExpandError::Read)?
    .is_none()
  {
    return Err(ExpandError::LocationNotFound(location_id));
  }

  let templates = store
    .list_templates(location_id, false)
    .await
    .map_err(ExpandError::Read)?;

  if templates.is_empty() {
    tracing::info!(%location_id, "no active schedule templates; nothing to expand");
    return Ok(ExpansionReport::default());
  }

  let query = SessionQuery::active_between(location_id, start, end);
  let existing = store
    .list_sessions(&query)
    .await
    .map_err(ExpandError::Read)?;

  let plan = plan_sessions(&templates, &existing, start, end, requested_by.as_ref());
  let staged = plan.sessions.len();

  let created = if staged == 0 {
    0
  } else {
    store
      .insert_sessions(plan.sessions)
      .await
      .map_err(ExpandError::Write)?
  };

  if created < staged {
    // Another writer filled some slots between our read and our insert.
    tracing::warn!(
      %location_id,
      staged,
      created,
      "some staged sessions were already present at insert time"
    );
  }

  tracing::info!(
    %location_id,
    %start,
    %end,
    templates = templates.len(),
    skipped = plan.skipped,
    created,
    "expanded schedule"
  );

  Ok(ExpansionReport {
    templates: templates.len(),
    candidates: plan.candidates,
    skipped: plan.skipped,
    created,
  })
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use chrono::{NaiveTime, Utc};

  use super::*;
  use crate::{
    location::{Location, NewLocation},
    schedule::NewTemplate,
  };

  // ─── In-memory store ───────────────────────────────────────────────────────

  #[derive(Debug, Error)]
  enum FakeError {
    #[error("backend unavailable")]
    Unavailable,
    #[error(transparent)]
    Core(#[from] crate::Error),
  }

  #[derive(Default)]
  struct State {
    locations:    Vec<Location>,
    templates:    Vec<ScheduleTemplate>,
    sessions:     Vec<SessionInstance>,
    reads:        usize,
    insert_calls: usize,
    fail_reads:   bool,
    fail_insert:  bool,
  }

  #[derive(Default)]
  struct MemoryStore {
    state: Mutex<State>,
  }

  impl MemoryStore {
    fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
      f(&mut self.state.lock().unwrap())
    }

    fn read<R>(
      &self,
      f: impl FnOnce(&State) -> R,
    ) -> Result<R, FakeError> {
      self.with(|s| {
        s.reads += 1;
        if s.fail_reads { Err(FakeError::Unavailable) } else { Ok(f(s)) }
      })
    }

    fn session_from(input: NewSession) -> SessionInstance {
      SessionInstance {
        session_id:    Uuid::new_v4(),
        location_id:   input.location_id,
        class_id:      input.class_id,
        session_date:  input.session_date,
        start_time:    input.start_time,
        end_time:      input.end_time,
        instructor_id: input.instructor_id,
        description:   input.description,
        capacity:      input.capacity,
        active:        true,
        created_by:    input.created_by,
        created_at:    Utc::now(),
      }
    }
  }

  impl ScheduleStore for MemoryStore {
    type Error = FakeError;

    async fn add_location(&self, input: NewLocation) -> Result<Location, FakeError> {
      let location = Location {
        location_id: Uuid::new_v4(),
        name:        input.name,
        created_at:  Utc::now(),
      };
      self.with(|s| s.locations.push(location.clone()));
      Ok(location)
    }

    async fn get_location(&self, id: Uuid) -> Result<Option<Location>, FakeError> {
      self.read(|s| s.locations.iter().find(|l| l.location_id == id).cloned())
    }

    async fn list_locations(&self) -> Result<Vec<Location>, FakeError> {
      self.read(|s| s.locations.clone())
    }

    async fn add_template(&self, input: NewTemplate) -> Result<ScheduleTemplate, FakeError> {
      input.validate()?;
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
      self.with(|s| s.templates.push(template.clone()));
      Ok(template)
    }

    async fn get_template(&self, id: Uuid) -> Result<Option<ScheduleTemplate>, FakeError> {
      self.read(|s| s.templates.iter().find(|t| t.template_id == id).cloned())
    }

    async fn list_templates(
      &self,
      location_id: Uuid,
      include_inactive: bool,
    ) -> Result<Vec<ScheduleTemplate>, FakeError> {
      self.read(|s| {
        s.templates
          .iter()
          .filter(|t| t.location_id == location_id && (include_inactive || t.active))
          .cloned()
          .collect()
      })
    }

    async fn deactivate_template(&self, id: Uuid) -> Result<ScheduleTemplate, FakeError> {
      self.with(|s| -> Result<ScheduleTemplate, FakeError> {
        let t = s
          .templates
          .iter_mut()
          .find(|t| t.template_id == id)
          .ok_or(crate::Error::TemplateNotFound(id))?;
        t.active = false;
        Ok(t.clone())
      })
    }

    async fn add_session(&self, input: NewSession) -> Result<SessionInstance, FakeError> {
      input.validate()?;
      let session = Self::session_from(input);
      self.with(|s| s.sessions.push(session.clone()));
      Ok(session)
    }

    async fn get_session(&self, id: Uuid) -> Result<Option<SessionInstance>, FakeError> {
      self.read(|s| s.sessions.iter().find(|x| x.session_id == id).cloned())
    }

    async fn list_sessions(
      &self,
      query: &SessionQuery,
    ) -> Result<Vec<SessionInstance>, FakeError> {
      self.read(|s| {
        s.sessions
          .iter()
          .filter(|x| x.location_id == query.location_id)
          .filter(|x| query.include_inactive || x.active)
          .filter(|x| query.from.is_none_or(|f| x.session_date >= f))
          .filter(|x| query.to.is_none_or(|t| x.session_date <= t))
          .cloned()
          .collect()
      })
    }

    async fn cancel_session(&self, id: Uuid) -> Result<SessionInstance, FakeError> {
      self.with(|s| -> Result<SessionInstance, FakeError> {
        let x = s
          .sessions
          .iter_mut()
          .find(|x| x.session_id == id)
          .ok_or(crate::Error::SessionNotFound(id))?;
        x.active = false;
        Ok(x.clone())
      })
    }

    async fn insert_sessions(&self, rows: Vec<NewSession>) -> Result<usize, FakeError> {
      self.with(|s| -> Result<usize, FakeError> {
        s.insert_calls += 1;
        if s.fail_insert {
          return Err(FakeError::Unavailable);
        }
        let n = rows.len();
        s.sessions.extend(rows.into_iter().map(Self::session_from));
        Ok(n)
      })
    }
  }

  // ─── Fixtures ──────────────────────────────────────────────────────────────

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
  }

  fn template(location_id: Uuid, day: DayOfWeek, start: NaiveTime, end: NaiveTime) -> ScheduleTemplate {
    ScheduleTemplate {
      template_id: Uuid::new_v4(),
      location_id,
      class_id: None,
      day_of_week: day,
      start_time: start,
      end_time: end,
      instructor_id: None,
      description: None,
      capacity: Some(30),
      active: true,
      created_at: Utc::now(),
    }
  }

  fn monday_evening(location_id: Uuid) -> ScheduleTemplate {
    template(location_id, DayOfWeek::MONDAY, time(18, 0), time(19, 30))
  }

  fn existing(location_id: Uuid, d: NaiveDate, start: NaiveTime, end: NaiveTime) -> SessionInstance {
    MemoryStore::session_from(NewSession::new(location_id, d, start, end))
  }

  async fn store_with_location() -> (MemoryStore, Uuid) {
    let store = MemoryStore::default();
    let loc = store
      .add_location(NewLocation { name: "Centro".into() })
      .await
      .unwrap();
    (store, loc.location_id)
  }

  async fn add_monday_evening(store: &MemoryStore, location_id: Uuid) -> ScheduleTemplate {
    let mut input = NewTemplate::new(location_id, DayOfWeek::MONDAY, time(18, 0), time(19, 30));
    input.capacity = Some(30);
    store.add_template(input).await.unwrap()
  }

  fn january(location_id: Uuid) -> ExpansionRequest {
    ExpansionRequest::new(location_id, date(2025, 1, 1), date(2025, 1, 31))
  }

  // ─── plan_sessions ─────────────────────────────────────────────────────────

  #[test]
  fn plan_covers_every_matching_day() {
    let loc = Uuid::new_v4();
    let plan = plan_sessions(&[monday_evening(loc)], &[], date(2025, 1, 1), date(2025, 1, 31), None);

    let dates: Vec<_> = plan.sessions.iter().map(|s| s.session_date).collect();
    assert_eq!(
      dates,
      [date(2025, 1, 6), date(2025, 1, 13), date(2025, 1, 20), date(2025, 1, 27)]
    );
    assert!(plan.sessions.iter().all(|s| {
      s.start_time == time(18, 0) && s.end_time == time(19, 30) && s.capacity == Some(30)
    }));
    assert_eq!(plan.candidates, 4);
    assert_eq!(plan.skipped, 0);
  }

  #[test]
  fn plan_skips_slots_already_taken() {
    let loc = Uuid::new_v4();
    let taken = existing(loc, date(2025, 1, 13), time(18, 0), time(19, 30));
    let plan = plan_sessions(&[monday_evening(loc)], &[taken], date(2025, 1, 1), date(2025, 1, 31), None);

    assert_eq!(plan.sessions.len(), 3);
    assert_eq!(plan.skipped, 1);
    assert!(plan.sessions.iter().all(|s| s.session_date != date(2025, 1, 13)));
  }

  #[test]
  fn plan_ignores_cancelled_sessions() {
    let loc = Uuid::new_v4();
    let mut cancelled = existing(loc, date(2025, 1, 13), time(18, 0), time(19, 30));
    cancelled.active = false;
    let plan = plan_sessions(&[monday_evening(loc)], &[cancelled], date(2025, 1, 1), date(2025, 1, 31), None);
    assert_eq!(plan.sessions.len(), 4);
  }

  #[test]
  fn plan_slot_with_other_times_does_not_block() {
    let loc = Uuid::new_v4();
    let other = existing(loc, date(2025, 1, 13), time(7, 0), time(8, 0));
    let plan = plan_sessions(&[monday_evening(loc)], &[other], date(2025, 1, 1), date(2025, 1, 31), None);
    assert_eq!(plan.sessions.len(), 4);
  }

  #[test]
  fn plan_bounds_are_inclusive() {
    let loc = Uuid::new_v4();
    let monday = date(2025, 1, 6);
    let plan = plan_sessions(&[monday_evening(loc)], &[], monday, monday, None);
    assert_eq!(plan.sessions.len(), 1);
    assert_eq!(plan.sessions[0].session_date, monday);

    let plan = plan_sessions(&[monday_evening(loc)], &[], date(2025, 1, 7), date(2025, 1, 12), None);
    assert!(plan.sessions.is_empty());
  }

  #[test]
  fn plan_ignores_inactive_templates() {
    let loc = Uuid::new_v4();
    let mut t = monday_evening(loc);
    t.active = false;
    let plan = plan_sessions(&[t], &[], date(2025, 1, 1), date(2025, 12, 31), None);
    assert!(plan.sessions.is_empty());
    assert_eq!(plan.candidates, 0);
  }

  #[test]
  fn plan_same_weekday_templates_each_produce_a_session() {
    let loc = Uuid::new_v4();
    let evening = monday_evening(loc);
    let morning = template(loc, DayOfWeek::MONDAY, time(7, 0), time(8, 0));
    let monday = date(2025, 1, 6);
    let plan = plan_sessions(&[evening, morning], &[], monday, monday, None);

    let starts: Vec<_> = plan.sessions.iter().map(|s| s.start_time).collect();
    assert_eq!(starts, [time(7, 0), time(18, 0)]);
  }

  #[test]
  fn plan_identical_templates_share_one_slot() {
    let loc = Uuid::new_v4();
    let monday = date(2025, 1, 6);
    let plan = plan_sessions(
      &[monday_evening(loc), monday_evening(loc)],
      &[],
      monday,
      monday,
      None,
    );
    assert_eq!(plan.sessions.len(), 1);
    assert_eq!(plan.candidates, 2);
    assert_eq!(plan.skipped, 1);
  }

  #[test]
  fn plan_copies_template_details() {
    let loc = Uuid::new_v4();
    let class_id = Uuid::new_v4();
    let instructor_id = Uuid::new_v4();
    let mut t = monday_evening(loc);
    t.class_id = Some(class_id);
    t.instructor_id = Some(instructor_id);
    t.description = Some("Jiu-jitsu adulto".into());
    t.capacity = Some(25);

    let monday = date(2025, 1, 6);
    let actor = Actor::new("sensei");
    let plan = plan_sessions(&[t], &[], monday, monday, Some(&actor));
    let s = &plan.sessions[0];
    assert_eq!(s.location_id, loc);
    assert_eq!(s.class_id, Some(class_id));
    assert_eq!(s.instructor_id, Some(instructor_id));
    assert_eq!(s.description.as_deref(), Some("Jiu-jitsu adulto"));
    assert_eq!(s.capacity, Some(25));
    assert_eq!(s.created_by.as_deref(), Some("sensei"));
  }

  // ─── expand ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn expand_january_then_rerun_creates_nothing() {
    let (store, loc) = store_with_location().await;
    add_monday_evening(&store, loc).await;

    let first = expand(&store, january(loc)).await.unwrap();
    assert_eq!(first.created, 4);
    assert_eq!(first.templates, 1);

    let second = expand(&store, january(loc)).await.unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.skipped, 4);

    // The rerun staged nothing, so it never reached the store's write path.
    store.with(|s| {
      assert_eq!(s.insert_calls, 1);
      assert_eq!(s.sessions.len(), 4);
    });
  }

  #[tokio::test]
  async fn expand_preserves_manual_session() {
    let (store, loc) = store_with_location().await;
    add_monday_evening(&store, loc).await;
    let manual = store
      .add_session(NewSession::new(loc, date(2025, 1, 13), time(18, 0), time(19, 30)))
      .await
      .unwrap();

    let report = expand(&store, january(loc)).await.unwrap();
    assert_eq!(report.created, 3);

    store.with(|s| {
      let on_13th: Vec<_> = s
        .sessions
        .iter()
        .filter(|x| x.session_date == date(2025, 1, 13))
        .collect();
      assert_eq!(on_13th.len(), 1);
      assert_eq!(on_13th[0].session_id, manual.session_id);
    });
  }

  #[tokio::test]
  async fn expand_without_templates_writes_nothing() {
    let (store, loc) = store_with_location().await;

    let report = expand(&store, january(loc)).await.unwrap();
    assert!(report.no_templates());
    assert_eq!(report.created, 0);
    store.with(|s| assert_eq!(s.insert_calls, 0));
  }

  #[tokio::test]
  async fn expand_with_only_inactive_templates_writes_nothing() {
    let (store, loc) = store_with_location().await;
    let t = add_monday_evening(&store, loc).await;
    store.deactivate_template(t.template_id).await.unwrap();

    let report = expand(&store, ExpansionRequest::for_year(loc, 2025).unwrap())
      .await
      .unwrap();
    assert!(report.no_templates());
    store.with(|s| {
      assert_eq!(s.insert_calls, 0);
      assert!(s.sessions.is_empty());
    });
  }

  #[tokio::test]
  async fn expand_inverted_range_fails_before_reading() {
    let (store, loc) = store_with_location().await;
    add_monday_evening(&store, loc).await;
    let reads_before = store.with(|s| s.reads);

    let err = expand(&store, ExpansionRequest::new(loc, date(2025, 2, 1), date(2025, 1, 1)))
      .await
      .unwrap_err();
    assert!(matches!(err, ExpandError::InvalidRange { .. }));
    store.with(|s| assert_eq!(s.reads, reads_before));
  }

  #[tokio::test]
  async fn expand_past_year_9999_fails_before_reading() {
    let (store, loc) = store_with_location().await;
    add_monday_evening(&store, loc).await;
    let reads_before = store.with(|s| s.reads);

    let request = ExpansionRequest::for_year(loc, 10000).unwrap();
    let err = expand(&store, request).await.unwrap_err();
    assert!(matches!(err, ExpandError::DateOutOfRange(d) if d == date(10000, 1, 1)));
    store.with(|s| {
      assert_eq!(s.reads, reads_before);
      assert!(s.sessions.is_empty());
    });
  }

  #[tokio::test]
  async fn expand_unknown_location_errors() {
    let store = MemoryStore::default();
    let missing = Uuid::new_v4();
    let err = expand(&store, january(missing)).await.unwrap_err();
    assert!(matches!(err, ExpandError::LocationNotFound(id) if id == missing));
  }

  #[tokio::test]
  async fn expand_read_failure_aborts_before_write() {
    let (store, loc) = store_with_location().await;
    add_monday_evening(&store, loc).await;
    store.with(|s| s.fail_reads = true);

    let err = expand(&store, january(loc)).await.unwrap_err();
    assert!(matches!(err, ExpandError::Read(FakeError::Unavailable)));
    store.with(|s| assert_eq!(s.insert_calls, 0));
  }

  #[tokio::test]
  async fn expand_write_failure_is_reported() {
    let (store, loc) = store_with_location().await;
    add_monday_evening(&store, loc).await;
    store.with(|s| s.fail_insert = true);

    let err = expand(&store, january(loc)).await.unwrap_err();
    assert!(matches!(err, ExpandError::Write(FakeError::Unavailable)));
    store.with(|s| {
      assert_eq!(s.insert_calls, 1);
      assert!(s.sessions.is_empty());
    });
  }

  #[tokio::test]
  async fn expand_full_year_in_one_batch() {
    let (store, loc) = store_with_location().await;
    add_monday_evening(&store, loc).await;

    let report = expand(&store, ExpansionRequest::for_year(loc, 2025).unwrap())
      .await
      .unwrap();
    assert_eq!(report.created, 52);
    store.with(|s| assert_eq!(s.insert_calls, 1));
  }

  #[tokio::test]
  async fn expand_leap_year_has_53_mondays() {
    // 2024 starts on a Monday and has 366 days.
    let (store, loc) = store_with_location().await;
    add_monday_evening(&store, loc).await;

    let request = ExpansionRequest::for_year(loc, 2024).unwrap();
    assert_eq!(request.days(), 366);
    let report = expand(&store, request).await.unwrap();
    assert_eq!(report.created, 53);
  }

  #[tokio::test]
  async fn expand_after_new_template_only_adds_new_slots() {
    let (store, loc) = store_with_location().await;
    add_monday_evening(&store, loc).await;
    expand(&store, january(loc)).await.unwrap();

    // Wednesdays in January 2025: 1, 8, 15, 22, 29.
    store
      .add_template(NewTemplate::new(loc, DayOfWeek::WEDNESDAY, time(19, 0), time(20, 0)))
      .await
      .unwrap();

    let report = expand(&store, january(loc)).await.unwrap();
    assert_eq!(report.created, 5);
    assert_eq!(report.skipped, 4);
    store.with(|s| assert_eq!(s.sessions.len(), 9));
  }

  #[tokio::test]
  async fn expand_stamps_requesting_actor() {
    let (store, loc) = store_with_location().await;
    add_monday_evening(&store, loc).await;

    expand(&store, january(loc).requested_by(Actor::new("admin")))
      .await
      .unwrap();

    store.with(|s| {
      assert!(s.sessions.iter().all(|x| x.created_by.as_deref() == Some("admin")));
    });
  }

  #[test]
  fn for_year_spans_the_calendar_year() {
    let req = ExpansionRequest::for_year(Uuid::new_v4(), 2025).unwrap();
    assert_eq!(req.start, date(2025, 1, 1));
    assert_eq!(req.end, date(2025, 12, 31));
    assert_eq!(req.days(), 365);
  }
}
