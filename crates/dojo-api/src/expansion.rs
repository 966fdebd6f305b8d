//! Handler for `POST /locations/:id/expand`.
//!
//! Body is either an explicit inclusive range or a calendar year:
//!
//! ```json
//! {"start": "2025-01-01", "end": "2025-01-31"}
//! {"year": 2025}
//! ```

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::NaiveDate;
use dojo_core::{
  expand::{ExpansionReport, ExpansionRequest, expand},
  store::ScheduleStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, actor::CurrentActor, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ExpandBody {
  Range { start: NaiveDate, end: NaiveDate },
  Year { year: i32 },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExpandResponse {
  #[serde(flatten)]
  pub report:  ExpansionReport,
  /// Human-readable summary suitable for a notice.
  pub message: String,
}

fn summary(report: &ExpansionReport) -> String {
  if report.no_templates() {
    "no fixed schedules configured for this location".to_owned()
  } else if report.created == 0 {
    "all sessions in range already exist".to_owned()
  } else if report.created == 1 {
    "created 1 session".to_owned()
  } else {
    format!("created {} sessions", report.created)
  }
}

/// `POST /locations/:id/expand`
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Path(location_id): Path<Uuid>,
  CurrentActor(actor): CurrentActor,
  Json(body): Json<ExpandBody>,
) -> Result<Json<ExpandResponse>, ApiError>
where
  S: ScheduleStore,
{
  let mut request = match body {
    ExpandBody::Range { start, end } => ExpansionRequest::new(location_id, start, end),
    ExpandBody::Year { year } => ExpansionRequest::for_year(location_id, year)
      .ok_or_else(|| ApiError::BadRequest(format!("year {year} is out of range")))?,
  };

  if request.days() > state.max_expansion_days {
    return Err(ApiError::BadRequest(format!(
      "range covers {} days; at most {} may be expanded at once",
      request.days(),
      state.max_expansion_days
    )));
  }

  request.requested_by = actor;
  let report = expand(&*state.store, request).await?;
  Ok(Json(ExpandResponse { message: summary(&report), report }))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn body_accepts_range_or_year() {
    let range: ExpandBody =
      serde_json::from_str(r#"{"start":"2025-01-01","end":"2025-01-31"}"#).unwrap();
    assert!(matches!(range, ExpandBody::Range { .. }));

    let year: ExpandBody = serde_json::from_str(r#"{"year":2025}"#).unwrap();
    assert!(matches!(year, ExpandBody::Year { year: 2025 }));

    assert!(serde_json::from_str::<ExpandBody>(r#"{"start":"2025-01-01"}"#).is_err());
  }

  #[test]
  fn summary_messages() {
    let none = ExpansionReport::default();
    assert_eq!(summary(&none), "no fixed schedules configured for this location");

    let up_to_date = ExpansionReport { templates: 1, candidates: 4, skipped: 4, created: 0 };
    assert_eq!(summary(&up_to_date), "all sessions in range already exist");

    let created = ExpansionReport { templates: 1, candidates: 4, skipped: 0, created: 4 };
    assert_eq!(summary(&created), "created 4 sessions");
  }
}
