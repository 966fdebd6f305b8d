//! Handlers for session endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/locations/:id/sessions` | Optional `from`, `to` (inclusive), `include_inactive` |
//! | `POST` | `/locations/:id/sessions` | Body: [`SessionBody`]; 201, or 409 if the slot is taken |
//! | `POST` | `/sessions/:id/cancel` | Soft delete |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{NaiveDate, NaiveTime};
use dojo_core::{
  session::{NewSession, SessionInstance, validate_date},
  store::{ScheduleStore, SessionQuery},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, actor::CurrentActor, error::ApiError, locations::require_location};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub from:             Option<NaiveDate>,
  pub to:               Option<NaiveDate>,
  #[serde(default)]
  pub include_inactive: bool,
}

/// `GET /locations/:id/sessions[?from=YYYY-MM-DD][&to=YYYY-MM-DD][&include_inactive=true]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Path(location_id): Path<Uuid>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<SessionInstance>>, ApiError>
where
  S: ScheduleStore,
{
  for bound in [params.from, params.to].into_iter().flatten() {
    validate_date(bound).map_err(|e| ApiError::BadRequest(e.to_string()))?;
  }
  require_location(&*state.store, location_id).await?;
  let query = SessionQuery {
    location_id,
    from: params.from,
    to: params.to,
    include_inactive: params.include_inactive,
  };
  let sessions = state
    .store
    .list_sessions(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(sessions))
}

/// JSON body accepted by `POST /locations/:id/sessions`.
#[derive(Debug, Deserialize)]
pub struct SessionBody {
  pub class_id:      Option<Uuid>,
  pub session_date:  NaiveDate,
  pub start_time:    NaiveTime,
  pub end_time:      NaiveTime,
  pub instructor_id: Option<Uuid>,
  pub description:   Option<String>,
  pub capacity:      Option<u32>,
}

/// `POST /locations/:id/sessions`: create one session by hand.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Path(location_id): Path<Uuid>,
  CurrentActor(actor): CurrentActor,
  Json(body): Json<SessionBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore,
{
  let input = NewSession {
    location_id,
    class_id: body.class_id,
    session_date: body.session_date,
    start_time: body.start_time,
    end_time: body.end_time,
    instructor_id: body.instructor_id,
    description: body.description,
    capacity: body.capacity,
    created_by: actor.map(|a| a.username),
  };
  let session = state
    .store
    .add_session(input)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(session)))
}

/// `POST /sessions/:id/cancel`
pub async fn cancel<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<SessionInstance>, ApiError>
where
  S: ScheduleStore,
{
  let session = state
    .store
    .cancel_session(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(session))
}
