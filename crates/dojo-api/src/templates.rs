//! Handlers for schedule template endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/locations/:id/templates` | Optional `?include_inactive=true` |
//! | `POST` | `/locations/:id/templates` | Body: [`TemplateBody`]; returns 201 |
//! | `POST` | `/templates/:id/deactivate` | Soft delete |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveTime;
use dojo_core::{
  schedule::{DayOfWeek, NewTemplate, ScheduleTemplate},
  store::ScheduleStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError, locations::require_location};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub include_inactive: bool,
}

/// `GET /locations/:id/templates[?include_inactive=true]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Path(location_id): Path<Uuid>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ScheduleTemplate>>, ApiError>
where
  S: ScheduleStore,
{
  require_location(&*state.store, location_id).await?;
  let templates = state
    .store
    .list_templates(location_id, params.include_inactive)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(templates))
}

/// JSON body accepted by `POST /locations/:id/templates`.
#[derive(Debug, Deserialize)]
pub struct TemplateBody {
  pub class_id:      Option<Uuid>,
  /// `0 = Sunday .. 6 = Saturday`.
  pub day_of_week:   DayOfWeek,
  pub start_time:    NaiveTime,
  pub end_time:      NaiveTime,
  pub instructor_id: Option<Uuid>,
  pub description:   Option<String>,
  pub capacity:      Option<u32>,
}

impl TemplateBody {
  fn into_new(self, location_id: Uuid) -> NewTemplate {
    NewTemplate {
      location_id,
      class_id:      self.class_id,
      day_of_week:   self.day_of_week,
      start_time:    self.start_time,
      end_time:      self.end_time,
      instructor_id: self.instructor_id,
      description:   self.description,
      capacity:      self.capacity,
    }
  }
}

/// `POST /locations/:id/templates`: returns 201 with the stored template.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Path(location_id): Path<Uuid>,
  Json(body): Json<TemplateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore,
{
  let template = state
    .store
    .add_template(body.into_new(location_id))
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(template)))
}

/// `POST /templates/:id/deactivate`
pub async fn deactivate<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ScheduleTemplate>, ApiError>
where
  S: ScheduleStore,
{
  let template = state
    .store
    .deactivate_template(id)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(template_id = %id, "deactivated schedule template");
  Ok(Json(template))
}
