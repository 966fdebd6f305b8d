//! Handlers for `/locations` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/locations` | Sorted by name |
//! | `POST` | `/locations` | Body: `{"name":"..."}` |
//! | `GET`  | `/locations/:id` | 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use dojo_core::{
  location::{Location, NewLocation},
  store::ScheduleStore,
};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// `GET /locations`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Location>>, ApiError>
where
  S: ScheduleStore,
{
  let locations = state.store.list_locations().await.map_err(ApiError::store)?;
  Ok(Json(locations))
}

/// `POST /locations`, body: `{"name":"Polo Centro"}`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewLocation>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScheduleStore,
{
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("location name must not be empty".into()));
  }
  let location = state
    .store
    .add_location(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(location)))
}

/// `GET /locations/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Location>, ApiError>
where
  S: ScheduleStore,
{
  Ok(Json(require_location(&*state.store, id).await?))
}

/// Fetch a location or fail with 404.
pub(crate) async fn require_location<S>(store: &S, id: Uuid) -> Result<Location, ApiError>
where
  S: ScheduleStore,
{
  store
    .get_location(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("location {id} not found")))
}
