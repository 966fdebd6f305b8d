//! Async HTTP client wrapping the dojo JSON API.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use dojo_core::{
  expand::ExpansionReport,
  location::{Location, NewLocation},
  schedule::{NewTemplate, ScheduleTemplate},
  session::SessionInstance,
};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

/// Connection settings for the dojo API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Which days an expansion covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExpandRange {
  Range { start: NaiveDate, end: NaiveDate },
  Year { year: i32 },
}

/// Body of a successful `POST /locations/:id/expand`.
#[derive(Debug, Deserialize)]
pub struct ExpandOutcome {
  #[serde(flatten)]
  pub report:  ExpansionReport,
  pub message: String,
}

/// Async HTTP client for the dojo JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Send `req` and decode a JSON body, turning error statuses into the
  /// server's `{"error": ...}` message.
  async fn send<T: DeserializeOwned>(&self, what: &str, req: RequestBuilder) -> Result<T> {
    tracing::debug!(%what, "sending request");
    let resp = self
      .auth(req)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;

    let status = resp.status();
    if !status.is_success() {
      let detail = resp
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
        .unwrap_or_default();
      return Err(anyhow!("{what} → {status} {detail}"));
    }
    resp
      .json()
      .await
      .with_context(|| format!("deserialising response to {what}"))
  }

  // ── Locations ─────────────────────────────────────────────────────────────

  /// `GET /api/locations`
  pub async fn list_locations(&self) -> Result<Vec<Location>> {
    self
      .send("GET /locations", self.client.get(self.url("/locations")))
      .await
  }

  /// `POST /api/locations`
  pub async fn add_location(&self, name: &str) -> Result<Location> {
    let body = NewLocation { name: name.to_owned() };
    self
      .send("POST /locations", self.client.post(self.url("/locations")).json(&body))
      .await
  }

  // ── Templates ─────────────────────────────────────────────────────────────

  /// `GET /api/locations/<id>/templates`
  pub async fn list_templates(
    &self,
    location_id: Uuid,
    include_inactive: bool,
  ) -> Result<Vec<ScheduleTemplate>> {
    let req = self
      .client
      .get(self.url(&format!("/locations/{location_id}/templates")))
      .query(&[("include_inactive", include_inactive.to_string())]);
    self.send("GET /templates", req).await
  }

  /// `POST /api/locations/<id>/templates`
  pub async fn add_template(&self, input: &NewTemplate) -> Result<ScheduleTemplate> {
    let body = json!({
      "class_id":      input.class_id,
      "day_of_week":   input.day_of_week,
      "start_time":    input.start_time,
      "end_time":      input.end_time,
      "instructor_id": input.instructor_id,
      "description":   input.description,
      "capacity":      input.capacity,
    });
    let req = self
      .client
      .post(self.url(&format!("/locations/{}/templates", input.location_id)))
      .json(&body);
    self.send("POST /templates", req).await
  }

  /// `POST /api/templates/<id>/deactivate`
  pub async fn deactivate_template(&self, template_id: Uuid) -> Result<ScheduleTemplate> {
    let req = self
      .client
      .post(self.url(&format!("/templates/{template_id}/deactivate")));
    self.send("POST /templates/deactivate", req).await
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  /// `GET /api/locations/<id>/sessions[?from=..][&to=..]`
  pub async fn list_sessions(
    &self,
    location_id: Uuid,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    include_inactive: bool,
  ) -> Result<Vec<SessionInstance>> {
    let mut query = vec![("include_inactive", include_inactive.to_string())];
    if let Some(f) = from {
      query.push(("from", f.to_string()));
    }
    if let Some(t) = to {
      query.push(("to", t.to_string()));
    }
    let req = self
      .client
      .get(self.url(&format!("/locations/{location_id}/sessions")))
      .query(&query);
    self.send("GET /sessions", req).await
  }

  /// `POST /api/sessions/<id>/cancel`
  pub async fn cancel_session(&self, session_id: Uuid) -> Result<SessionInstance> {
    let req = self
      .client
      .post(self.url(&format!("/sessions/{session_id}/cancel")));
    self.send("POST /sessions/cancel", req).await
  }

  // ── Expansion ─────────────────────────────────────────────────────────────

  /// `POST /api/locations/<id>/expand`
  pub async fn expand(&self, location_id: Uuid, range: ExpandRange) -> Result<ExpandOutcome> {
    let req = self
      .client
      .post(self.url(&format!("/locations/{location_id}/expand")))
      .json(&range);
    self.send("POST /expand", req).await
  }
}
