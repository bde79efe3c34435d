use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Form, Json, Router,
};
use serde::Deserialize;

use crate::{
    auth::CurrentUser,
    error::AppError,
    models::trip::{iso_millis, Trip, TripDraft},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trips_list).post(trip_create))
        .route("/:id", get(trip_detail).delete(trip_delete))
}

async fn trips_list(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<Trip>>, AppError> {
    current.require_user()?;
    Ok(Json(state.trips.list_trips().await))
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct TripForm {
    load_location: String,
    unload_location: String,
    date: Option<String>,
}

impl TripForm {
    /// An empty or unparseable date is treated as not picked.
    fn into_draft(self) -> TripDraft {
        let date = self
            .date
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| iso_millis::parse(raw).ok());
        TripDraft::new(self.load_location, self.unload_location, date)
    }
}

async fn trip_create(
    State(state): State<AppState>,
    current: CurrentUser,
    Form(form): Form<TripForm>,
) -> Result<(StatusCode, Json<Trip>), AppError> {
    current.require_user()?;
    let trip = state.trips.add_trip(&form.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

async fn trip_detail(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Trip>, AppError> {
    current.require_user()?;
    state.trips.trip(&id).await.map(Json).ok_or(AppError::NotFound)
}

async fn trip_delete(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    current.require_user()?;
    state.trips.delete_trip(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
