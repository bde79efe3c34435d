use axum::{routing::get, Json, Router};

use crate::{auth::CurrentUser, error::AppError, models::session::Profile, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(profile))
}

async fn profile(current: CurrentUser) -> Result<Json<Profile>, AppError> {
    let user = current.require_user()?;
    Ok(Json(user.profile()))
}
