use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;

use crate::{
    error::AppError,
    models::{session::Profile, trip::Location},
    state::AppState,
    validation::validate_login,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/locations", get(locations))
        .route("/login", post(login_submit))
        .route("/logout", post(logout))
}

async fn locations() -> Json<Vec<&'static str>> {
    Json(Location::ALL.iter().map(Location::as_str).collect())
}

#[derive(Deserialize)]
struct LoginForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<Profile>, AppError> {
    validate_login(&form.name, &form.email, &form.password)?;
    let session = state
        .session
        .login(form.name.trim(), &form.email, &form.password)
        .await?;
    Ok(Json(session.profile()))
}

async fn logout(State(state): State<AppState>) -> StatusCode {
    state.session.logout().await;
    StatusCode::NO_CONTENT
}
