use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{error::AppError, models::session::Session, state::AppState};

#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<Session>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.session.current()))
    }
}

impl CurrentUser {
    pub fn require_user(&self) -> Result<&Session, AppError> {
        self.0.as_ref().ok_or(AppError::Unauthorized)
    }
}
