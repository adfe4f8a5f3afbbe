use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;
use crate::users::repo::User;

/// Route guard: resolves the `Authorization` header to a stored user record.
/// The header carries the bare access token, no `Bearer` scheme. A token is
/// valid as long as its record exists; there is no expiry or revocation.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::LoggedOut)?;

        // A store fault here is a 500, not an invalid-token 401.
        match User::find_by_access_token(&state.db, token).await? {
            Some(user) => Ok(AuthUser(user)),
            None => {
                warn!("unknown access token");
                Err(AppError::LoggedOut)
            }
        }
    }
}
