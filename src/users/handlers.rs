use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    error::{AppError, Result},
    state::AppState,
    users::{
        dto::{RegisterRequest, RegisterResponse, SignInRequest, SignInResponse},
        extractors::AuthUser,
        password::{hash_password, verify_password},
        repo::User,
        token::mint_access_token,
        validate::validate_new_user,
    },
};

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    // Password checks run before any hashing or storage call.
    let password = match payload.password.as_deref() {
        None | Some("") => {
            warn!("registration without password");
            return Err(AppError::Validation("Password is required".into()));
        }
        Some(p) => p,
    };
    if password.chars().count() < 8 {
        warn!("password too short");
        return Err(AppError::Validation(
            "Password has to be at least 8 characters long".into(),
        ));
    }

    let (name, email) = validate_new_user(payload.name.as_deref(), payload.email.as_deref())
        .map_err(AppError::Constraint)?;

    let password_hash = hash_password(password)?;
    let access_token = mint_access_token();
    let user = User::create(&state.db, &name, &email, &password_hash, &access_token).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            access_token: user.access_token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<SignInResponse>> {
    let (email, password) = match (payload.email.as_deref(), payload.password.as_deref()) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e.trim().to_lowercase(), p),
        _ => {
            warn!("sign-in with missing fields");
            return Err(AppError::Validation("Email and password are required".into()));
        }
    };

    // Unknown email and wrong password take the same failure path so the
    // response does not reveal which one it was.
    let user = match User::find_by_email(&state.db, &email).await? {
        Some(u) => u,
        None => {
            warn!("sign-in for unknown email");
            return Err(AppError::InvalidCredentials);
        }
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "sign-in with invalid password");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = %user.id, "user signed in");
    Ok(Json(SignInResponse {
        user_id: user.id,
        name: user.name,
        access_token: user.access_token,
    }))
}

#[instrument(skip_all)]
pub async fn my_pages(AuthUser(user): AuthUser) -> Json<Value> {
    info!(user_id = %user.id, "my-pages access");
    Json(json!({ "message": "This is your personal page" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;

    async fn error_body(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    // These paths fail before the store is touched, so a lazy pool that
    // never connects is enough.

    #[tokio::test]
    async fn register_rejects_missing_password() {
        let state = AppState::fake();
        let payload = RegisterRequest {
            name: Some("Anna".into()),
            email: Some("anna@mail.com".into()),
            password: None,
        };
        let err = register(State(state), Json(payload)).await.unwrap_err();
        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Password is required");
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let state = AppState::fake();
        let payload = RegisterRequest {
            name: Some("Anna".into()),
            email: Some("anna@mail.com".into()),
            password: Some("short".into()),
        };
        let err = register(State(state), Json(payload)).await.unwrap_err();
        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Password has to be at least 8 characters long");
    }

    #[tokio::test]
    async fn register_counts_characters_not_bytes() {
        // "ñ" is two bytes in UTF-8; four of them are still a 4-character
        // password and must be rejected.
        let state = AppState::fake();
        let payload = RegisterRequest {
            name: Some("Anna".into()),
            email: Some("anna@mail.com".into()),
            password: Some("ññññ".into()),
        };
        let err = register(State(state), Json(payload)).await.unwrap_err();
        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Password has to be at least 8 characters long");
    }

    #[tokio::test]
    async fn register_reports_field_errors_before_hashing() {
        let state = AppState::fake();
        let payload = RegisterRequest {
            name: None,
            email: Some("not-an-email".into()),
            password: Some("password123".into()),
        };
        let err = register(State(state), Json(payload)).await.unwrap_err();
        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Could not create user");
        assert_eq!(body["errors"]["name"], "Name is required");
        assert_eq!(body["errors"]["email"], "Please enter a valid email address");
    }

    #[tokio::test]
    async fn sign_in_rejects_missing_fields() {
        let state = AppState::fake();
        let payload = SignInRequest {
            email: Some("anna@mail.com".into()),
            password: None,
        };
        let err = sign_in(State(state), Json(payload)).await.unwrap_err();
        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Email and password are required");
    }
}
