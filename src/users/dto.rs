use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for user registration. Fields are optional so that missing
/// ones reach the validation layer instead of failing JSON extraction.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Response returned after registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Request body for sign-in.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Response returned after sign-in. Carries the token minted at
/// registration; no new token is issued here.
#[derive(Debug, Serialize)]
pub struct SignInResponse {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub name: String,
    #[serde(rename = "accessToken")]
    pub access_token: String,
}
