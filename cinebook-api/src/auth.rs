use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::post,
    Extension, Json, Router,
};
use chrono::{Duration, Utc};
use cinebook_core::repository::SessionHandle;
use cinebook_shared::Masked;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::AppError,
    middleware::auth::{CustomerClaims, CUSTOMER_ROLE},
    state::{AppState, AuthConfig},
};

#[derive(Debug, Deserialize)]
struct SignUpRequest {
    email: String,
    password: String,
    username: String,
}

#[derive(Debug, Deserialize)]
struct SignInRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    username: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/signin", post(sign_in))
}

/// Mints a token bound to a fresh session.
pub fn issue_token(auth: &AuthConfig, email: &str) -> Result<String, AppError> {
    let claims = CustomerClaims {
        sub: email.to_owned(),
        sid: SessionHandle::new().as_uuid(),
        role: CUSTOMER_ROLE.to_owned(),
        exp: (Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(auth.secret.as_bytes()))
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::ValidationError(e.to_string()))
}

async fn sign_up(State(state): State<AppState>, body: Bytes) -> Result<Json<AuthResponse>, AppError> {
    let req: SignUpRequest = parse_body(&body)?;
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::ValidationError(
            "Email and password are required".to_string(),
        ));
    }

    let account = state
        .accounts
        .register(req.email.trim(), &req.username, &req.password)
        .await?;
    let token = issue_token(&state.auth, &account.email)?;

    Ok(Json(AuthResponse {
        token,
        username: account.username,
    }))
}

async fn sign_in(State(state): State<AppState>, body: Bytes) -> Result<Json<AuthResponse>, AppError> {
    let req: SignInRequest = parse_body(&body)?;
    let account = state.accounts.verify(req.email.trim(), &req.password).await?;
    let token = issue_token(&state.auth, &account.email)?;

    info!("Signed in {}", Masked::from(account.email.as_str()));
    Ok(Json(AuthResponse {
        token,
        username: account.username,
    }))
}

/// Drops the session's scratch state. The client discards its token.
pub async fn sign_out(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .clear(&claims.session())
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}
