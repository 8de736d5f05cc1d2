use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::{
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    error::{internal_error, AppError, AppResult},
    routes::AppJson,
    state::AppState,
};

pub const SESSION_COOKIE: &str = "expense_tracker_session";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub authenticated: bool,
    pub username: String,
}

/// The signed-in user, resolved from a bearer token or the session cookie.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
}

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = session_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))
            .and_then(|token| verify_token(&state.config.jwt_secret, token));
        async move { result }
    }
}

fn session_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token)
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let Some(password_hash) = state.config.auth_password_hash.as_deref() else {
        return Err(AppError::Unauthorized("Login is not configured".into()));
    };
    if payload.username != state.config.auth_username {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }
    verify_password(&payload.password, password_hash)?;

    let lifetime = if payload.remember_me {
        Duration::days(30)
    } else {
        Duration::days(1)
    };
    let expires_at = Utc::now() + lifetime;
    let token = issue_token(&state.config.jwt_secret, &payload.username, expires_at)?;
    let cookie = format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        lifetime.num_seconds()
    );

    tracing::info!(username = %payload.username, remember_me = payload.remember_me, "signed in");
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie_header(&cookie)?)]),
        Json(LoginResponse {
            token,
            username: payload.username,
            expires_at,
        }),
    ))
}

pub async fn logout() -> AppResult<impl IntoResponse> {
    let cookie = format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0");
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie_header(&cookie)?)]),
        Json(crate::models::MessageResponse::new("Signed out")),
    ))
}

pub async fn session(session: Session) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: true,
        username: session.username,
    })
}

fn cookie_header(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(internal_error)
}

pub fn issue_token(secret: &str, username: &str, expires_at: DateTime<Utc>) -> AppResult<String> {
    let claims = Claims {
        sub: username.to_string(),
        exp: expires_at.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(internal_error)
}

fn verify_token(secret: &str, token: &str) -> Result<Session, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired session".into()))?;

    Ok(Session {
        username: data.claims.sub,
    })
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(internal_error)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> AppResult<()> {
    let parsed = PasswordHash::new(hash).map_err(internal_error)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AppError::Unauthorized("Invalid credentials".into()))
}
