//! Authentication handlers.
//!
//! Sessions travel in two cookies: `token` (HttpOnly, the signed JWT) and
//! `role` (readable by the browser for rendering decisions).

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{AppendHeaders, IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{JsonBody, ValidatedJson};
use crate::api::routes::method_not_allowed;
use crate::api::AppState;
use crate::config::{Config, ROLE_COOKIE, SESSION_COOKIE};
use crate::domain::{Registration, UserSummary};
use crate::errors::{AppError, AppResult};
use crate::services::AuthSession;
use crate::types::MessageResponse;

/// User registration request
///
/// Fields default to empty so a missing field is reported as
/// "All fields are required" rather than a decode error.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "SecurePass123!")]
    pub password: String,
    /// `super_admin` or `admin`
    #[schema(example = "admin")]
    pub role: String,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Self {
            full_name: req.full_name,
            email: req.email,
            password: req.password,
            role: req.role,
        }
    }
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email and password are required"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Email and password are required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Session body returned by register and login
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    /// Signed session token (also set as the `token` cookie)
    pub token: String,
    pub user: UserSummary,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register).fallback(method_not_allowed))
        .route("/login", post(login).fallback(method_not_allowed))
        .route("/logout", post(logout).fallback(method_not_allowed))
}

fn cookie_header(
    name: &str,
    value: &str,
    max_age: i64,
    http_only: bool,
    config: &Config,
) -> AppResult<HeaderValue> {
    let http_only_flag = if http_only { " HttpOnly;" } else { "" };
    let secure_flag = if config.secure_cookies() { " Secure;" } else { "" };
    let cookie = format!(
        "{}={};{}{} SameSite=Strict; Path=/; Max-Age={}",
        name, value, http_only_flag, secure_flag, max_age
    );

    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::internal(format!("Failed to create cookie: {}", e)))
}

type CookieHeaders = AppendHeaders<[(HeaderName, HeaderValue); 2]>;

fn session_cookies(session: &AuthSession, config: &Config) -> AppResult<CookieHeaders> {
    let max_age = session.expires_in;
    Ok(AppendHeaders([
        (
            header::SET_COOKIE,
            cookie_header(SESSION_COOKIE, &session.token, max_age, true, config)?,
        ),
        (
            header::SET_COOKIE,
            cookie_header(ROLE_COOKIE, session.user.role.as_str(), max_age, false, config)?,
        ),
    ]))
}

fn cleared_cookies(config: &Config) -> AppResult<CookieHeaders> {
    Ok(AppendHeaders([
        (
            header::SET_COOKIE,
            cookie_header(SESSION_COOKIE, "", 0, true, config)?,
        ),
        (
            header::SET_COOKIE,
            cookie_header(ROLE_COOKIE, "", 0, false, config)?,
        ),
    ]))
}

fn session_response(
    status: StatusCode,
    session: AuthSession,
    config: &Config,
) -> AppResult<Response> {
    let cookies = session_cookies(&session, config)?;
    let body = AuthResponse {
        success: true,
        token: session.token,
        user: session.user,
    };

    Ok((status, cookies, Json(body)).into_response())
}

/// Register a new user and start a session
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered; session cookies set", body = AuthResponse),
        (status = 400, description = "Missing fields or invalid role"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> AppResult<Response> {
    let session = state.auth_service.register(payload.into()).await?;
    session_response(StatusCode::CREATED, session, &state.config)
}

/// Login and start a session
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; session cookies set", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Response> {
    let session = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;
    session_response(StatusCode::OK, session, &state.config)
}

/// Clear the session cookies
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Session cookies expired", body = MessageResponse)
    )
)]
pub async fn logout(State(state): State<AppState>) -> AppResult<Response> {
    let cookies = cleared_cookies(&state.config)?;
    Ok((cookies, Json(MessageResponse::new("Logged out"))).into_response())
}
