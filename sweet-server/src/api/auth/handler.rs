//! Authentication Handlers
//!
//! Handles register, login, logout and the current session

use std::time::Duration;

use axum::{Json, extract::State};
use http::header::SET_COOKIE;
use http::{HeaderName, HeaderValue, StatusCode};
use shared::models::{AuthResponse, LoginRequest, LogoutResponse, RegisterRequest, User, normalize_email};

use crate::auth::CurrentUser;
use crate::auth::session::{clear_session_cookie, session_cookie};
use crate::core::ServerState;
use crate::db::models::NewUser;
use crate::db::repository::{RepoError, UserRepository};
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode, ValidatedJson};

/// `Set-Cookie` header part of a response
type SessionHeader = [(HeaderName, HeaderValue); 1];

/// Issue a JWT for `user` and wrap it in the session cookie
fn issue_session(state: &ServerState, user: &User) -> AppResult<HeaderValue> {
    let jwt = state.get_jwt_service();
    let token = jwt
        .generate_token(user)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;
    session_cookie(
        &token,
        jwt.config.lifetime_seconds(),
        state.config.is_production(),
    )
}

/// Register handler
///
/// Creates the account and signs it in (201 + session cookie)
pub async fn register(
    State(state): State<ServerState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, SessionHeader, Json<AuthResponse>)> {
    let role = req.requested_role();
    let email = normalize_email(&req.email);

    if role.is_admin() && !state.config.allow_admin_signup {
        security_log!("WARN", "admin_signup_rejected", email = email.clone());
        return Err(AppError::new(ErrorCode::AdminSignupDisabled));
    }

    let record = UserRepository::new(state.get_db())
        .create(NewUser {
            name: req.name.trim().to_string(),
            email,
            password: req.password,
            role,
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::EmailAlreadyExists),
            other => other.into(),
        })?;

    let user = User::from(record);
    let cookie = issue_session(&state, &user)?;

    tracing::info!(
        user_id = %user.id,
        email = %user.email,
        role = %user.role,
        "User registered"
    );

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, cookie)],
        Json(AuthResponse { user }),
    ))
}

/// Login handler
///
/// Unknown email and wrong password share one response, sent after the same
/// fixed delay.
pub async fn login(
    State(state): State<ServerState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AppResult<(SessionHeader, Json<AuthResponse>)> {
    let email = normalize_email(&req.email);
    let record = UserRepository::new(state.get_db())
        .find_by_email(&email)
        .await?;

    tokio::time::sleep(Duration::from_millis(state.config.login_delay_ms)).await;

    let record = match record {
        Some(record) => {
            let password_valid = record
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !password_valid {
                security_log!("WARN", "login_failed", email = email.clone(), reason = "invalid_password");
                return Err(AppError::invalid_credentials());
            }
            record
        }
        None => {
            security_log!("WARN", "login_failed", email = email.clone(), reason = "user_not_found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user = User::from(record);
    let cookie = issue_session(&state, &user)?;

    tracing::info!(
        user_id = %user.id,
        email = %user.email,
        role = %user.role,
        "User logged in successfully"
    );

    Ok(([(SET_COOKIE, cookie)], Json(AuthResponse { user })))
}

/// Current user handler
///
/// Reads the stored record, not the token claims
pub async fn me(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<AuthResponse>> {
    let record = UserRepository::new(state.get_db())
        .find_by_id(&current.id)
        .await?
        .ok_or_else(|| {
            security_log!("WARN", "session_user_missing", user_id = current.id.clone());
            AppError::with_message(ErrorCode::NotAuthenticated, "User not found")
        })?;

    Ok(Json(AuthResponse {
        user: User::from(record),
    }))
}

/// Logout handler
///
/// Always succeeds, even without a session
pub async fn logout(State(state): State<ServerState>) -> (SessionHeader, Json<LogoutResponse>) {
    (
        [(SET_COOKIE, clear_session_cookie(state.config.is_production()))],
        Json(LogoutResponse { success: true }),
    )
}
