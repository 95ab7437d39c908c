use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{instrument, debug, info, warn};

use crate::auth::{self, AuthKeys, AuthUser};
use crate::db::DbPool;
use crate::dto::{LoginDto, LoginResponseDto, MessageDto, RegisterDto, UserDto, MIN_PASSWORD_LENGTH};
use crate::errors::ApiError;
use crate::models::Role;
use crate::repo;

/// Handler for registering a new user
///
/// This function handles POST requests to `/api/register`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `payload` - Username, password and optional role
///
/// ### Returns
///
/// 201 with the new user (without password hash)
///
/// ### Errors
///
/// - 400 if the username or password is missing, the password is too short
///   or the role is unknown
/// - 409 if the username is taken
#[instrument(skip(pool, payload), fields(username = %payload.username))]
pub async fn register_handler(
    State(pool): State<Arc<DbPool>>,
    Json(payload): Json<RegisterDto>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let username = payload.username.trim().to_string();

    if username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("Username and password are required".to_string()));
    }

    if payload.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }

    let role = match payload.role.as_deref() {
        None => Role::default(),
        Some(raw) => Role::from_str(raw).map_err(|_| ApiError::Validation("Invalid role".to_string()))?,
    };

    if repo::get_user_by_username(&pool, &username)?.is_some() {
        warn!("Username already taken");
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }

    let password_hash = auth::hash_password(&payload.password)?;
    let user = repo::create_user(&pool, username, password_hash, role)?;

    info!("Registered user with id: {}", user.get_id());

    Ok((StatusCode::CREATED, Json(UserDto::from(&user))))
}

/// Handler for logging in
///
/// This function handles POST requests to `/api/login`. On success the
/// session token is returned in the body and set as the `auth_token`
/// cookie.
///
/// ### Errors
///
/// - 400 if the credentials are missing or wrong
#[instrument(skip(pool, keys, jar, payload), fields(username = %payload.username))]
pub async fn login_handler(
    State(pool): State<Arc<DbPool>>,
    State(keys): State<Arc<AuthKeys>>,
    jar: CookieJar,
    Json(payload): Json<LoginDto>,
) -> Result<(CookieJar, Json<LoginResponseDto>), ApiError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("Username and password are required".to_string()));
    }

    let invalid = || ApiError::Validation("Invalid credentials".to_string());

    let user = repo::get_user_by_username(&pool, payload.username.trim())?.ok_or_else(invalid)?;

    if !auth::verify_password(&payload.password, user.get_password_hash()) {
        debug!("Password mismatch");
        return Err(invalid());
    }

    let token = keys.issue_token(&user)?;

    info!("User logged in");

    let body = LoginResponseDto {
        message: "Logged in successfully".to_string(),
        token: token.clone(),
        user: UserDto::from(&user),
    };

    Ok((jar.add(auth::session_cookie(token)), Json(body)))
}

/// Handler for logging out
///
/// This function handles POST requests to `/api/logout` by expiring the
/// session cookie. It succeeds whether or not a session exists.
#[instrument(skip(jar))]
pub async fn logout_handler(jar: CookieJar) -> (CookieJar, Json<MessageDto>) {
    (jar.remove(auth::removal_cookie()), Json(MessageDto::new("Logged out successfully")))
}

/// Handler for the current user
///
/// This function handles GET requests to `/api/me`.
///
/// ### Errors
///
/// - 404 if the account behind a valid token has been removed
#[instrument(skip(pool, user), fields(user_id = %user.user_id))]
pub async fn me_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<UserDto>, ApiError> {
    let stored = repo::get_user(&pool, &user.user_id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(UserDto::from(&stored)))
}
