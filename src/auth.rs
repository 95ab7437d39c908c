/// Authentication
///
/// Passwords are hashed with Argon2id and sessions are carried in an
/// HS256-signed JWT stored in the `auth_token` cookie. Handlers that need
/// a caller take an [`AuthUser`] argument; there is no ambient user state.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ApiError;
use crate::models::{Collection, Role, User};

/// Name of the cookie holding the session token
pub const AUTH_COOKIE: &str = "auth_token";

/// JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub username: String,
    pub role: Role,
    /// Expiry as seconds since the Unix epoch
    pub exp: u64,
}

/// Signing and verification keys plus the token lifetime
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl AuthKeys {
    /// Creates keys from a shared secret
    ///
    /// ### Arguments
    ///
    /// * `secret` - The HMAC secret used to sign tokens
    /// * `ttl` - How long issued tokens stay valid
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Gets the lifetime of issued tokens
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a signed token for the given user
    ///
    /// ### Errors
    ///
    /// Returns an error if the system clock is before the Unix epoch or
    /// signing fails
    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?;
        let claims = Claims {
            user_id: user.get_id(),
            username: user.get_username(),
            role: user.get_role(),
            exp: (now + self.ttl).as_secs(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verifies a token's signature and expiry and returns its claims
    pub fn decode_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation).map(|data| data.claims)
    }
}

/// Builds the session cookie carrying `token`
///
/// The cookie has no Max-Age; the token's own `exp` bounds the session.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Builds the cookie used to remove the session cookie
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE).path("/").build()
}

/// Hashes a password into an Argon2id PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("Failed to hash password: {}", e))
}

/// Checks a password against a stored PHC string
///
/// Malformed hashes never verify.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            debug!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

/// The authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Owners, admins and anyone (for public collections) may read
    pub fn can_read(&self, collection: &Collection) -> bool {
        self.is_admin() || collection.get_is_public() || collection.is_owned_by(&self.user_id)
    }

    /// Owners and admins may modify or delete a collection
    pub fn can_manage(&self, collection: &Collection) -> bool {
        self.is_admin() || collection.is_owned_by(&self.user_id)
    }

    /// Only the owner may change the cards and study state of a collection
    pub fn owns(&self, collection: &Collection) -> bool {
        collection.is_owned_by(&self.user_id)
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            role: claims.role,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<AuthKeys>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = Arc::<AuthKeys>::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar.get(AUTH_COOKIE).ok_or(ApiError::Unauthorized)?;

        let claims = keys.decode_token(token.value()).map_err(|e| {
            debug!("Rejected session token: {}", e);
            ApiError::Forbidden("Invalid token".to_string())
        })?;

        Ok(AuthUser::from(claims))
    }
}
