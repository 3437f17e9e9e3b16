//! Admin authentication: Argon2 credential check + JWT sessions

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

use crate::state::AppState;
use crate::util::verify_password;

const SESSION_EXPIRY_HOURS: i64 = 12;

/// JWT claims for an admin session
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin username
    pub sub: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated admin extracted from the bearer token
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub username: String,
    /// Unix seconds
    pub expires_at: i64,
}

/// Single configured admin account
#[derive(Clone)]
pub struct AdminAuthenticator {
    username: String,
    password_hash: String,
    jwt_secret: String,
}

impl AdminAuthenticator {
    pub fn new(username: &str, password_hash: &str, jwt_secret: &str) -> Self {
        if argon2::PasswordHash::new(password_hash).is_err() {
            tracing::warn!("ADMIN_PASSWORD_HASH is not an Argon2 PHC string, admin login disabled");
        }
        Self {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            jwt_secret: jwt_secret.to_string(),
        }
    }

    /// Check credentials and issue a session token
    pub fn authenticate(&self, credentials: &Credentials) -> Result<Session, AppError> {
        // Hash check runs even for an unknown username
        let password_ok = verify_password(&credentials.password, &self.password_hash);
        let username_ok = credentials.username.trim() == self.username;
        if !(username_ok && password_ok) {
            return Err(AppError::invalid_credentials());
        }

        let now = chrono::Utc::now();
        let expires_at = (now + chrono::Duration::hours(SESSION_EXPIRY_HOURS)).timestamp();
        let claims = AdminClaims {
            sub: self.username.clone(),
            exp: expires_at as usize,
            iat: now.timestamp() as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| {
            tracing::error!("JWT encode failed: {e}");
            AppError::internal("Failed to create session")
        })?;

        Ok(Session {
            token,
            username: self.username.clone(),
            expires_at,
        })
    }

    /// Validate a bearer token issued by [`authenticate`](Self::authenticate)
    pub fn verify_token(&self, token: &str) -> Result<AdminIdentity, AppError> {
        let data = jsonwebtoken::decode::<AdminClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::token_expired(),
            _ => {
                tracing::debug!("JWT validation failed: {e}");
                AppError::invalid_token("Invalid or expired token")
            }
        })?;

        if data.claims.sub != self.username {
            return Err(AppError::invalid_token("Unknown admin"));
        }
        Ok(AdminIdentity {
            username: data.claims.sub,
        })
    }
}

/// Middleware that requires a valid admin bearer token
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::not_authenticated().with_detail("reason", "Missing Authorization header")
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::invalid_token("Invalid Authorization format"))?;

    let identity = state.admin_auth.verify_token(token)?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::hash_password;
    use shared::error::ErrorCode;

    fn authenticator() -> AdminAuthenticator {
        let hash = hash_password("s3cret").unwrap();
        AdminAuthenticator::new("admin", &hash, "jwt-secret")
    }

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_login_and_verify() {
        let auth = authenticator();
        let session = auth.authenticate(&creds("admin", "s3cret")).unwrap();
        assert_eq!(session.username, "admin");
        assert!(session.expires_at > chrono::Utc::now().timestamp());

        let identity = auth.verify_token(&session.token).unwrap();
        assert_eq!(identity.username, "admin");
    }

    #[test]
    fn test_wrong_password() {
        let err = authenticator()
            .authenticate(&creds("admin", "nope"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
    }

    #[test]
    fn test_wrong_username() {
        let err = authenticator()
            .authenticate(&creds("root", "s3cret"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let session = authenticator()
            .authenticate(&creds("admin", "s3cret"))
            .unwrap();
        let other = AdminAuthenticator::new("admin", "", "different-secret");
        let err = other.verify_token(&session.token).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_garbage_token() {
        let err = authenticator().verify_token("not.a.jwt").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }
}
