use crate::api::auth::error::AuthError;
use crate::api::auth::interfaces::AuthClaims;
use crate::database::app_user::UserRole;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// Signs an access token for `user_id` that expires after `ttl`.
pub fn create_access_token(
    jwt_secret: &str,
    user_id: i32,
    role: UserRole,
    ttl: Duration,
) -> Result<String, AuthError> {
    let claims = AuthClaims {
        sub: user_id,
        exp: (Utc::now() + ttl).timestamp(),
        role,
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )?)
}

/// Verifies signature and expiry. Any failure is reported as `InvalidToken`.
pub fn decode_access_token(token: &str, jwt_secret: &str) -> Result<AuthClaims, AuthError> {
    decode::<AuthClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}
