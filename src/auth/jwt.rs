use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user id
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
}

/// HS256 keys derived from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Mint a bearer token for `user_id`, valid for `lifetime`.
pub fn issue_token(keys: &JwtKeys, user_id: Uuid, lifetime: Duration) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        exp: (now + lifetime).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(&Header::default(), &claims, &keys.encoding)
        .map_err(|e| AppError::InternalServerError(format!("Failed to encode token: {e}")))
}

/// Validate a bearer token and return the user id it was issued for.
pub fn validate_token(keys: &JwtKeys, token: &str) -> Result<Uuid, AppError> {
    decode::<Claims>(token, &keys.decoding, &Validation::default())
        .map(|data| data.claims.sub)
        .map_err(|e| AppError::AuthError(format!("Invalid token: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_validate() {
        let keys = JwtKeys::from_secret(b"test-secret");
        let user = Uuid::new_v4();
        let token = issue_token(&keys, user, Duration::hours(1)).unwrap();
        assert_eq!(validate_token(&keys, &token).unwrap(), user);
    }

    #[test]
    fn test_rejects_foreign_and_expired_tokens() {
        let keys = JwtKeys::from_secret(b"test-secret");
        let other = JwtKeys::from_secret(b"other-secret");
        let user = Uuid::new_v4();

        let foreign = issue_token(&other, user, Duration::hours(1)).unwrap();
        assert!(matches!(
            validate_token(&keys, &foreign),
            Err(AppError::AuthError(_))
        ));

        let expired = issue_token(&keys, user, Duration::hours(-2)).unwrap();
        assert!(validate_token(&keys, &expired).is_err());
        assert!(validate_token(&keys, "garbage").is_err());
    }
}
