// JWT verification for staff routes
// HS256 tokens with 8-hour expiry, subject is the caller's user id

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token lifetime in hours
pub const TOKEN_TTL_HOURS: i64 = 8;

/// JWT claims structure
///
/// # Fields
/// * `sub` - Subject (user_id)
/// * `iat` - Issue time (seconds since epoch)
/// * `exp` - Expiry time (seconds since epoch)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: usize,
    pub exp: usize,
}

/// Creates a JWT token for a user
///
/// Token issuance belongs to the login service; this is kept for tooling and
/// tests that need a token the staff routes will accept.
///
/// # Example
/// ```
/// use shop_staff_api::auth::jwt::{create_token, verify_token};
/// use uuid::Uuid;
///
/// let user_id = Uuid::new_v4();
/// let token = create_token(user_id, "your-secret-key").expect("valid token");
/// let claims = verify_token(&token, "your-secret-key").expect("valid token");
/// assert_eq!(claims.sub, user_id);
/// ```
pub fn create_token(user_id: Uuid, secret: &str) -> Result<String, String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| e.to_string())
}

/// Verifies and decodes a JWT token
///
/// # Returns
/// * `Ok(Claims)` - The decoded claims if token is valid
/// * `Err(String)` - If token is invalid, expired, or signed with another secret
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-unit-tests";

    #[test]
    fn create_and_verify_token() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, TEST_SECRET).expect("valid token");

        let claims = verify_token(&token, TEST_SECRET).expect("valid verification");
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn wrong_secret_fails() {
        let token = create_token(Uuid::new_v4(), TEST_SECRET).expect("valid token");

        assert!(verify_token(&token, "wrong-secret").is_err());
    }

    #[test]
    fn invalid_token_fails() {
        assert!(verify_token("invalid.token.string", TEST_SECRET).is_err());
    }

    #[test]
    fn expired_token_fails() {
        let issued = Utc::now() - Duration::hours(TOKEN_TTL_HOURS + 1);
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: issued.timestamp() as usize,
            exp: (issued + Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_ref()),
        )
        .unwrap();

        assert!(verify_token(&token, TEST_SECRET).is_err());
    }

    #[test]
    fn token_expiry_set() {
        let token = create_token(Uuid::new_v4(), TEST_SECRET).expect("valid token");

        let claims = verify_token(&token, TEST_SECRET).expect("valid verification");
        let now = Utc::now().timestamp();
        let latest = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp();

        assert!(claims.iat as i64 <= now);
        assert!(claims.exp as i64 > now);
        // 10 second buffer for test execution time
        assert!(claims.exp as i64 <= latest + 10);
    }
}
