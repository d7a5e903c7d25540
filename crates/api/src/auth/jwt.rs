//! Signed access tokens for labdesk accounts.
//!
//! Tokens are HS256 JWTs issued as `labdesk`. There are no refresh tokens;
//! a client signs in again once its token lapses.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use labdesk_core::types::DbId;
use serde::{Deserialize, Serialize};

/// Value of the `iss` claim on every token.
pub const TOKEN_ISSUER: &str = "labdesk";

const DEFAULT_TOKEN_LIFETIME_MINS: i64 = 60;

/// Payload carried by an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Account id.
    pub sub: DbId,
    /// System role name, `admin` or `user`.
    pub role: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty) and `JWT_ACCESS_EXPIRY_MINS`
    /// (defaults to 60).
    ///
    /// # Panics
    ///
    /// On a missing or empty secret, or a lifetime that is not an integer.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse()
                .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64"),
            Err(_) => DEFAULT_TOKEN_LIFETIME_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Token lifetime in seconds, as reported to clients in `expires_in`.
    pub fn lifetime_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.as_bytes())
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.as_bytes())
    }
}

/// Sign a token for `user_id` holding system role `role`.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let issued_at = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_owned(),
        iss: TOKEN_ISSUER.to_owned(),
        iat: issued_at,
        exp: issued_at + config.lifetime_secs(),
    };
    encode(&Header::default(), &claims, &config.encoding_key())
}

/// Check signature, expiry and issuer, then return the claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[TOKEN_ISSUER]);
    decode::<Claims>(token, &config.decoding_key(), &validation).map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 15,
        }
    }

    fn sign(claims: &Claims, config: &JwtConfig) -> String {
        encode(&Header::default(), claims, &config.encoding_key()).expect("encoding should succeed")
    }

    #[test]
    fn issued_token_carries_account_and_role() {
        let config = config("labdesk-test-secret");
        let token = generate_access_token(7, "admin", &config).expect("token should be issued");

        let claims = validate_token(&token, &config).expect("token should validate");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp - claims.iat, config.lifetime_secs());
    }

    #[test]
    fn lapsed_token_is_rejected() {
        let config = config("labdesk-test-secret");
        // Past the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let token = sign(
            &Claims {
                sub: 1,
                role: "user".to_string(),
                iss: TOKEN_ISSUER.to_string(),
                iat: now - 900,
                exp: now - 300,
            },
            &config,
        );

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let config = config("labdesk-test-secret");
        let now = chrono::Utc::now().timestamp();
        let token = sign(
            &Claims {
                sub: 1,
                role: "user".to_string(),
                iss: "someone-else".to_string(),
                iat: now,
                exp: now + 600,
            },
            &config,
        );

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let token = generate_access_token(1, "user", &config("first-secret"))
            .expect("token should be issued");
        assert!(validate_token(&token, &config("second-secret")).is_err());
    }
}
