//! JWT Token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Access token lifetime in minutes
    pub access_expiration_minutes: i64,
    /// Refresh token lifetime in days
    pub refresh_expiration_days: i64,
    /// Issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "super-secret-key-change-in-production".to_string(),
            access_expiration_minutes: 30,
            refresh_expiration_days: 7,
            issuer: "wellora".to_string(),
        }
    }
}

impl JwtConfig {
    fn lifetime(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => Duration::minutes(self.access_expiration_minutes),
            TokenKind::Refresh => Duration::days(self.refresh_expiration_days),
        }
    }

    /// Access token lifetime in seconds, as reported to clients.
    pub fn access_expires_in(&self) -> i64 {
        self.lifetime(TokenKind::Access).num_seconds()
    }
}

/// Which purpose a token was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT TokenClaims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    /// User role
    pub role: String,
    pub token_type: TokenKind,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl TokenClaims {
    pub fn new(user_id: i32, email: &str, role: &str, kind: TokenKind, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + config.lifetime(kind);

        Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            token_type: kind,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    /// Numeric user id carried in `sub`
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Create a signed JWT for a user
pub fn create_token(
    user_id: i32,
    email: &str,
    role: &str,
    kind: TokenKind,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let token_claims = TokenClaims::new(user_id, email, role, kind, config);

    encode(
        &Header::default(),
        &token_claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify and decode a JWT token
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_round_trips() {
        let config = JwtConfig::default();
        let token = create_token(42, "ann@example.com", "user", TokenKind::Access, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.email, "ann@example.com");
        assert_eq!(claims.token_type, TokenKind::Access);
        assert!(!claims.is_expired());
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn refresh_token_lives_longer() {
        let config = JwtConfig::default();
        let token = create_token(1, "a@b.c", "admin", TokenKind::Refresh, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.token_type, TokenKind::Refresh);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
    }

    #[test]
    fn wrong_secret_or_issuer_is_rejected() {
        let config = JwtConfig::default();
        let token = create_token(1, "a@b.c", "user", TokenKind::Access, &config).unwrap();

        let other_secret = JwtConfig {
            secret: "different".into(),
            ..JwtConfig::default()
        };
        assert!(verify_token(&token, &other_secret).is_err());

        let other_issuer = JwtConfig {
            issuer: "someone-else".into(),
            ..JwtConfig::default()
        };
        assert!(verify_token(&token, &other_issuer).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = JwtConfig {
            access_expiration_minutes: -10,
            ..JwtConfig::default()
        };
        let token = create_token(1, "a@b.c", "user", TokenKind::Access, &config).unwrap();
        assert!(verify_token(&token, &config).is_err());
    }
}
