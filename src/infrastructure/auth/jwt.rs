//! JWT token generation and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::account::Account;
use crate::domain::DomainError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (account ID)
    pub sub: String,
    /// Login id
    pub login_id: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    /// Create new claims for an account
    pub fn new(account: &Account, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours as i64);

        Self {
            sub: account.id().as_str().to_string(),
            login_id: account.login_id().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Get the account ID from the claims
    pub fn account_id(&self) -> &str {
        &self.sub
    }
}

/// Configuration for the JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token lifetime in hours for a plain sign-in
    pub expiration_hours: u64,
    /// Token lifetime in hours when the remember-me flag is set
    pub remember_me_expiration_hours: u64,
}

impl JwtConfig {
    pub fn new(
        secret: impl Into<String>,
        expiration_hours: u64,
        remember_me_expiration_hours: u64,
    ) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
            remember_me_expiration_hours,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            expiration_hours: 24,
            remember_me_expiration_hours: 24 * 30,
        }
    }
}

/// Trait for JWT operations
pub trait JwtGenerator: Send + Sync + Debug {
    /// Generate a token for an account; `remember_me` selects the extended
    /// lifetime (the persistent-session analogue)
    fn generate(&self, account: &Account, remember_me: bool) -> Result<String, DomainError>;

    /// Validate a token and return the claims
    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError>;

    /// Token lifetime in hours for the given remember-me choice
    fn expiration_hours(&self, remember_me: bool) -> u64;
}

/// HS256 JWT service
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_hours", &self.config.expiration_hours)
            .field(
                "remember_me_expiration_hours",
                &self.config.remember_me_expiration_hours,
            )
            .field("keys", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }
}

impl JwtGenerator for JwtService {
    fn generate(&self, account: &Account, remember_me: bool) -> Result<String, DomainError> {
        let claims = JwtClaims::new(account, self.expiration_hours(remember_me));

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::credential(format!("Failed to generate JWT: {}", e)))
    }

    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError> {
        let validation = Validation::default();

        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| DomainError::credential(format!("Invalid JWT: {}", e)))?;

        Ok(token_data.claims)
    }

    fn expiration_hours(&self, remember_me: bool) -> u64 {
        if remember_me {
            self.config.remember_me_expiration_hours
        } else {
            self.config.expiration_hours
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountId;

    fn create_test_account() -> Account {
        Account::new(
            AccountId::new("test-account").unwrap(),
            "tanaka01",
            "tanaka@example.com",
            "hashed",
        )
    }

    fn create_service() -> JwtService {
        JwtService::new(JwtConfig::new("test-secret-key-12345", 24, 720))
    }

    #[test]
    fn test_generate_and_validate() {
        let service = create_service();
        let account = create_test_account();

        let token = service.generate(&account, false).unwrap();
        assert!(!token.is_empty());

        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.sub, "test-account");
        assert_eq!(claims.login_id, "tanaka01");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_remember_me_extends_expiry() {
        let service = create_service();
        let account = create_test_account();

        assert_eq!(service.expiration_hours(false), 24);
        assert_eq!(service.expiration_hours(true), 720);

        let short = service.generate(&account, false).unwrap();
        let long = service.generate(&account, true).unwrap();

        let short_claims = service.validate(&short).unwrap();
        let long_claims = service.validate(&long).unwrap();

        assert!(long_claims.exp > short_claims.exp);
    }

    #[test]
    fn test_invalid_token() {
        let service = create_service();

        assert!(service.validate("invalid-token").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service1 = JwtService::new(JwtConfig::new("secret-1", 24, 720));
        let service2 = JwtService::new(JwtConfig::new("secret-2", 24, 720));

        let token = service1.generate(&create_test_account(), false).unwrap();

        assert!(service2.validate(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new(JwtConfig::new("test-secret", 24, 720));
        let account = create_test_account();

        let past = Utc::now() - Duration::hours(1);
        let claims = JwtClaims {
            sub: account.id().as_str().to_string(),
            login_id: account.login_id().to_string(),
            iat: (past - Duration::hours(2)).timestamp(),
            exp: past.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn test_default_config() {
        let service = JwtService::new(JwtConfig::default());
        assert_eq!(service.expiration_hours(false), 24);
        assert_eq!(service.expiration_hours(true), 720);
    }
}
