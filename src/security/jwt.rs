//! JWT issuing and validation.

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::Sha256;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Purpose a token was issued for. A token is only accepted for its own purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
    EmailVerification,
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's (normalized) e-mail.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    /// Unique token id; makes two tokens issued in the same second distinct.
    pub jti: String,
    pub token_type: TokenType,
}

/// Access/refresh pair returned by login and refresh.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

/// Signs and validates tokens with a shared secret.
#[derive(Clone)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    secret: Vec<u8>,
    access_ttl: Duration,
    refresh_ttl: Duration,
    email_ttl: Duration,
}

impl TokenProvider {
    /// Creates a provider. `algorithm` must be one of the HMAC algorithms.
    pub fn new(
        secret: &str,
        algorithm: Algorithm,
        access_ttl: Duration,
        refresh_ttl: Duration,
        email_ttl: Duration,
    ) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            validation,
            secret: secret.as_bytes().to_vec(),
            access_ttl,
            refresh_ttl,
            email_ttl,
        }
    }

    /// Builds a provider from the token settings in [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.secret_key,
            config.jwt_algorithm,
            Duration::minutes(config.access_token_expire_minutes),
            Duration::days(config.refresh_token_expire_days),
            Duration::hours(config.email_token_expire_hours),
        )
    }

    fn ttl(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
            TokenType::EmailVerification => self.email_ttl,
        }
    }

    /// Issues a token for `subject`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if encoding fails.
    pub fn issue(&self, subject: &str, token_type: TokenType) -> Result<String, AppError> {
        self.issue_with_ttl(subject, token_type, self.ttl(token_type))
    }

    fn issue_with_ttl(
        &self,
        subject: &str,
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type,
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(
            |e| AppError::internal("Failed to issue token", json!({ "reason": e.to_string() })),
        )?;

        debug!(?token_type, "Issued token");
        Ok(token)
    }

    /// Issues a fresh access/refresh pair.
    pub fn issue_pair(&self, subject: &str) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.issue(subject, TokenType::Access)?,
            refresh_token: self.issue(subject, TokenType::Refresh)?,
            token_type: "bearer".to_string(),
        })
    }

    /// Validates signature, algorithm, expiry and purpose, returning the claims.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for any invalid, expired or
    /// wrong-purpose token.
    pub fn decode(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!("Token validation failed: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::unauthorized("Token expired", json!({ "reason": "expired" }))
                }
                _ => AppError::unauthorized("Invalid token", json!({ "reason": e.to_string() })),
            }
        })?;

        if data.claims.token_type != expected {
            return Err(AppError::unauthorized(
                "Invalid token",
                json!({ "reason": "unexpected token type" }),
            ));
        }

        Ok(data.claims)
    }

    /// Keyed HMAC-SHA256 of a token, hex-encoded, for storage and comparison.
    ///
    /// A database dump alone is not enough to replay a stored refresh token.
    pub fn fingerprint(&self, token: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}
