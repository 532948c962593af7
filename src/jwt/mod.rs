//! JWT token handling

use crate::config::JwtConfig;
use crate::error::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audience shared by every token this service issues
const AUDIENCE: &str = "bloodbank";

/// Clock skew tolerated when checking `exp`
pub const TOKEN_LEEWAY_SECS: u64 = 5;

const TOKEN_TYPE_ACCESS: &str = "access";
const TOKEN_TYPE_REFRESH: &str = "refresh";

/// Access token claims (sent as `Authorization: Bearer ...`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    /// Admin flag at issuance time
    pub is_staff: bool,
    pub iss: String,
    pub aud: String,
    /// Token type discriminator (prevents token confusion attacks)
    #[serde(default)]
    pub token_type: String,
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Refresh token claims. Only ever exchanged for a new access token or revoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    #[serde(default)]
    pub token_type: String,
    /// Token ID, the key of the revocation list
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

impl RefreshClaims {
    /// Seconds this token can still pass verification, leeway included
    pub fn remaining_ttl_secs(&self) -> u64 {
        let now = Utc::now().timestamp();
        let remaining = (self.exp - now).max(0) as u64;
        remaining + TOKEN_LEEWAY_SECS
    }
}

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Validation with [`TOKEN_LEEWAY_SECS`] instead of the default 60 seconds
    fn strict_validation(&self) -> Validation {
        let mut v = Validation::new(Algorithm::HS256);
        v.leeway = TOKEN_LEEWAY_SECS;
        v.set_audience(&[AUDIENCE]);
        v.set_issuer(&[&self.config.issuer]);
        v
    }

    /// Create an access token for an identity
    pub fn create_access_token(&self, user_id: i64, username: &str, is_staff: bool) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.access_token_ttl_secs);

        let claims = AccessClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            is_staff,
            iss: self.config.issuer.clone(),
            aud: AUDIENCE.to_string(),
            token_type: TOKEN_TYPE_ACCESS.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(e.into()))
    }

    pub fn create_refresh_token(&self, user_id: i64) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.refresh_token_ttl_secs);

        let claims = RefreshClaims {
            sub: user_id.to_string(),
            iss: self.config.issuer.clone(),
            aud: AUDIENCE.to_string(),
            token_type: TOKEN_TYPE_REFRESH.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(e.into()))
    }

    /// Verify and decode an access token
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &self.strict_validation())?;
        if token_data.claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(AppError::Unauthorized("Token has wrong type".to_string()));
        }
        Ok(token_data.claims)
    }

    /// Verify and decode a refresh token (signature, expiry and type only;
    /// revocation is checked against the revocation list by the caller)
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims> {
        let token_data =
            decode::<RefreshClaims>(token, &self.decoding_key, &self.strict_validation())?;
        if token_data.claims.token_type != TOKEN_TYPE_REFRESH {
            return Err(AppError::Unauthorized("Token has wrong type".to_string()));
        }
        Ok(token_data.claims)
    }
}
