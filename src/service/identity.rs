//! Registration, login and refresh token lifecycle

use crate::cache::CacheOperations;
use crate::domain::{LoginInput, NewUser, RegisterInput, User};
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use crate::repository::UserRepository;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

/// Tokens issued on login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: User,
    pub access: String,
    pub refresh: String,
}

pub struct IdentityService<U: UserRepository, C: CacheOperations> {
    user_repo: Arc<U>,
    jwt_manager: JwtManager,
    cache: Arc<C>,
}

impl<U: UserRepository, C: CacheOperations> IdentityService<U, C> {
    pub fn new(user_repo: Arc<U>, jwt_manager: JwtManager, cache: Arc<C>) -> Self {
        Self {
            user_repo,
            jwt_manager,
            cache,
        }
    }

    /// Create an account. Duplicate username/email is reported before any
    /// other input problem.
    pub async fn register(&self, input: RegisterInput) -> Result<User> {
        if self
            .user_repo
            .exists_by_username_or_email(&input.username, &input.email)
            .await?
        {
            return Err(AppError::Conflict(
                "Username or email already exist".to_string(),
            ));
        }

        if input.password != input.confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }

        input.validate()?;

        let password_hash = hash_password(&input.password)?;
        let user = self
            .user_repo
            .create(&NewUser {
                username: input.username,
                email: input.email,
                password_hash,
                is_staff: input.is_staff,
            })
            .await?;

        info!(user_id = user.id, is_staff = user.is_staff, "User registered");
        Ok(user)
    }

    pub async fn login(&self, input: LoginInput) -> Result<LoginResult> {
        let user = match self.user_repo.find_by_username(&input.username).await? {
            Some(user) if verify_password(&input.password, &user.password_hash)? => user,
            _ => {
                metrics::counter!("bloodbank_auth_login_total", "result" => "failure").increment(1);
                warn!(username = %input.username, "Login failed");
                return Err(AppError::Unauthorized("Invalid credentials".to_string()));
            }
        };

        let refresh = self.jwt_manager.create_refresh_token(user.id)?;
        let access = self
            .jwt_manager
            .create_access_token(user.id, &user.username, user.is_staff)?;

        metrics::counter!("bloodbank_auth_login_total", "result" => "success").increment(1);
        info!(user_id = user.id, "User logged in");
        Ok(LoginResult {
            user,
            access,
            refresh,
        })
    }

    /// Revoke a refresh token for the rest of its lifetime
    pub async fn logout(&self, refresh: &str) -> Result<()> {
        if refresh.trim().is_empty() {
            return Err(AppError::Validation("Refresh token is required".to_string()));
        }

        let claims = self
            .jwt_manager
            .verify_refresh_token(refresh)
            .map_err(|_| AppError::Validation("Token is invalid or expired".to_string()))?;

        let revoked = self
            .cache
            .add_to_token_blacklist(&claims.jti, claims.remaining_ttl_secs())
            .await?;
        if !revoked {
            return Err(AppError::Validation("Token is blacklisted".to_string()));
        }

        info!(user_id = %claims.sub, "Refresh token revoked");
        Ok(())
    }

    /// Mint a new access token from a live refresh token
    pub async fn refresh(&self, refresh: &str) -> Result<String> {
        let claims = self
            .jwt_manager
            .verify_refresh_token(refresh)
            .map_err(|_| AppError::Unauthorized("Token is invalid or expired".to_string()))?;

        if self.cache.is_token_blacklisted(&claims.jti).await? {
            return Err(AppError::Unauthorized("Token is blacklisted".to_string()));
        }

        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Token is invalid or expired".to_string()))?;
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        self.jwt_manager
            .create_access_token(user.id, &user.username, user.is_staff)
    }
}

/// Hash a password using Argon2
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against its stored hash
fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
