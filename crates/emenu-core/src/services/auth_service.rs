// ============================================================================
// eMenu Core - Authentication Service
// File: crates/emenu-core/src/services/auth_service.rs
// ============================================================================
//! Account creation, password login, and bearer token checks for the
//! private API.

use std::sync::Arc;
use tracing::{info, warn};

use emenu_security::{JwtError, JwtService, PasswordError, PasswordService};
use emenu_shared::utils::mask_email;

use crate::domain::{NewUser, User, UserId};
use crate::error::DomainError;
use crate::repositories::UserRepository;

pub const TOKEN_TYPE_BEARER: &str = "Bearer";

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtService) -> Self {
        Self { users, jwt }
    }

    /// Create an active account with a hashed password.
    pub async fn create_user(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        PasswordService::check_length(password).map_err(map_password_error)?;

        if self.users.find_by_username(username.trim()).await?.is_some() {
            warn!("User creation failed: username already exists: {}", username);
            return Err(DomainError::UsernameAlreadyExists(username.trim().to_string()));
        }

        let password_hash = PasswordService::hash(password).map_err(map_password_error)?;
        let new_user = NewUser::new(
            username.to_string(),
            first_name.to_string(),
            last_name.to_string(),
            email.to_string(),
            password_hash,
        )?;

        let user = self.users.create(&new_user).await?;
        info!("User created: {} <{}>", user.username, mask_email(&user.email));
        Ok(user)
    }

    /// Login with username and password
    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken, DomainError> {
        info!("Login attempt for: {}", username);

        let user = self.users.find_by_username(username).await?.ok_or_else(|| {
            warn!("Login failed: unknown username: {}", username);
            DomainError::InvalidCredentials
        })?;

        if !user.is_active {
            warn!("Login failed: user not active: {}", username);
            return Err(DomainError::UserNotActive);
        }

        let valid = PasswordService::verify(password, &user.password_hash)
            .map_err(|_| DomainError::InvalidCredentials)?;
        if !valid {
            warn!("Login failed: invalid password for: {}", username);
            return Err(DomainError::InvalidCredentials);
        }

        let access_token = self
            .jwt
            .generate_access_token(user.id, &user.username)
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        info!("Login successful for: {}", username);
        Ok(AccessToken {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.jwt.access_token_expiry(),
        })
    }

    /// Resolve a bearer token to the active user it was issued for.
    pub async fn authenticate(&self, token: &str) -> Result<Principal, DomainError> {
        let claims = self.jwt.validate_token(token).map_err(map_jwt_error)?;
        let user_id = claims.user_id().map_err(map_jwt_error)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;
        if !user.is_active {
            return Err(DomainError::UserNotActive);
        }

        Ok(Principal {
            user_id: user.id,
            username: user.username,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Authenticated caller of a private endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub user_id: UserId,
    pub username: String,
}

fn map_password_error(e: PasswordError) -> DomainError {
    match e {
        PasswordError::TooShort(_) => DomainError::PasswordTooShort,
        PasswordError::TooLong(_) => DomainError::PasswordTooLong,
        PasswordError::HashError(msg) => DomainError::PasswordHashError(msg),
    }
}

fn map_jwt_error(e: JwtError) -> DomainError {
    DomainError::InvalidToken(e.to_string())
}
