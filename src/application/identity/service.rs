//! User management service
//!
//! All identity use-cases live here. HTTP handlers are thin wrappers that
//! delegate to this service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::AdminConfig;
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, GetUserDto, ProfileFields, RepositoryProvider,
    UpdateUserDto, User, UserRole,
};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig, TokenKind};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::shared::{InfraError, PaginatedResult};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Token pair returned by login and refresh
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub profile: ProfileFields,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig, bcrypt_cost: u32) -> Self {
        Self {
            repos,
            jwt_config,
            bcrypt_cost,
        }
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new account with the `user` role.
    pub async fn register(&self, input: RegisterUser) -> DomainResult<User> {
        let email = normalize_email(&input.email);
        if !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if self.repos.users().get_user_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered".into()));
        }

        let password_hash = hash_password(&input.password, self.bcrypt_cost)?;
        let user = self
            .repos
            .users()
            .create_user(CreateUserDto {
                name: input.name.trim().to_string(),
                email,
                password_hash,
                role: UserRole::User,
                profile: input.profile,
            })
            .await?;

        info!(user_id = user.id, email = %user.email, "New user registered");
        Ok(user)
    }

    /// Create the configured admin account when no users exist yet.
    ///
    /// Returns the created admin, or `None` when the table was not empty.
    pub async fn ensure_default_admin(&self, admin: &AdminConfig) -> DomainResult<Option<User>> {
        if self.repos.users().count_users().await? > 0 {
            return Ok(None);
        }

        let password_hash = hash_password(&admin.password, self.bcrypt_cost)?;
        let user = self
            .repos
            .users()
            .create_user(CreateUserDto {
                name: admin.name.clone(),
                email: normalize_email(&admin.email),
                password_hash,
                role: UserRole::Admin,
                profile: ProfileFields::default(),
            })
            .await?;

        info!(email = %user.email, "Default admin created");
        warn!("⚠️  Please change the default admin password immediately!");
        Ok(Some(user))
    }

    // ── Authentication ──────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthTokens> {
        let user = self
            .repos
            .users()
            .get_user_by_email(&normalize_email(email))
            .await?
            .ok_or_else(invalid_credentials)?;

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(invalid_credentials());
        }

        info!(user_id = user.id, "User logged in");
        self.issue_tokens(user)
    }

    /// Exchange a refresh token for a fresh token pair.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<AuthTokens> {
        let claims = verify_token(refresh_token, &self.jwt_config)
            .map_err(|_| DomainError::Unauthorized("Invalid or expired refresh token".into()))?;

        if claims.token_type != TokenKind::Refresh {
            return Err(DomainError::Unauthorized(
                "Expected a refresh token".into(),
            ));
        }

        let user_id = claims
            .user_id()
            .ok_or_else(|| DomainError::Unauthorized("Malformed token subject".into()))?;

        // Re-read the user so role changes take effect on refresh
        let user = self
            .repos
            .users()
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("User no longer exists".into()))?;

        self.issue_tokens(user)
    }

    fn issue_tokens(&self, user: User) -> DomainResult<AuthTokens> {
        let sign = |kind| {
            create_token(user.id, &user.email, user.role.as_str(), kind, &self.jwt_config)
                .map_err(|e| DomainError::from(InfraError::Crypto(e.to_string())))
        };
        let access_token = sign(TokenKind::Access)?;
        let refresh_token = sign(TokenKind::Refresh)?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.access_expires_in(),
            user,
        })
    }

    // ── Profile ─────────────────────────────────────────────────

    pub async fn profile(&self, user_id: i32) -> DomainResult<User> {
        self.repos
            .users()
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }

    pub async fn update_profile(&self, user_id: i32, dto: UpdateUserDto) -> DomainResult<User> {
        if dto.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(DomainError::Validation("Name must not be empty".into()));
        }
        let user = self.repos.users().update_user(user_id, dto).await?;
        info!(user_id, "Profile updated");
        Ok(user)
    }

    // ── Administration ──────────────────────────────────────────

    pub async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        self.repos.users().list_users(dto).await
    }

    pub async fn change_role(&self, user_id: i32, role: UserRole) -> DomainResult<User> {
        let user = self.repos.users().update_role(user_id, role).await?;
        info!(user_id, role = %role, "User role changed");
        Ok(user)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid_credentials() -> DomainError {
    DomainError::Unauthorized("Invalid credentials".into())
}
