//! Trainer account service: registration, login, token refresh
//!
//! Password hashing and verification run on the blocking thread pool.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::TrainerRepository;
use sqlx::PgPool;
use trainerdesk_shared::types::{AuthTokens, TrainerProfile};
use trainerdesk_shared::validation;
use uuid::Uuid;
use validator::ValidateEmail;

/// Trainer service for authentication operations
pub struct TrainerService;

impl TrainerService {
    /// Register a new trainer account
    pub async fn register(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<AuthTokens, ApiError> {
        if !email.validate_email() {
            return Err(ApiError::Validation("Invalid email format".to_string()));
        }
        validation::validate_password(password).map_err(ApiError::Validation)?;

        if TrainerRepository::email_exists(pool, email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_owned = password.to_string();
        let password_hash = PasswordService::hash_async(password_owned)
            .await
            .map_err(ApiError::Internal)?;

        let trainer = TrainerRepository::create(pool, email, &password_hash)
            .await
            .map_err(ApiError::Internal)?;

        Self::issue_tokens(jwt_service, trainer.id)
    }

    /// Login with email and password
    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<AuthTokens, ApiError> {
        let trainer = TrainerRepository::find_by_email(pool, email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

        let password_owned = password.to_string();
        let hash_owned = trainer.password_hash.clone();
        let valid = PasswordService::verify_async(password_owned, hash_owned)
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }

        Self::issue_tokens(jwt_service, trainer.id)
    }

    /// Refresh the token pair using a valid refresh token
    pub async fn refresh_token(
        pool: &PgPool,
        jwt_service: &JwtService,
        refresh_token: &str,
    ) -> Result<AuthTokens, ApiError> {
        let claims = jwt_service
            .validate_refresh_token(refresh_token)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid refresh token: {}", e)))?;

        let trainer_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid trainer ID in token".to_string()))?;

        // The account may have been deleted since the token was issued
        TrainerRepository::find_by_id(pool, trainer_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Trainer not found".to_string()))?;

        Self::issue_tokens(jwt_service, trainer_id)
    }

    /// Get the authenticated trainer's profile
    pub async fn get_profile(pool: &PgPool, trainer_id: Uuid) -> Result<TrainerProfile, ApiError> {
        let trainer = TrainerRepository::find_by_id(pool, trainer_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Trainer not found".to_string()))?;

        Ok(TrainerProfile {
            id: trainer.id.to_string(),
            email: trainer.email,
            created_at: trainer.created_at,
        })
    }

    fn issue_tokens(jwt_service: &JwtService, trainer_id: Uuid) -> Result<AuthTokens, ApiError> {
        let access_token = jwt_service
            .generate_access_token(trainer_id)
            .map_err(ApiError::Internal)?;
        let refresh_token = jwt_service
            .generate_refresh_token(trainer_id)
            .map_err(ApiError::Internal)?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_service.access_token_expiry_secs(),
        })
    }
}
