// Authentication service - business logic layer

use std::sync::Arc;
use validator::Validate;

use crate::auth::{
    error::AuthError,
    models::{Identity, NewUser, SignupRequest, UserType},
    password::PasswordService,
    product_key::ProductKeyService,
    repository::UserRepository,
    token::TokenService,
};

/// Authentication service coordinating signup, signin and product keys
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    token_service: Arc<TokenService>,
    product_keys: ProductKeyService,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        token_service: Arc<TokenService>,
        product_keys: ProductKeyService,
    ) -> Self {
        Self {
            user_repo,
            token_service,
            product_keys,
        }
    }

    /// Register a new user and return a signed token
    ///
    /// This method:
    /// 1. Rejects an email that is already registered
    /// 2. Validates the payload
    /// 3. Checks the product key for privileged user types
    /// 4. Hashes the password and persists the user
    pub async fn signup(&self, request: SignupRequest, user_type: UserType) -> Result<String, AuthError> {
        if self.user_repo.email_exists(&request.email).await? {
            tracing::debug!("Signup rejected, email already registered");
            return Err(AuthError::EmailAlreadyExists);
        }

        request.validate()?;

        if user_type.is_privileged() {
            let key = request.product_key.as_deref().ok_or(AuthError::InvalidProductKey)?;
            if !self.product_keys.verify(&request.email, user_type, key) {
                return Err(AuthError::InvalidProductKey);
            }
        }

        let password_hash = PasswordService::hash_password(&request.password)?;
        let user = self
            .user_repo
            .create_user(NewUser {
                name: request.name,
                phone: request.phone,
                email: request.email,
                password_hash,
                user_type,
            })
            .await?;

        tracing::info!("Registered user id={} as {}", user.id, user.user_type);
        self.token_service.issue(&Identity {
            id: user.id,
            name: user.name,
        })
    }

    /// Check credentials and return a signed token
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn signin(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordService::verify_password(password, &user.password)? {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::debug!("User id={} signed in", user.id);
        self.token_service.issue(&Identity {
            id: user.id,
            name: user.name,
        })
    }

    pub fn generate_product_key(&self, email: &str, user_type: UserType) -> Result<String, AuthError> {
        self.product_keys.generate(email, user_type)
    }
}
