// Product keys gate self-registration for privileged user types

use crate::auth::{error::AuthError, models::UserType, password::PasswordService};

/// Derives and checks product keys from the configured secret
///
/// A key is a salted hash of `"{email}-{USER_TYPE}-{secret}"`, so it is bound to
/// one email and one user type and cannot be produced without the secret.
pub struct ProductKeyService {
    secret: String,
}

impl ProductKeyService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn material(&self, email: &str, user_type: UserType) -> String {
        format!("{}-{}-{}", email, user_type.as_str(), self.secret)
    }

    pub fn generate(&self, email: &str, user_type: UserType) -> Result<String, AuthError> {
        PasswordService::hash_password(&self.material(email, user_type))
    }

    /// Returns false for a key derived for another email, user type or secret
    pub fn verify(&self, email: &str, user_type: UserType, key: &str) -> bool {
        PasswordService::verify_password(&self.material(email, user_type), key).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_key_verifies() {
        let service = ProductKeyService::new("product-secret");
        let key = service.generate("jane@realty.com", UserType::Realtor).unwrap();
        assert!(service.verify("jane@realty.com", UserType::Realtor, &key));
    }

    #[test]
    fn test_key_is_bound_to_email_and_type() {
        let service = ProductKeyService::new("product-secret");
        let key = service.generate("jane@realty.com", UserType::Realtor).unwrap();
        assert!(!service.verify("john@realty.com", UserType::Realtor, &key));
        assert!(!service.verify("jane@realty.com", UserType::Admin, &key));
    }

    #[test]
    fn test_key_is_bound_to_secret() {
        let key = ProductKeyService::new("product-secret")
            .generate("jane@realty.com", UserType::Realtor)
            .unwrap();
        let other = ProductKeyService::new("rotated-secret");
        assert!(!other.verify("jane@realty.com", UserType::Realtor, &key));
    }

    #[test]
    fn test_garbage_key_is_rejected() {
        let service = ProductKeyService::new("product-secret");
        assert!(!service.verify("jane@realty.com", UserType::Realtor, "garbage"));
    }
}
