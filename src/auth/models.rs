// Authentication data models and DTOs

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// North American phone numbers: `(555) 555-5555` or `555-555-5555`
static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\([0-9]{3}\) |[0-9]{3}-)[0-9]{3}-[0-9]{4}$").unwrap());

/// Role a user registers with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserType {
    Buyer,
    Realtor,
    Admin,
}

impl UserType {
    pub const ALL: [UserType; 3] = [UserType::Buyer, UserType::Realtor, UserType::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Buyer => "BUYER",
            UserType::Realtor => "REALTOR",
            UserType::Admin => "ADMIN",
        }
    }

    /// Parse a user type, ignoring case
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_uppercase().as_str() {
            "BUYER" => Ok(UserType::Buyer),
            "REALTOR" => Ok(UserType::Realtor),
            "ADMIN" => Ok(UserType::Admin),
            _ => Err(format!("Invalid user type: {}", s)),
        }
    }

    /// Whether signing up with this type requires a product key
    pub fn is_privileged(&self) -> bool {
        !matches!(self, UserType::Buyer)
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User database model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: UserType,
}

/// The authenticated caller, as carried inside a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "Jane Realtor")]
    pub name: String,
}

/// Signup request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(email(message = "email must be a valid address"))]
    #[schema(example = "jane@realty.com")]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    #[schema(example = "Jane Realtor")]
    pub name: String,
    #[validate(regex(path = "PHONE_REGEX", message = "phone must look like 555-555-5555"))]
    #[schema(example = "555-555-5555")]
    pub phone: String,
    /// Required when signing up as anything other than a buyer
    pub product_key: Option<String>,
}

/// Signin request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SigninRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// Product key request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductKeyRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(deserialize_with = "deserialize_user_type")]
    pub user_type: UserType,
}

/// Accepts the same spellings as the signup path segment
fn deserialize_user_type<'de, D>(deserializer: D) -> Result<UserType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    UserType::from_str(&raw).map_err(serde::de::Error::custom)
}

/// Signed token returned by signup and signin
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductKeyResponse {
    pub product_key: String,
}
