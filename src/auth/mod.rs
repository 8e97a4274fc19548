// Authentication module
// Token-based identity, role policies and product-key gated signup

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod policy;
pub mod product_key;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{me_handler, product_key_handler, signin_handler, signup_handler};
pub use middleware::{attach_identity, AuthenticatedUser};
pub use models::{Identity, User, UserType};
pub use policy::{authorize, enforce_policy, Operation, Policy, PolicyGate};
pub use repository::{PgUserRepository, UserRepository};
pub use service::AuthService;
pub use token::TokenService;
