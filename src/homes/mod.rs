// Listings module
// Home listings with images, public reads and owner-only mutations

pub mod handlers;
pub mod models;
pub mod query;
pub mod repository;
pub mod service;

pub use handlers::{create_home, delete_home, get_home, list_homes, update_home};
pub use models::{HomeResponse, PropertyType};
pub use repository::{HomeRepository, PgHomeRepository};
pub use service::HomeService;
