// In-memory repositories and router helpers for tests

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::auth::{
    error::AuthError,
    models::{NewUser, User, UserType},
    password::PasswordService,
    product_key::ProductKeyService,
    repository::UserRepository,
    AuthService, Identity, TokenService,
};
use crate::config::JwtConfig;
use crate::error::ApiError;
use crate::homes::{
    models::{Home, HomeListing, HomePatch, Image, NewHome, RealtorContact},
    query::HomeFilter,
    repository::HomeRepository,
    HomeService,
};
use crate::AppState;

pub const TEST_JWT_SECRET: &str = "test_secret";
pub const TEST_PRODUCT_SECRET: &str = "product-secret";

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<i32, User>>,
    next_id: Mutex<i32>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a user directly, bypassing signup; returns its identity
    pub fn seed(&self, name: &str, email: &str, user_type: UserType) -> Identity {
        let password = PasswordService::hash_password("correct-horse").unwrap();
        let user = self
            .insert(NewUser {
                name: name.to_string(),
                phone: "555-555-5555".to_string(),
                email: email.to_string(),
                password_hash: password,
                user_type,
            })
            .unwrap();
        Identity {
            id: user.id,
            name: user.name,
        }
    }

    pub fn contact(&self, id: i32) -> Option<RealtorContact> {
        self.users.lock().unwrap().get(&id).map(|user| RealtorContact {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        })
    }

    fn insert(&self, user: NewUser) -> Result<User, AuthError> {
        let mut users = self.users.lock().unwrap();
        if users
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AuthError::EmailAlreadyExists);
        }

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let now = Utc::now();
        let created = User {
            id: *next_id,
            name: user.name,
            phone: user.phone,
            email: user.email,
            password: user.password_hash,
            user_type: user.user_type,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, AuthError> {
        self.insert(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AuthError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}

/// Whether a listing satisfies every present filter condition, as the SQL query does
pub fn filter_matches(filter: &HomeFilter, home: &Home) -> bool {
    filter.city.as_ref().map_or(true, |city| &home.city == city)
        && filter.min_price.map_or(true, |min| home.price >= min)
        && filter.max_price.map_or(true, |max| home.price <= max)
        && filter.property_type.map_or(true, |kind| home.property_type == kind)
}

/// Apply a patch the way the COALESCE update does; the owner is never touched
pub fn apply_patch(patch: HomePatch, home: &mut Home) {
    if let Some(address) = patch.address {
        home.address = address;
    }
    if let Some(bedrooms) = patch.number_of_bedrooms {
        home.number_of_bedrooms = bedrooms;
    }
    if let Some(bathrooms) = patch.number_of_bathrooms {
        home.number_of_bathrooms = bathrooms;
    }
    if let Some(city) = patch.city {
        home.city = city;
    }
    if let Some(price) = patch.price {
        home.price = price;
    }
    if let Some(land_size) = patch.land_size {
        home.land_size = land_size;
    }
    if let Some(property_type) = patch.property_type {
        home.property_type = property_type;
    }
}

#[derive(Default)]
struct HomeStore {
    homes: HashMap<i32, Home>,
    images: Vec<Image>,
    next_home_id: i32,
    next_image_id: i32,
}

/// Listing store; realtor contacts come from `add_realtor` or a linked user repository
#[derive(Default)]
pub struct InMemoryHomeRepository {
    store: Mutex<HomeStore>,
    realtors: Mutex<HashMap<i32, RealtorContact>>,
    users: Option<Arc<InMemoryUserRepository>>,
}

impl InMemoryHomeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            users: Some(users),
            ..Self::default()
        }
    }

    pub fn add_realtor(&self, realtor: RealtorContact) {
        self.realtors.lock().unwrap().insert(realtor.id, realtor);
    }

    pub fn home_count(&self) -> usize {
        self.store.lock().unwrap().homes.len()
    }

    pub fn image_count(&self, home_id: i32) -> usize {
        self.store
            .lock()
            .unwrap()
            .images
            .iter()
            .filter(|image| image.home_id == home_id)
            .count()
    }

    fn contact(&self, id: i32) -> Option<RealtorContact> {
        self.realtors
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .or_else(|| self.users.as_ref().and_then(|users| users.contact(id)))
    }
}

#[async_trait]
impl HomeRepository for InMemoryHomeRepository {
    async fn list(&self, filter: &HomeFilter) -> Result<Vec<HomeListing>, ApiError> {
        let store = self.store.lock().unwrap();
        let mut homes: Vec<&Home> = store.homes.values().filter(|home| filter_matches(filter, home)).collect();
        homes.sort_by_key(|home| home.id);

        Ok(homes
            .into_iter()
            .map(|home| HomeListing {
                home: home.clone(),
                cover_image: store
                    .images
                    .iter()
                    .find(|image| image.home_id == home.id)
                    .map(|image| image.url.clone()),
            })
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Home>, ApiError> {
        Ok(self.store.lock().unwrap().homes.get(&id).cloned())
    }

    async fn images_for(&self, home_id: i32) -> Result<Vec<Image>, ApiError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .images
            .iter()
            .filter(|image| image.home_id == home_id)
            .cloned()
            .collect())
    }

    async fn realtor_of(&self, home_id: i32) -> Result<Option<RealtorContact>, ApiError> {
        let realtor_id = match self.store.lock().unwrap().homes.get(&home_id) {
            Some(home) => home.realtor_id,
            None => return Ok(None),
        };
        Ok(self.contact(realtor_id))
    }

    async fn create(&self, home: NewHome, image_urls: Vec<String>) -> Result<(Home, Vec<Image>), ApiError> {
        let mut store = self.store.lock().unwrap();
        store.next_home_id += 1;
        let now = Utc::now();
        let created = Home {
            id: store.next_home_id,
            address: home.address,
            number_of_bedrooms: home.number_of_bedrooms,
            number_of_bathrooms: home.number_of_bathrooms,
            city: home.city,
            listed_date: now,
            price: home.price,
            land_size: home.land_size,
            property_type: home.property_type,
            realtor_id: home.realtor_id,
            created_at: now,
            updated_at: now,
        };

        let mut images = Vec::with_capacity(image_urls.len());
        for url in image_urls {
            store.next_image_id += 1;
            images.push(Image {
                id: store.next_image_id,
                url,
                home_id: created.id,
                created_at: now,
            });
        }

        store.homes.insert(created.id, created.clone());
        store.images.extend(images.iter().cloned());
        Ok((created, images))
    }

    async fn update(&self, id: i32, patch: HomePatch) -> Result<Option<Home>, ApiError> {
        let mut store = self.store.lock().unwrap();
        Ok(store.homes.get_mut(&id).map(|home| {
            apply_patch(patch, home);
            home.updated_at = Utc::now();
            home.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut store = self.store.lock().unwrap();
        store.images.retain(|image| image.home_id != id);
        Ok(store.homes.remove(&id).is_some())
    }
}

pub fn test_token_service() -> Arc<TokenService> {
    Arc::new(TokenService::new(&JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        ttl_seconds: 3600,
    }))
}

/// Application state wired to in-memory repositories that share one user table
pub fn test_state() -> (AppState, Arc<InMemoryUserRepository>, Arc<InMemoryHomeRepository>) {
    let users = Arc::new(InMemoryUserRepository::new());
    let homes = Arc::new(InMemoryHomeRepository::with_users(users.clone()));
    let tokens = test_token_service();

    let state = AppState {
        auth_service: Arc::new(AuthService::new(
            users.clone(),
            tokens.clone(),
            ProductKeyService::new(TEST_PRODUCT_SECRET),
        )),
        home_service: Arc::new(HomeService::new(homes.clone())),
        token_service: tokens,
        user_repo: users.clone(),
    };
    (state, users, homes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::homes::models::PropertyType;
    use rust_decimal_macros::dec;

    fn home() -> Home {
        let now = Utc::now();
        Home {
            id: 1,
            address: "123 Maple Street".to_string(),
            number_of_bedrooms: 3,
            number_of_bathrooms: 2.5,
            city: "Toronto".to_string(),
            listed_date: now,
            price: dec!(750000),
            land_size: 4500.0,
            property_type: PropertyType::Residential,
            realtor_id: 7,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_apply_patch_keeps_unset_fields_and_owner() {
        let mut home = home();
        apply_patch(
            HomePatch {
                price: Some(dec!(800000)),
                ..Default::default()
            },
            &mut home,
        );

        assert_eq!(home.price, dec!(800000));
        assert_eq!(home.address, "123 Maple Street");
        assert_eq!(home.realtor_id, 7);
    }

    #[test]
    fn test_filter_matches_inclusive_bounds() {
        let filter = HomeFilter {
            city: Some("Toronto".to_string()),
            min_price: Some(dec!(750000)),
            max_price: Some(dec!(750000)),
            property_type: Some(PropertyType::Residential),
        };
        assert!(filter_matches(&filter, &home()));

        let other_city = HomeFilter {
            city: Some("toronto".to_string()),
            ..Default::default()
        };
        assert!(!filter_matches(&other_city, &home()));
    }
}
