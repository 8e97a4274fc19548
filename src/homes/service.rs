// Listing service - business logic layer

use std::sync::Arc;
use validator::Validate;

use crate::auth::Identity;
use crate::error::ApiError;
use crate::homes::{
    models::{CreateHomeRequest, HomeResponse, RealtorContact, UpdateHomeRequest},
    query::{HomeQueryParams, QueryValidator},
    repository::HomeRepository,
};

/// Coordinates listing reads and owner-gated mutations
pub struct HomeService {
    repo: Arc<dyn HomeRepository>,
}

impl HomeService {
    pub fn new(repo: Arc<dyn HomeRepository>) -> Self {
        Self { repo }
    }

    /// Filtered listing collection; a filter that matches nothing is NotFound
    pub async fn list_homes(&self, params: HomeQueryParams) -> Result<Vec<HomeResponse>, ApiError> {
        let filter = QueryValidator::validate(params).map_err(|e| ApiError::BadRequest(e.message))?;

        let listings = self.repo.list(&filter).await?;
        if listings.is_empty() {
            return Err(ApiError::NotFound("No homes found".to_string()));
        }

        Ok(listings.into_iter().map(HomeResponse::summary).collect())
    }

    pub async fn get_home(&self, id: i32) -> Result<HomeResponse, ApiError> {
        let home = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::home_not_found(id))?;
        let images = self.repo.images_for(id).await?;

        Ok(HomeResponse::detail(home, images))
    }

    /// Create a listing owned by `realtor_id`, with its images, in one step
    pub async fn create_home(
        &self,
        request: CreateHomeRequest,
        realtor_id: i32,
    ) -> Result<HomeResponse, ApiError> {
        request.validate()?;

        let (new_home, image_urls) = request.into_parts(realtor_id);
        let (home, images) = self.repo.create(new_home, image_urls).await?;

        tracing::info!("Realtor {} created home {}", realtor_id, home.id);
        Ok(HomeResponse::detail(home, images))
    }

    /// Owning realtor's contact details
    pub async fn realtor_of(&self, home_id: i32) -> Result<RealtorContact, ApiError> {
        self.repo
            .realtor_of(home_id)
            .await?
            .ok_or_else(|| ApiError::home_not_found(home_id))
    }

    /// Fails with NotFound for a missing listing, then Unauthorized for a non-owner
    pub async fn ensure_owner(&self, home_id: i32, caller: &Identity) -> Result<(), ApiError> {
        let realtor = self.realtor_of(home_id).await?;
        if realtor.id != caller.id {
            return Err(ApiError::Unauthorized(format!(
                "user {} does not own home {}",
                caller.id, home_id
            )));
        }
        Ok(())
    }

    pub async fn update_home(
        &self,
        id: i32,
        caller: &Identity,
        request: UpdateHomeRequest,
    ) -> Result<HomeResponse, ApiError> {
        self.ensure_owner(id, caller).await?;
        request.validate()?;

        let home = self
            .repo
            .update(id, request.into())
            .await?
            .ok_or_else(|| ApiError::home_not_found(id))?;
        let images = self.repo.images_for(id).await?;

        tracing::info!("Realtor {} updated home {}", caller.id, id);
        Ok(HomeResponse::detail(home, images))
    }

    /// Delete a listing together with all of its images
    pub async fn delete_home(&self, id: i32, caller: &Identity) -> Result<(), ApiError> {
        self.ensure_owner(id, caller).await?;

        if !self.repo.delete(id).await? {
            return Err(ApiError::home_not_found(id));
        }

        tracing::info!("Realtor {} deleted home {}", caller.id, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::homes::models::{ImageRequest, PropertyType};
    use crate::testing::InMemoryHomeRepository;
    use rust_decimal_macros::dec;

    const OWNER: i32 = 1;
    const OTHER: i32 = 2;

    fn identity(id: i32) -> Identity {
        Identity {
            id,
            name: format!("user-{}", id),
        }
    }

    fn create_request(city: &str, images: &[&str]) -> CreateHomeRequest {
        CreateHomeRequest {
            address: "123 Maple Street".to_string(),
            number_of_bedrooms: 3,
            number_of_bathrooms: 2.0,
            city: city.to_string(),
            price: dec!(500000),
            land_size: 4000.0,
            property_type: PropertyType::Residential,
            images: images
                .iter()
                .map(|url| ImageRequest { url: url.to_string() })
                .collect(),
        }
    }

    fn service() -> (HomeService, Arc<InMemoryHomeRepository>) {
        let repo = Arc::new(InMemoryHomeRepository::new());
        repo.add_realtor(RealtorContact {
            id: OWNER,
            name: "Owner".to_string(),
            email: "owner@realty.com".to_string(),
            phone: "555-555-0001".to_string(),
        });
        (HomeService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_create_then_get_returns_images() {
        let (service, _) = service();
        let created = service
            .create_home(create_request("Toronto", &["https://img/1.jpg", "https://img/2.jpg"]), OWNER)
            .await
            .unwrap();

        let fetched = service.get_home(created.id).await.unwrap();
        assert_eq!(fetched.image.as_deref(), Some("https://img/1.jpg"));
        assert_eq!(fetched.images.map(|images| images.len()), Some(2));
    }

    #[tokio::test]
    async fn test_get_missing_home_is_not_found() {
        let (service, _) = service();
        let err = service.get_home(42).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_without_matches_is_not_found() {
        let (service, _) = service();
        service
            .create_home(create_request("Toronto", &[]), OWNER)
            .await
            .unwrap();

        let params = HomeQueryParams {
            city: Some("Vancouver".to_string()),
            ..Default::default()
        };
        assert!(matches!(service.list_homes(params).await, Err(ApiError::NotFound(_))));

        let all = service.list_homes(HomeQueryParams::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].images.is_none());
    }

    #[tokio::test]
    async fn test_list_rejects_inverted_price_range() {
        let (service, _) = service();
        let params = HomeQueryParams {
            min_price: Some("900".to_string()),
            max_price: Some("100".to_string()),
            ..Default::default()
        };
        assert!(matches!(service.list_homes(params).await, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payload() {
        let (service, repo) = service();
        let mut request = create_request("Toronto", &[]);
        request.price = dec!(0);

        let err = service.create_home(request, OWNER).await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
        assert_eq!(repo.home_count(), 0);
    }

    #[tokio::test]
    async fn test_prices_outside_column_precision_are_validation_errors() {
        let (service, repo) = service();
        for price in [dec!(0.001), dec!(10000000000000)] {
            let mut request = create_request("Toronto", &[]);
            request.price = price;
            let err = service.create_home(request, OWNER).await.unwrap_err();
            assert!(matches!(err, ApiError::ValidationError(_)), "{}", price);
        }
        assert_eq!(repo.home_count(), 0);

        let created = service
            .create_home(create_request("Toronto", &[]), OWNER)
            .await
            .unwrap();
        let update = UpdateHomeRequest {
            price: Some(dec!(12.345)),
            ..Default::default()
        };
        let err = service
            .update_home(created.id, &identity(OWNER), update)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_non_owner_cannot_update_or_delete() {
        let (service, _) = service();
        let created = service
            .create_home(create_request("Toronto", &["https://img/1.jpg"]), OWNER)
            .await
            .unwrap();

        let update = UpdateHomeRequest {
            price: Some(dec!(1)),
            ..Default::default()
        };
        let err = service
            .update_home(created.id, &identity(OTHER), update)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err = service.delete_home(created.id, &identity(OTHER)).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let unchanged = service.get_home(created.id).await.unwrap();
        assert_eq!(unchanged.price, dec!(500000));
    }

    #[tokio::test]
    async fn test_missing_home_is_not_found_before_ownership() {
        let (service, _) = service();
        let err = service
            .update_home(99, &identity(OTHER), UpdateHomeRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = service.delete_home(99, &identity(OTHER)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_owner_update_keeps_owner() {
        let (service, repo) = service();
        let created = service
            .create_home(create_request("Toronto", &[]), OWNER)
            .await
            .unwrap();

        let update = UpdateHomeRequest {
            city: Some("Ottawa".to_string()),
            ..Default::default()
        };
        let updated = service
            .update_home(created.id, &identity(OWNER), update)
            .await
            .unwrap();

        assert_eq!(updated.city, "Ottawa");
        assert_eq!(updated.address, "123 Maple Street");
        assert_eq!(service.realtor_of(created.id).await.unwrap().id, OWNER);
        assert_eq!(repo.home_count(), 1);
    }

    #[tokio::test]
    async fn test_owner_delete_removes_images() {
        let (service, repo) = service();
        let created = service
            .create_home(create_request("Toronto", &["https://img/1.jpg", "https://img/2.jpg"]), OWNER)
            .await
            .unwrap();
        assert_eq!(repo.image_count(created.id), 2);

        service.delete_home(created.id, &identity(OWNER)).await.unwrap();

        assert_eq!(repo.home_count(), 0);
        assert_eq!(repo.image_count(created.id), 0);
        assert!(matches!(service.get_home(created.id).await, Err(ApiError::NotFound(_))));
    }
}
