use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::{validate_positive_number, validate_positive_price};

/// Kind of property a listing describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PropertyType {
    Residential,
    Condo,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Residential => "RESIDENTIAL",
            PropertyType::Condo => "CONDO",
        }
    }

    /// Parse a property type, ignoring case
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_uppercase().as_str() {
            "RESIDENTIAL" => Ok(PropertyType::Residential),
            "CONDO" => Ok(PropertyType::Condo),
            _ => Err(format!(
                "Invalid property type '{}'. Must be 'RESIDENTIAL' or 'CONDO'",
                s
            )),
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Home listing database model
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Home {
    pub id: i32,
    pub address: String,
    pub number_of_bedrooms: i32,
    pub number_of_bathrooms: f32,
    pub city: String,
    pub listed_date: DateTime<Utc>,
    pub price: Decimal,
    pub land_size: f64,
    pub property_type: PropertyType,
    pub realtor_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Image database model
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Image {
    pub id: i32,
    pub url: String,
    pub home_id: i32,
    pub created_at: DateTime<Utc>,
}

/// A listing row together with the url of its first image
#[derive(Debug, Clone, FromRow)]
pub struct HomeListing {
    #[sqlx(flatten)]
    pub home: Home,
    pub cover_image: Option<String>,
}

/// Public contact details of the realtor who owns a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RealtorContact {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Fields needed to insert a listing
#[derive(Debug, Clone)]
pub struct NewHome {
    pub address: String,
    pub number_of_bedrooms: i32,
    pub number_of_bathrooms: f32,
    pub city: String,
    pub price: Decimal,
    pub land_size: f64,
    pub property_type: PropertyType,
    pub realtor_id: i32,
}

/// Partial update; None keeps the stored value. The owner is never part of a patch.
#[derive(Debug, Clone, Default)]
pub struct HomePatch {
    pub address: Option<String>,
    pub number_of_bedrooms: Option<i32>,
    pub number_of_bathrooms: Option<f32>,
    pub city: Option<String>,
    pub price: Option<Decimal>,
    pub land_size: Option<f64>,
    pub property_type: Option<PropertyType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ImageRequest {
    #[validate(length(min = 1, message = "url must not be empty"))]
    #[schema(example = "https://images.example.com/house-1.jpg")]
    pub url: String,
}

/// Payload for POST /home
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHomeRequest {
    #[validate(length(min = 1, message = "address must not be empty"))]
    #[schema(example = "123 Maple Street")]
    pub address: String,
    #[serde(alias = "bedrooms")]
    #[validate(range(min = 1, message = "numberOfBedrooms must be positive"))]
    #[schema(example = 3)]
    pub number_of_bedrooms: i32,
    #[serde(alias = "bathrooms")]
    #[validate(custom = "validate_positive_bathrooms")]
    #[schema(example = 2.5)]
    pub number_of_bathrooms: f32,
    #[validate(length(min = 1, message = "city must not be empty"))]
    #[schema(example = "Toronto")]
    pub city: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_positive_price")]
    #[schema(value_type = f64, example = 750000.0)]
    pub price: Decimal,
    #[validate(custom = "validate_positive_number")]
    #[schema(example = 4500.0)]
    pub land_size: f64,
    pub property_type: PropertyType,
    #[serde(default)]
    #[validate]
    pub images: Vec<ImageRequest>,
}

impl CreateHomeRequest {
    /// Split the payload into the listing row and its image urls
    pub fn into_parts(self, realtor_id: i32) -> (NewHome, Vec<String>) {
        let home = NewHome {
            address: self.address,
            number_of_bedrooms: self.number_of_bedrooms,
            number_of_bathrooms: self.number_of_bathrooms,
            city: self.city,
            price: self.price,
            land_size: self.land_size,
            property_type: self.property_type,
            realtor_id,
        };
        let urls = self.images.into_iter().map(|image| image.url).collect();
        (home, urls)
    }
}

/// Payload for PUT /home/:id; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHomeRequest {
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: Option<String>,
    #[serde(alias = "bedrooms")]
    #[validate(range(min = 1, message = "numberOfBedrooms must be positive"))]
    pub number_of_bedrooms: Option<i32>,
    #[serde(alias = "bathrooms")]
    #[validate(custom = "validate_positive_bathrooms")]
    pub number_of_bathrooms: Option<f32>,
    #[validate(length(min = 1, message = "city must not be empty"))]
    pub city: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom = "validate_positive_price")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    #[validate(custom = "validate_positive_number")]
    pub land_size: Option<f64>,
    pub property_type: Option<PropertyType>,
}

impl From<UpdateHomeRequest> for HomePatch {
    fn from(request: UpdateHomeRequest) -> Self {
        HomePatch {
            address: request.address,
            number_of_bedrooms: request.number_of_bedrooms,
            number_of_bathrooms: request.number_of_bathrooms,
            city: request.city,
            price: request.price,
            land_size: request.land_size,
            property_type: request.property_type,
        }
    }
}

fn validate_positive_bathrooms(bathrooms: f32) -> Result<(), validator::ValidationError> {
    validate_positive_number(f64::from(bathrooms))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImageResponse {
    pub id: i32,
    pub url: String,
}

impl From<Image> for ImageResponse {
    fn from(image: Image) -> Self {
        Self {
            id: image.id,
            url: image.url,
        }
    }
}

/// Listing as returned to clients
///
/// `image` is the first image's url. `images` is only present on single-listing
/// responses. The owning realtor id is not exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HomeResponse {
    pub id: i32,
    pub address: String,
    pub number_of_bedrooms: i32,
    pub number_of_bathrooms: f32,
    pub city: String,
    pub listed_date: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub land_size: f64,
    pub property_type: PropertyType,
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageResponse>>,
}

impl HomeResponse {
    fn base(home: Home, image: Option<String>, images: Option<Vec<ImageResponse>>) -> Self {
        Self {
            id: home.id,
            address: home.address,
            number_of_bedrooms: home.number_of_bedrooms,
            number_of_bathrooms: home.number_of_bathrooms,
            city: home.city,
            listed_date: home.listed_date,
            price: home.price,
            land_size: home.land_size,
            property_type: home.property_type,
            image,
            images,
        }
    }

    /// Collection item: cover image only
    pub fn summary(listing: HomeListing) -> Self {
        Self::base(listing.home, listing.cover_image, None)
    }

    /// Single listing with every image
    pub fn detail(home: Home, images: Vec<Image>) -> Self {
        let cover = images.first().map(|image| image.url.clone());
        let images = images.into_iter().map(ImageResponse::from).collect();
        Self::base(home, cover, Some(images))
    }
}
