use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use utoipa::IntoParams;

use crate::homes::models::PropertyType;

/// Query parameters for GET /home
/// All fields are optional; present ones combine with AND
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct HomeQueryParams {
    /// Exact city match
    pub city: Option<String>,
    /// Minimum price (inclusive)
    pub min_price: Option<String>,
    /// Maximum price (inclusive)
    pub max_price: Option<String>,
    /// RESIDENTIAL or CONDO
    pub property_type: Option<String>,
}

/// Validated listing filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeFilter {
    pub city: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub property_type: Option<PropertyType>,
}

/// Validation error type
#[derive(Debug)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Query parameter validator
pub struct QueryValidator;

impl QueryValidator {
    /// Validates and normalizes query parameters into a filter
    pub fn validate(params: HomeQueryParams) -> Result<HomeFilter, ValidationError> {
        let city = Self::normalize_string(params.city);

        let min_price = Self::normalize_string(params.min_price)
            .map(|raw| Self::parse_price(&raw, "minPrice"))
            .transpose()?;
        let max_price = Self::normalize_string(params.max_price)
            .map(|raw| Self::parse_price(&raw, "maxPrice"))
            .transpose()?;

        if let (Some(min), Some(max)) = (min_price, max_price) {
            if min > max {
                return Err(ValidationError {
                    message: "minPrice cannot be greater than maxPrice".to_string(),
                });
            }
        }

        let property_type = Self::normalize_string(params.property_type)
            .map(|raw| PropertyType::from_str(&raw).map_err(|message| ValidationError { message }))
            .transpose()?;

        Ok(HomeFilter {
            city,
            min_price,
            max_price,
            property_type,
        })
    }

    /// Trims whitespace; empty or whitespace-only becomes None
    fn normalize_string(s: Option<String>) -> Option<String> {
        s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
    }

    /// Parses a price bound, which must be a positive number
    fn parse_price(raw: &str, param_name: &str) -> Result<Decimal, ValidationError> {
        let price = Decimal::from_str(raw).map_err(|_| ValidationError {
            message: format!("{} must be a valid number", param_name),
        })?;
        if price.is_sign_negative() || price.is_zero() {
            return Err(ValidationError {
                message: format!("{} must be a positive number", param_name),
            });
        }
        Ok(price)
    }
}

/// A typed bind parameter for the listing query
#[derive(Debug, Clone, PartialEq)]
pub enum FilterParam {
    Text(String),
    Price(Decimal),
}

/// SQL query builder for the listing collection
/// Each listing row carries the url of its first image as `cover_image`
pub struct HomeQueryBuilder {
    base_query: String,
    where_clauses: Vec<String>,
    params: Vec<FilterParam>,
}

impl HomeQueryBuilder {
    pub fn new() -> Self {
        Self {
            base_query: "SELECT h.id, h.address, h.number_of_bedrooms, h.number_of_bathrooms, h.city, \
                 h.listed_date, h.price, h.land_size, h.property_type, h.realtor_id, \
                 h.created_at, h.updated_at, \
                 (SELECT i.url FROM images i WHERE i.home_id = h.id ORDER BY i.id LIMIT 1) AS cover_image \
                 FROM homes h"
                .to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Builder seeded with every condition of the filter
    pub fn from_filter(filter: &HomeFilter) -> Self {
        let mut builder = Self::new();
        if let Some(city) = &filter.city {
            builder.add_city_filter(city);
        }
        builder.add_price_range(filter.min_price, filter.max_price);
        if let Some(property_type) = filter.property_type {
            builder.add_property_type_filter(property_type);
        }
        builder
    }

    fn next_placeholder(&self) -> usize {
        self.params.len() + 1
    }

    pub fn add_city_filter(&mut self, city: &str) {
        let index = self.next_placeholder();
        self.where_clauses.push(format!("h.city = ${}", index));
        self.params.push(FilterParam::Text(city.to_string()));
    }

    /// Adds price range filters (min and/or max), both bounds inclusive
    pub fn add_price_range(&mut self, min: Option<Decimal>, max: Option<Decimal>) {
        if let Some(min_price) = min {
            let index = self.next_placeholder();
            self.where_clauses.push(format!("h.price >= ${}", index));
            self.params.push(FilterParam::Price(min_price));
        }

        if let Some(max_price) = max {
            let index = self.next_placeholder();
            self.where_clauses.push(format!("h.price <= ${}", index));
            self.params.push(FilterParam::Price(max_price));
        }
    }

    pub fn add_property_type_filter(&mut self, property_type: PropertyType) {
        let index = self.next_placeholder();
        self.where_clauses.push(format!("h.property_type = ${}", index));
        self.params.push(FilterParam::Text(property_type.as_str().to_string()));
    }

    /// Builds the final SQL query string with its parameters
    pub fn build(&self) -> (String, Vec<FilterParam>) {
        let mut query = self.base_query.clone();

        if !self.where_clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.where_clauses.join(" AND "));
        }
        query.push_str(" ORDER BY h.id");

        (query, self.params.clone())
    }
}

impl Default for HomeQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
