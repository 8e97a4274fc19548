// HTTP handlers for listing endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::homes::{
    models::{CreateHomeRequest, HomeResponse, UpdateHomeRequest},
    query::HomeQueryParams,
};
use crate::AppState;

/// List homes, optionally filtered
/// GET /home
#[utoipa::path(
    get,
    path = "/home",
    params(HomeQueryParams),
    responses(
        (status = 200, description = "Matching homes", body = Vec<HomeResponse>),
        (status = 400, description = "Invalid query parameters"),
        (status = 404, description = "No home matches the filter")
    ),
    tag = "homes"
)]
pub async fn list_homes(
    State(state): State<AppState>,
    Query(params): Query<HomeQueryParams>,
) -> Result<Json<Vec<HomeResponse>>, ApiError> {
    let homes = state.home_service.list_homes(params).await?;
    Ok(Json(homes))
}

/// Get a single home with all of its images
/// GET /home/:id
#[utoipa::path(
    get,
    path = "/home/{id}",
    params(
        ("id" = i32, Path, description = "Home id")
    ),
    responses(
        (status = 200, description = "Home found", body = HomeResponse),
        (status = 404, description = "Home not found")
    ),
    tag = "homes"
)]
pub async fn get_home(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<HomeResponse>, ApiError> {
    let home = state.home_service.get_home(id).await?;
    Ok(Json(home))
}

/// Create a listing owned by the calling realtor
/// POST /home
#[utoipa::path(
    post,
    path = "/home",
    request_body = CreateHomeRequest,
    responses(
        (status = 201, description = "Home created", body = HomeResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Caller is not a realtor")
    ),
    security(("bearer_auth" = [])),
    tag = "homes"
)]
pub async fn create_home(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Json(request): Json<CreateHomeRequest>,
) -> Result<(StatusCode, Json<HomeResponse>), ApiError> {
    let home = state.home_service.create_home(request, identity.id).await?;
    Ok((StatusCode::CREATED, Json(home)))
}

/// Update a listing; only its owner may do this
/// PUT /home/:id
#[utoipa::path(
    put,
    path = "/home/{id}",
    params(
        ("id" = i32, Path, description = "Home id")
    ),
    request_body = UpdateHomeRequest,
    responses(
        (status = 200, description = "Home updated", body = HomeResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Caller does not own the home"),
        (status = 404, description = "Home not found")
    ),
    security(("bearer_auth" = [])),
    tag = "homes"
)]
pub async fn update_home(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateHomeRequest>,
) -> Result<Json<HomeResponse>, ApiError> {
    let home = state.home_service.update_home(id, &identity, request).await?;
    Ok(Json(home))
}

/// Delete a listing and its images; only its owner may do this
/// DELETE /home/:id
#[utoipa::path(
    delete,
    path = "/home/{id}",
    params(
        ("id" = i32, Path, description = "Home id")
    ),
    responses(
        (status = 204, description = "Home deleted"),
        (status = 401, description = "Caller does not own the home"),
        (status = 404, description = "Home not found")
    ),
    security(("bearer_auth" = [])),
    tag = "homes"
)]
pub async fn delete_home(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.home_service.delete_home(id, &identity).await?;
    Ok(StatusCode::NO_CONTENT)
}
