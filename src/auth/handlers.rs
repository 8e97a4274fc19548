// HTTP handlers for authentication endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{Identity, ProductKeyRequest, ProductKeyResponse, SigninRequest, SignupRequest, TokenResponse, UserType},
};
use crate::AppState;

/// Register a new user
/// POST /auth/signup/:userType
#[utoipa::path(
    post,
    path = "/auth/signup/{userType}",
    params(
        ("userType" = String, Path, description = "BUYER, REALTOR or ADMIN")
    ),
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered", body = TokenResponse),
        (status = 400, description = "Invalid payload or user type"),
        (status = 401, description = "Missing or invalid product key"),
        (status = 409, description = "Email is already taken")
    ),
    tag = "auth"
)]
pub async fn signup_handler(
    State(state): State<AppState>,
    Path(user_type): Path<String>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AuthError> {
    let user_type = UserType::from_str(&user_type).map_err(|_| AuthError::UnknownUserType(user_type))?;
    let token = state.auth_service.signup(request, user_type).await?;
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Sign in with email and password
/// POST /auth/signin
#[utoipa::path(
    post,
    path = "/auth/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn signin_handler(
    State(state): State<AppState>,
    Json(request): Json<SigninRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    request.validate()?;
    let token = state.auth_service.signin(&request.email, &request.password).await?;
    Ok(Json(TokenResponse { token }))
}

/// Generate a product key for privileged signup
/// POST /auth/key
#[utoipa::path(
    post,
    path = "/auth/key",
    request_body = ProductKeyRequest,
    responses(
        (status = 200, description = "Product key", body = ProductKeyResponse),
        (status = 400, description = "Invalid payload")
    ),
    tag = "auth"
)]
pub async fn product_key_handler(
    State(state): State<AppState>,
    Json(request): Json<ProductKeyRequest>,
) -> Result<Json<ProductKeyResponse>, AuthError> {
    request.validate()?;
    let product_key = state
        .auth_service
        .generate_product_key(&request.email, request.user_type)?;
    Ok(Json(ProductKeyResponse { product_key }))
}

/// Get the identity carried by the caller's token
/// GET /auth/me
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Decoded identity", body = Identity),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me_handler(AuthenticatedUser(identity): AuthenticatedUser) -> Json<Identity> {
    Json(identity)
}
