pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod homes;
pub mod validation;

#[cfg(test)]
mod testing;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    attach_identity, enforce_policy, product_key::ProductKeyService, AuthService, Operation,
    PgUserRepository, PolicyGate, TokenService, UserRepository,
};
use config::AppConfig;
use db::DbPool;
use homes::{HomeService, PgHomeRepository};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        homes::handlers::list_homes,
        homes::handlers::get_home,
        homes::handlers::create_home,
        homes::handlers::update_home,
        homes::handlers::delete_home,
        auth::handlers::signup_handler,
        auth::handlers::signin_handler,
        auth::handlers::product_key_handler,
        auth::handlers::me_handler,
    ),
    components(
        schemas(
            homes::models::HomeResponse,
            homes::models::ImageResponse,
            homes::models::ImageRequest,
            homes::models::CreateHomeRequest,
            homes::models::UpdateHomeRequest,
            homes::models::PropertyType,
            auth::models::UserType,
            auth::models::Identity,
            auth::models::SignupRequest,
            auth::models::SigninRequest,
            auth::models::ProductKeyRequest,
            auth::models::ProductKeyResponse,
            auth::models::TokenResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "homes", description = "Home listing endpoints"),
        (name = "auth", description = "Signup, signin and product keys")
    ),
    info(
        title = "Realtor API",
        version = "0.1.0",
        description = "Home listings with realtor-owned mutations and token-based authentication"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub home_service: Arc<HomeService>,
    pub token_service: Arc<TokenService>,
    pub user_repo: Arc<dyn UserRepository>,
}

impl AppState {
    /// Wire the Postgres-backed services
    pub fn from_pool(config: &AppConfig, pool: DbPool) -> Self {
        let user_repo: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
        let token_service = Arc::new(TokenService::new(&config.jwt));

        Self {
            auth_service: Arc::new(AuthService::new(
                user_repo.clone(),
                token_service.clone(),
                ProductKeyService::new(config.product_key_secret.clone()),
            )),
            home_service: Arc::new(HomeService::new(Arc::new(PgHomeRepository::new(pool)))),
            token_service,
            user_repo,
        }
    }
}

/// Attach the operation's access policy to a method router
fn guarded(
    route: MethodRouter<AppState>,
    operation: Operation,
    users: &Arc<dyn UserRepository>,
) -> MethodRouter<AppState> {
    route.route_layer(from_fn_with_state(
        PolicyGate::new(operation, users.clone()),
        enforce_policy,
    ))
}

/// Creates and configures the application router
///
/// Every route carries its policy; identity is resolved once per request
/// before any policy runs.
pub fn create_router(state: AppState) -> Router {
    let users = state.user_repo.clone();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route(
            "/home",
            guarded(get(homes::list_homes), Operation::ListHomes, &users)
                .merge(guarded(post(homes::create_home), Operation::CreateHome, &users)),
        )
        .route(
            "/home/:id",
            guarded(get(homes::get_home), Operation::GetHome, &users)
                .merge(guarded(put(homes::update_home), Operation::UpdateHome, &users))
                .merge(guarded(delete(homes::delete_home), Operation::DeleteHome, &users)),
        )
        .route(
            "/auth/signup/:userType",
            guarded(post(auth::signup_handler), Operation::Signup, &users),
        )
        .route(
            "/auth/signin",
            guarded(post(auth::signin_handler), Operation::Signin, &users),
        )
        .route(
            "/auth/key",
            guarded(post(auth::product_key_handler), Operation::GenerateProductKey, &users),
        )
        .route(
            "/auth/me",
            guarded(get(auth::me_handler), Operation::CurrentUser, &users),
        )
        .layer(from_fn_with_state(state.token_service.clone(), attach_identity))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
