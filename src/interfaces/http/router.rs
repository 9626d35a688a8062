//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AnalyticsService, FoodService, MealService, RateLimiter, UserService};
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::rate_limit::{rate_limit_middleware, RateLimitState};

use super::modules::{analytics, auth, foods, health, meals, metrics, request_id, users};

/// Everything the HTTP layer needs from the running service.
#[derive(Clone)]
pub struct ApiContext {
    pub user_service: Arc<UserService>,
    pub food_service: Arc<FoodService>,
    pub meal_service: Arc<MealService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub auth: AuthState,
    /// `None` disables rate limiting
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
    pub db: DatabaseConnection,
    pub prometheus: PrometheusHandle,
    pub started_at: Arc<Instant>,
}

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
                        .description(Some("Access token from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::refresh,
        // Users
        users::get_profile,
        users::update_profile,
        users::list_users,
        users::change_role,
        // Foods
        foods::list_foods,
        foods::get_food,
        foods::create_food,
        foods::update_food,
        foods::delete_food,
        // Meals
        meals::log_meal,
        meals::list_meals,
        meals::get_meal,
        meals::update_meal,
        meals::delete_meal,
        // Analytics
        analytics::daily_analytics,
        analytics::weekly_analytics,
        analytics::recommendations,
        analytics::window_totals,
    ),
    components(
        schemas(
            ApiResponse<String>,
            PaginatedResponse<users::UserDto>,
            PaginatedResponse<foods::FoodDto>,
            PaginatedResponse<meals::MealDto>,
            health::HealthResponse,
            health::ComponentHealth,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::RefreshRequest,
            auth::TokenResponse,
            users::UserDto,
            users::ProfileRequest,
            users::UpdateProfileRequest,
            users::ChangeRoleRequest,
            foods::FoodDto,
            foods::CreateFoodRequest,
            foods::UpdateFoodRequest,
            foods::DeletedFoodResponse,
            meals::MealDto,
            meals::LogMealRequest,
            meals::UpdateMealRequest,
            analytics::NutrientsDto,
            analytics::DailyAnalyticsDto,
            analytics::DayTotalsDto,
            analytics::WeeklyAnalyticsDto,
            analytics::SuggestionDto,
            analytics::SuggestedFoodDto,
            analytics::RecommendationDto,
            analytics::TotalsDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Registration, login and token refresh"),
        (name = "Users", description = "Own profile and user administration"),
        (name = "Foods", description = "Food catalog with per-serving nutrients"),
        (name = "Meals", description = "Per-user meal log"),
        (name = "Analytics", description = "Cached nutrition totals and recommendations"),
    ),
    info(
        title = "Wellora API",
        version = "1.0.0",
        description = "Meal logging and nutrition analytics",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Apply the write rate limit for `action` to every route already on `router`.
fn limit_writes<S>(
    router: Router<S>,
    limiter: &Option<Arc<dyn RateLimiter>>,
    action: &'static str,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    match limiter {
        Some(limiter) => router.route_layer(middleware::from_fn_with_state(
            RateLimitState::new(Arc::clone(limiter), action),
            rate_limit_middleware,
        )),
        None => router,
    }
}

/// Require a valid access token on every route already on `router`.
///
/// Added after [`limit_writes`] so that authentication runs first and the
/// limiter can key on the user.
fn require_auth<S>(router: Router<S>, auth: &AuthState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(
        auth.clone(),
        auth_middleware,
    ))
}

pub fn create_api_router(ctx: ApiContext) -> Router {
    let limiter = &ctx.rate_limiter;

    // Auth routes (public, limited per client address)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh));
    let auth_routes = limit_writes(auth_routes, limiter, "auth").with_state(
        auth::AuthHandlerState {
            user_service: Arc::clone(&ctx.user_service),
        },
    );

    // User routes
    let user_routes = Router::new()
        .route(
            "/profile",
            get(users::get_profile).patch(users::update_profile),
        )
        .route("/", get(users::list_users))
        .route("/{id}/role", patch(users::change_role));
    let user_routes = require_auth(limit_writes(user_routes, limiter, "users"), &ctx.auth)
        .with_state(users::UserHandlerState {
            user_service: Arc::clone(&ctx.user_service),
        });

    // Food routes (reads for users, writes for admins)
    let food_routes = Router::new()
        .route("/", get(foods::list_foods).post(foods::create_food))
        .route(
            "/{id}",
            get(foods::get_food)
                .patch(foods::update_food)
                .delete(foods::delete_food),
        );
    let food_routes = require_auth(limit_writes(food_routes, limiter, "foods"), &ctx.auth)
        .with_state(foods::FoodHandlerState {
            food_service: Arc::clone(&ctx.food_service),
        });

    // Meal routes (owner only)
    let meal_routes = Router::new()
        .route("/", get(meals::list_meals).post(meals::log_meal))
        .route(
            "/{id}",
            get(meals::get_meal)
                .patch(meals::update_meal)
                .delete(meals::delete_meal),
        );
    let meal_routes = require_auth(limit_writes(meal_routes, limiter, "meals"), &ctx.auth)
        .with_state(meals::MealHandlerState {
            meal_service: Arc::clone(&ctx.meal_service),
        });

    // Analytics routes (read only, cached)
    let analytics_routes = Router::new()
        .route("/daily", get(analytics::daily_analytics))
        .route("/weekly", get(analytics::weekly_analytics))
        .route("/reco", get(analytics::recommendations))
        .route("/totals", get(analytics::window_totals));
    let analytics_routes =
        require_auth(analytics_routes, &ctx.auth).with_state(analytics::AnalyticsHandlerState {
            analytics_service: Arc::clone(&ctx.analytics_service),
        });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db: ctx.db.clone(),
            started_at: Arc::clone(&ctx.started_at),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: ctx.prometheus.clone(),
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/foods", food_routes)
        .nest("/api/v1/meals", meal_routes)
        .nest("/api/v1/analytics", analytics_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
