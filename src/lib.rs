use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod access;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pipeline;
pub mod query;
pub mod services;

use config::AppConfig;
use services::{geocoder::Geocoder, mailer::Mailer, photos::PhotoStore};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub geocoder: Arc<Geocoder>,
    pub mailer: Arc<Mailer>,
    pub photos: Arc<PhotoStore>,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        Self {
            pool,
            geocoder: Arc::new(Geocoder::new(&config.geocoder)),
            mailer: Arc::new(Mailer::new(&config.mailer)),
            photos: Arc::new(PhotoStore::new(&config.uploads)),
            config: Arc::new(config),
        }
    }
}

/// Full application router, versioned under /api/v1.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::index))
        .route("/health", get(handlers::health::health))
        .nest("/api/v1/bootcamps", bootcamp_routes(state.clone()))
        .nest("/api/v1/courses", course_routes(state.clone()))
        .nest("/api/v1/reviews", review_routes(state.clone()))
        .nest("/api/v1/auth", auth_routes(state.clone()))
        .nest("/api/v1/users", user_routes(state.clone()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn bootcamp_routes(state: AppState) -> Router<AppState> {
    use handlers::{bootcamps, courses, reviews};

    let public = Router::new()
        .route("/", get(bootcamps::list))
        .route("/:id", get(bootcamps::show))
        .route("/radius/:zipcode/:distance", get(bootcamps::within_radius))
        .route("/:bootcamp_id/courses", get(courses::list_for_bootcamp))
        .route("/:bootcamp_id/reviews", get(reviews::list_for_bootcamp));

    let protected = Router::new()
        .route("/", post(bootcamps::create))
        .route("/:id", put(bootcamps::update).delete(bootcamps::destroy))
        .route("/:id/photo", put(bootcamps::upload_photo))
        .route("/:bootcamp_id/courses", post(courses::create))
        .route("/:bootcamp_id/reviews", post(reviews::create))
        .layer(from_fn_with_state(state, middleware::jwt_auth_middleware));

    public.merge(protected)
}

fn course_routes(state: AppState) -> Router<AppState> {
    use handlers::courses;

    let public = Router::new()
        .route("/", get(courses::list))
        .route("/:id", get(courses::show));

    let protected = Router::new()
        .route("/:id", put(courses::update).delete(courses::destroy))
        .layer(from_fn_with_state(state, middleware::jwt_auth_middleware));

    public.merge(protected)
}

fn review_routes(state: AppState) -> Router<AppState> {
    use handlers::reviews;

    let public = Router::new()
        .route("/", get(reviews::list))
        .route("/:id", get(reviews::show));

    let protected = Router::new()
        .route("/:id", put(reviews::update).delete(reviews::destroy))
        .layer(from_fn_with_state(state, middleware::jwt_auth_middleware));

    public.merge(protected)
}

fn auth_routes(state: AppState) -> Router<AppState> {
    use handlers::auth;

    let public = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/forgotpassword", post(auth::forgot_password))
        .route("/resetpassword/:resettoken", put(auth::reset_password));

    let protected = Router::new()
        .route("/me", get(auth::me))
        .route("/updatedetails", put(auth::update_details))
        .route("/updatepassword", put(auth::update_password))
        .layer(from_fn_with_state(state, middleware::jwt_auth_middleware));

    public.merge(protected)
}

fn user_routes(state: AppState) -> Router<AppState> {
    use handlers::users;

    Router::new()
        .route("/", get(users::list).post(users::create))
        .route(
            "/:id",
            get(users::show).put(users::update).delete(users::destroy),
        )
        .layer(from_fn(middleware::require_admin_middleware))
        .layer(from_fn_with_state(state, middleware::jwt_auth_middleware))
}
