//! Application state and router builder
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use toolscout_api::{app::{build_router, AppState}, config::Config};
//! use toolscout_shared::{db::pool::create_pool, store::PgStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let pool = create_pool(&config.database).await?;
//! let state = AppState::new(Arc::new(PgStore::new(pool)), config);
//! let app = build_router(state);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post, put},
    Router,
};
use toolscout_shared::{
    auth::{
        authorization::require_admin,
        jwt::JwtSettings,
        middleware::{authenticate, AuthContext},
        password::{Argon2Scheme, CredentialScheme},
    },
    catalog::ToolService,
    reviews::ReviewService,
    store::CatalogStore,
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer, routes};

/// Shared application state
///
/// Cloned into every handler; all fields are reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Backing store for users, tools and reviews
    pub store: Arc<dyn CatalogStore>,

    pub reviews: ReviewService,
    pub tools: ToolService,

    /// Scheme used to hash and verify account passwords
    pub credentials: Arc<dyn CredentialScheme>,

    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the services over `store` with the default Argon2id scheme
    pub fn new(store: Arc<dyn CatalogStore>, config: Config) -> Self {
        let reviews = ReviewService::new(store.clone());
        let tools = ToolService::new(store.clone(), reviews.clone());

        Self {
            store,
            reviews,
            tools,
            credentials: Arc::new(Argon2Scheme::default()),
            config: Arc::new(config),
        }
    }

    /// Replaces the credential scheme
    pub fn with_credentials(mut self, scheme: impl CredentialScheme + 'static) -> Self {
        self.credentials = Arc::new(scheme);
        self
    }

    pub fn jwt(&self) -> &JwtSettings {
        &self.config.jwt
    }
}

/// Builds the complete router with all routes and middleware
///
/// ```text
/// /
/// ├── GET    /                        banner (public)
/// ├── GET    /health                  health check (public)
/// ├── /auth
/// │   ├── POST /signup
/// │   └── POST /login
/// ├── /tools
/// │   ├── GET  /:id
/// │   └── GET  /:id/reviews           approved reviews only
/// ├── /reviews                        bearer token
/// │   ├── POST /
/// │   └── GET  /me
/// └── /admin                          bearer token, admin role
///     ├── GET    /reviews             moderation queue
///     ├── PATCH  /reviews/:id         approve or reject
///     ├── POST   /tools
///     ├── PUT    /tools/:id
///     └── DELETE /tools/:id
/// ```
///
/// Authentication is applied with `route_layer`, so unknown paths answer 404
/// rather than 401.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(routes::health::banner))
        .route("/health", get(routes::health::health_check))
        .route("/auth/signup", post(routes::auth::signup))
        .route("/auth/login", post(routes::auth::login))
        .route("/tools/:id", get(routes::tools::get_tool))
        .route("/tools/:id/reviews", get(routes::tools::list_tool_reviews));

    let review_routes = Router::new()
        .route("/reviews", post(routes::reviews::create_review))
        .route("/reviews/me", get(routes::reviews::list_my_reviews))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_layer));

    // Layers run outermost-last: the token is checked before the role
    let admin_routes = Router::new()
        .route("/reviews", get(routes::admin::list_reviews))
        .route("/reviews/:id", patch(routes::admin::moderate_review))
        .route("/tools", post(routes::admin::create_tool))
        .route(
            "/tools/:id",
            put(routes::admin::update_tool).delete(routes::admin::delete_tool),
        )
        .route_layer(middleware::from_fn(admin_gate))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_layer));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(review_routes)
        .nest("/admin", admin_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Validates the bearer token and stores the caller's [`AuthContext`]
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(req.headers(), state.jwt())?;
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// Rejects callers without the admin role; runs after [`jwt_auth_layer`]
async fn admin_gate(
    auth: AuthContext,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_admin(&auth)?;
    Ok(next.run(req).await)
}
