/// Application state and router builder
///
/// # Router layout
///
/// ```text
/// /
/// ├── /health                              # liveness (public)
/// ├── /auth/
/// │   ├── POST /register                   # public
/// │   └── POST /login                      # public
/// └── /api/                                # behind the auth gate
///     ├── GET  /users/:id
///     ├── GET  /organisations
///     ├── POST /organisations
///     ├── GET  /organisations/:org_id
///     └── POST /organisations/:org_id/users
/// ```
///
/// The reference implementation this API descends from left the
/// add-member route outside the auth gate; that was an oversight and is
/// not replicated — every `/api` route requires a verified token.
///
/// # Middleware stack
///
/// Applied in order (bottom to top): request tracing (tower-http
/// TraceLayer), CORS, security headers, then the per-route auth gate.

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use orgbook_shared::auth::middleware::authenticate;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; uses Arc
/// internally for cheap cloning. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the signing secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Protected routes: nothing here runs without a verified identity
    let api_routes = Router::new()
        .route("/users/:id", get(routes::users::get_user))
        .route("/organisations", get(routes::organisations::list_organisations))
        .route("/organisations", post(routes::organisations::create_organisation))
        .route("/organisations/:org_id", get(routes::organisations::get_organisation))
        .route(
            "/organisations/:org_id/users",
            post(routes::organisations::add_member),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_gate,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.production {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_origin(Vec::<HeaderValue>::new())
    } else {
        CorsLayer::permissive()
    };

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// The authentication gate
///
/// Verifies the bearer token and injects the resulting
/// [`AuthContext`](orgbook_shared::auth::middleware::AuthContext) into the
/// request extensions. Runs before any protected handler; a request that
/// fails here never reaches one.
async fn auth_gate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = authenticate(req.headers(), state.jwt_secret())?;

    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}
