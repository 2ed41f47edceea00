use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{TokenError, TokenService};
use crate::config::AppConfig;
use crate::database::Store;
use crate::handlers::{protected::stocks, public};
use crate::middleware::require_auth;

/// Everything a handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Store,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Store) -> Result<Self, TokenError> {
        let tokens = TokenService::from_config(&config.security)?;
        Ok(Self {
            config: Arc::new(config),
            store,
            tokens: Arc::new(tokens),
        })
    }
}

pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let app = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(auth_routes())
        // Protected
        .merge(stock_routes(state.clone()))
        .with_state(state);

    let app = if config.api.enable_request_logging {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    };

    app.layer(
        ServiceBuilder::new()
            .layer(cors_layer(&config.security.cors_origins))
            .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes)),
    )
}

fn auth_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
}

fn stock_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/stocks", get(stocks::list).post(stocks::create))
        .route("/api/stocks/portfolio-value", get(stocks::portfolio_value))
        .route("/api/stocks/dashboard", get(stocks::dashboard))
        .route("/api/stocks/:id", put(stocks::update).delete(stocks::delete))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    base.allow_origin(allowed)
}
