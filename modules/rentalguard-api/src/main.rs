use std::sync::Arc;

use ai_client::OpenAi;
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use rentalguard_common::Config;
use rentalguard_verify::{HttpPageFetcher, OpenAiInvoker, VerifyOrchestrator};

mod rest;
mod store;

use store::{CheckStore, MemoryCheckStore};

/// Screenshots arrive inline as data URIs.
const MAX_REQUEST_BYTES: usize = 10 * 1024 * 1024;
/// Check records carry text only.
const MAX_CHECK_BYTES: usize = 64 * 1024;

pub struct AppState {
    pub orchestrator: VerifyOrchestrator,
    pub store: Arc<dyn CheckStore>,
}

fn verify_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

fn checks_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub fn build_router(state: Arc<AppState>) -> Router {
    // CorsLayer answers every OPTIONS request itself with an empty 200.
    let verify = Router::new()
        .route("/verify", rest::verify::route())
        .route("/api/verify", rest::verify::route())
        .layer(verify_cors());

    let checks = Router::new()
        .route(
            "/api/checks/new",
            post(rest::checks::api_checks_new).fallback(rest::method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(MAX_CHECK_BYTES))
        .layer(checks_cors());

    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        .merge(verify)
        .merge(checks)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        // Listings and screenshots are private; never cache responses
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path + status + latency only (no bodies, no query params, no IP)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CatchPanicLayer::custom(rest::handle_panic))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("rentalguard=info".parse()?)
                .add_directive("ai_client=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let fetcher = HttpPageFetcher::new(config.fetch_timeout)?;
    let agent = OpenAi::new(
        config.openai_api_key.clone().unwrap_or_default(),
        &config.model,
    )
    .with_base_url(&config.openai_base_url);

    let state = Arc::new(AppState {
        orchestrator: VerifyOrchestrator::new(
            Arc::new(fetcher),
            Arc::new(OpenAiInvoker::new(agent)),
        ),
        store: Arc::new(MemoryCheckStore::new()),
    });

    let app = build_router(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!(model = %config.model, "RentalGuard API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
