//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::RANGE, Method},
    middleware,
    routing::get,
    Router,
};
use extraction::Extractor;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::error::render_error_pages;
use crate::server::middleware::{extract_client_ip, log_requests};
use crate::server::routes::{
    health_handler, index_handler, not_found_handler, post_handler, reel_handler,
    stories_handler, tv_handler,
};
use crate::server::static_files::serve_static;
use crate::server::streamer::VideoStreamer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<Extractor>,
    pub streamer: Arc<VideoStreamer>,
    /// Port advertised on the index page
    pub port: u16,
}

impl AppState {
    pub fn new(extractor: Extractor, streamer: VideoStreamer, port: u16) -> Self {
        Self {
            extractor: Arc::new(extractor),
            streamer: Arc::new(streamer),
            port,
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    // Anyone may embed the relayed video
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([RANGE]);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/reel/:id", get(reel_handler))
        .route("/reel/:id/", get(reel_handler))
        .route("/p/:id", get(post_handler))
        .route("/p/:id/", get(post_handler))
        .route("/tv/:id", get(tv_handler))
        .route("/tv/:id/", get(tv_handler))
        .route("/stories/*rest", get(stories_handler))
        .route("/static/*path", get(serve_static))
        .fallback(not_found_handler)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(render_error_pages))
        .layer(middleware::from_fn(log_requests)) // Needs ClientIp
        .layer(middleware::from_fn(extract_client_ip))
        .layer(Extension(state))
        .layer(cors)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}
