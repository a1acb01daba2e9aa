// HTTP server setup (Axum)
pub mod app;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod static_files;
pub mod streamer;
pub mod templates;

pub use app::*;
pub use error::AppError;
pub use streamer::VideoStreamer;
