//! Mirrored content routes: resolve the video, then stream it.

use axum::{
    extract::{Extension, Path},
    http::{header, HeaderMap, Uri},
    response::Response,
};
use extraction::ExtractionError;
use tracing::info;

use crate::server::app::AppState;
use crate::server::error::AppError;

const LOG_PREVIEW_CHARS: usize = 50;

pub async fn reel_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    relay(&state, "reel", &id, &headers).await
}

pub async fn post_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    relay(&state, "p", &id, &headers).await
}

pub async fn tv_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    relay(&state, "tv", &id, &headers).await
}

/// Stories never carry a relayable video
pub async fn stories_handler() -> AppError {
    ExtractionError::unsupported("story").into()
}

pub async fn not_found_handler(uri: Uri) -> AppError {
    AppError::RouteNotFound {
        path: uri.path().to_string(),
    }
}

async fn relay(
    state: &AppState,
    kind: &str,
    id: &str,
    headers: &HeaderMap,
) -> Result<Response, AppError> {
    let url = mirrored_url(&state.extractor.config().domain, kind, id);
    let media = state.extractor.resolve(&url).await?;

    info!(
        file_name = %media.file_name,
        username = media.username.as_deref().unwrap_or("unknown"),
        caption = %preview(media.caption.as_deref().unwrap_or("")),
        "Streaming resolved video"
    );

    state
        .streamer
        .stream(&media.video_url, headers.get(header::RANGE), &media.file_name)
        .await
}

/// The platform URL this relay path mirrors
fn mirrored_url(domain: &str, kind: &str, id: &str) -> String {
    format!("https://www.{domain}/{kind}/{id}/")
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(LOG_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirrored_url() {
        assert_eq!(
            mirrored_url("instagram.com", "reel", "ABC123"),
            "https://www.instagram.com/reel/ABC123/"
        );
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("short"), "short");
        let long = "é".repeat(60);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), LOG_PREVIEW_CHARS + 3);
    }
}
