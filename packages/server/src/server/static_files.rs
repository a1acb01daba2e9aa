use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

// Favicon and other assets, embedded at compile time
#[derive(RustEmbed)]
#[folder = "static/"]
pub struct StaticAssets;

/// Serve an embedded asset under /static/
pub async fn serve_static(Path(path): Path<String>) -> Response {
    serve_embedded::<StaticAssets>(&path)
}

/// Look up `path` in an embedded folder, 404 if absent
fn serve_embedded<E: RustEmbed>(path: &str) -> Response {
    let path = path.trim_start_matches('/');

    match E::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [
                    (header::CONTENT_TYPE, mime.as_ref().to_string()),
                    (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
                ],
                content.data,
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serves_favicon_with_mime() {
        let response = serve_embedded::<StaticAssets>("favicon.svg");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
    }

    #[test]
    fn test_missing_asset_is_404() {
        let response = serve_embedded::<StaticAssets>("missing.png");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
