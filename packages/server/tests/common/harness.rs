//! Router harness and a local stand-in for the video CDN.

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing,
    Router,
};
use extraction::{pipeline::fetch::DESKTOP_USER_AGENT, testing::mock_extractor, MockTransport};
use server_core::server::{build_app, AppState, VideoStreamer};
use tower::ServiceExt;

/// Bytes served by the fake CDN
pub const VIDEO: &[u8] = b"\x00\x00\x00\x18ftypmp42 relay-test-payload";

/// Router wired to a scripted transport
pub fn test_app(mock: &MockTransport) -> Router {
    let streamer = VideoStreamer::new(DESKTOP_USER_AGENT).expect("video client");
    build_app(AppState::new(mock_extractor(mock), streamer, 8080))
}

/// Send a GET with optional extra headers.
pub async fn get(app: Router, uri: &str, headers: &[(&str, &str)]) -> Response {
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    app.oneshot(builder.body(Body::empty()).expect("request"))
        .await
        .expect("router is infallible")
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("json body")
}

/// Start a CDN stand-in on an ephemeral port and return its base URL.
///
/// `/video.mp4` honours `Range: bytes=0-3`; `/forbidden.mp4` always answers 403.
pub async fn spawn_video_host() -> String {
    let app = Router::new()
        .route("/video.mp4", routing::get(serve_video))
        .route("/forbidden.mp4", routing::get(|| async { StatusCode::FORBIDDEN }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("video host");
    });
    format!("http://{addr}")
}

async fn serve_video(headers: HeaderMap) -> Response {
    let range = headers.get(header::RANGE).and_then(|v| v.to_str().ok());
    if range == Some("bytes=0-3") {
        let content_range = format!("bytes 0-3/{}", VIDEO.len());
        return (
            StatusCode::PARTIAL_CONTENT,
            [(header::CONTENT_RANGE, content_range)],
            &VIDEO[..4],
        )
            .into_response();
    }
    VIDEO.into_response()
}
