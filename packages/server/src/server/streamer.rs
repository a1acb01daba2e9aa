//! Byte-range passthrough of the resolved video.
//!
//! The upstream body is never buffered: chunks are forwarded as they arrive.
//! Dropping the response body (client disconnect) drops the upstream request.
//! The body has no total deadline, but every wait on the CDN (response headers,
//! each chunk) is bounded by the idle timeout.

use std::io;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};
use bytes::Bytes;
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::server::error::AppError;

const MIB: u64 = 1024 * 1024;
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
const UPSTREAM_ORIGIN: &str = "https://www.instagram.com";

/// Streams video bytes from the CDN to the client.
#[derive(Clone)]
pub struct VideoStreamer {
    client: reqwest::Client,
    user_agent: String,
    idle_timeout: Duration,
}

impl VideoStreamer {
    /// Build a streamer with a bounded connect timeout and no total timeout.
    pub fn new(user_agent: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            user_agent: user_agent.into(),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        })
    }

    /// Longest wait for response headers or for the next body chunk.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Fetch `video_url`, forwarding `range`, and relay it as `video/mp4`.
    pub async fn stream(
        &self,
        video_url: &str,
        range: Option<&HeaderValue>,
        file_name: &str,
    ) -> Result<Response, AppError> {
        let mut request = self
            .client
            .get(video_url)
            .header(header::USER_AGENT, &self.user_agent)
            .header(header::ACCEPT, "*/*")
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(header::REFERER, format!("{UPSTREAM_ORIGIN}/"))
            .header(header::ORIGIN, UPSTREAM_ORIGIN)
            .header("Sec-Fetch-Dest", "video")
            .header("Sec-Fetch-Mode", "cors")
            .header("Sec-Fetch-Site", "cross-site")
            .header(header::PRAGMA, "no-cache")
            .header(header::CACHE_CONTROL, "no-cache");

        if let Some(range) = range {
            debug!(range = ?range, "Forwarding range request");
            request = request.header(header::RANGE, range.clone());
        }

        let started = Instant::now();
        let idle = self.idle_timeout;
        let upstream = match tokio::time::timeout(idle, request.send()).await {
            Ok(result) => result.map_err(AppError::VideoTransport)?,
            Err(_) => {
                warn!(idle_secs = idle.as_secs(), "Video host sent no response headers");
                return Err(AppError::VideoTimeout { idle });
            }
        };
        let status = upstream.status();
        info!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Video host responded"
        );

        if !status.is_success() {
            return Err(AppError::VideoUpstream {
                status: status.as_u16(),
            });
        }

        let out_status = if status == StatusCode::PARTIAL_CONTENT {
            StatusCode::PARTIAL_CONTENT
        } else {
            StatusCode::OK
        };
        let headers = response_headers(upstream.headers(), file_name);

        let file_name = file_name.to_string();
        let mut chunks = upstream.bytes_stream();
        let body = async_stream::stream! {
            let started = Instant::now();
            let mut total: u64 = 0;
            let mut next_mark = MIB;

            loop {
                let chunk = match tokio::time::timeout(idle, chunks.next()).await {
                    Ok(Some(chunk)) => chunk.map_err(io::Error::other),
                    Ok(None) => break,
                    Err(_) => Err(io::Error::new(io::ErrorKind::TimedOut, "video host stalled")),
                };
                match chunk {
                    Ok(bytes) => {
                        total += bytes.len() as u64;
                        if total >= next_mark {
                            info!(
                                file_name = %file_name,
                                streamed_mib = total / MIB,
                                rate_mibs = format!("{:.2}", rate_mibs(total, started.elapsed())),
                                "Stream progress"
                            );
                            next_mark = (total / MIB + 1) * MIB;
                        }
                        yield Ok::<Bytes, io::Error>(bytes);
                    }
                    Err(e) => {
                        warn!(file_name = %file_name, error = %e, total_bytes = total, "Upstream body failed mid-stream");
                        yield Err(e);
                        return;
                    }
                }
            }

            info!(
                file_name = %file_name,
                total_bytes = total,
                rate_mibs = format!("{:.2}", rate_mibs(total, started.elapsed())),
                duration_ms = started.elapsed().as_millis() as u64,
                "Finished streaming video"
            );
        };

        let mut response = Response::new(Body::from_stream(body));
        *response.status_mut() = out_status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

fn rate_mibs(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        bytes as f64 / secs / MIB as f64
    } else {
        0.0
    }
}

/// Headers for the client response, copying length and range from upstream
fn response_headers(upstream: &HeaderMap, file_name: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("video/mp4"));
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));

    for name in [header::CONTENT_LENGTH, header::CONTENT_RANGE] {
        if let Some(value) = upstream.get(&name) {
            headers.insert(name, value.clone());
        }
    }

    if let Ok(value) = HeaderValue::from_str(&format!("inline; filename=\"{file_name}\"")) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_headers() {
        let mut upstream = HeaderMap::new();
        upstream.insert(header::CONTENT_LENGTH, HeaderValue::from_static("100"));
        upstream.insert(header::CONTENT_RANGE, HeaderValue::from_static("bytes 0-99/1000"));
        upstream.insert(header::SET_COOKIE, HeaderValue::from_static("tracking=1"));

        let headers = response_headers(&upstream, "ABC123.mp4");

        assert_eq!(headers[header::CONTENT_TYPE], "video/mp4");
        assert_eq!(headers[header::ACCEPT_RANGES], "bytes");
        assert_eq!(headers[header::CONTENT_LENGTH], "100");
        assert_eq!(headers[header::CONTENT_RANGE], "bytes 0-99/1000");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "inline; filename=\"ABC123.mp4\""
        );
        assert!(headers.get(header::SET_COOKIE).is_none());
    }

    /// Accepts connections, optionally writes `preamble`, then never sends more.
    async fn spawn_stalled_host(preamble: &'static [u8]) -> String {
        use tokio::io::AsyncWriteExt;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((mut socket, _)) = listener.accept().await {
                let _ = socket.write_all(preamble).await;
                held.push(socket);
            }
        });
        format!("http://{addr}/v.mp4")
    }

    fn streamer() -> VideoStreamer {
        VideoStreamer::new("relay-test-agent/1.0")
            .unwrap()
            .with_idle_timeout(Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_silent_host_times_out() {
        let url = spawn_stalled_host(b"").await;

        let outcome =
            tokio::time::timeout(Duration::from_secs(5), streamer().stream(&url, None, "A.mp4"))
                .await
                .expect("streamer gave up on its own");

        match outcome {
            Err(err) => {
                assert!(matches!(err, AppError::VideoTimeout { .. }));
                assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
                assert_eq!(err.error_type(), "network");
            }
            Ok(_) => panic!("silent host produced a response"),
        }
    }

    #[tokio::test]
    async fn test_body_stall_ends_stream_with_error() {
        let url = spawn_stalled_host(
            b"HTTP/1.1 200 OK\r\nContent-Type: video/mp4\r\nContent-Length: 100\r\n\r\nabc",
        )
        .await;

        let response = match streamer().stream(&url, None, "A.mp4").await {
            Ok(response) => response,
            Err(e) => panic!("headers were sent, got {e}"),
        };
        assert_eq!(response.status(), StatusCode::OK);

        let body = tokio::time::timeout(
            Duration::from_secs(5),
            axum::body::to_bytes(response.into_body(), usize::MAX),
        )
        .await
        .expect("body read gave up on its own");
        assert!(body.is_err());
    }

    #[test]
    fn test_rate_handles_zero_elapsed() {
        assert_eq!(rate_mibs(10, Duration::ZERO), 0.0);
        assert_eq!(rate_mibs(2 * MIB, Duration::from_secs(2)), 1.0);
    }
}
