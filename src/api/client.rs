//! HTTP client for the roadmap generator.
//!
//! One attempt per call: no retries, no timeouts beyond reqwest's defaults.
//! The user is the retry driver.

use async_trait::async_trait;
use reqwest::Client;

use super::types::{ErrorBody, GenerateRequest, GenerateResponse, HealthStatus};
use super::RoadmapApi;

/// Shown when a failure carries no readable message.
pub const GENERIC_FAILURE: &str = "Failed to generate roadmap";

/// Errors from generator calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Text for the error panel: the server's message if it sent one.
    pub fn user_message(&self) -> &str {
        match self {
            ApiError::Api { message, .. } => message,
            ApiError::Http(_) | ApiError::InvalidResponse(_) => GENERIC_FAILURE,
        }
    }
}

/// Pull `error` out of a failure body, else the generic message.
pub fn failure_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

/// Generator client bound to one base URL.
#[derive(Debug, Clone)]
pub struct GeneratorClient {
    http: Client,
    base_url: String,
}

impl GeneratorClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RoadmapApi for GeneratorClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError> {
        let url = format!("{}/api/generate", self.base_url);
        tracing::info!(domain = %request.domain, level = %request.level, "requesting roadmap");

        let response = self.http.post(&url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: failure_message(&body),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("failed to parse response: {e}")))
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = format!("{}/api/health", self.base_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_else(|_| "(no body)".into()),
            });
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("failed to parse health: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::roadmap::Level;

    /// Answer exactly one HTTP request with a canned response.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            // Read headers, then as much body as Content-Length promises.
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let (k, v) = l.split_once(':')?;
                            k.eq_ignore_ascii_case("content-length")
                                .then(|| v.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}")
    }

    fn request() -> GenerateRequest {
        GenerateRequest {
            domain: "Backend Engineering".into(),
            level: Level::Beginner,
        }
    }

    #[test]
    fn client_trims_base_url() {
        let client = GeneratorClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn failure_message_extraction() {
        assert_eq!(failure_message(r#"{"error":"model unavailable"}"#), "model unavailable");
        assert_eq!(failure_message(r#"{"error":""}"#), GENERIC_FAILURE);
        assert_eq!(failure_message(r#"{"detail":"x"}"#), GENERIC_FAILURE);
        assert_eq!(failure_message("<html>502</html>"), GENERIC_FAILURE);
    }

    #[test]
    fn error_display() {
        let err = ApiError::Api {
            status: 500,
            message: "model unavailable".into(),
        };
        assert!(err.to_string().contains("500"));
        assert_eq!(err.user_message(), "model unavailable");

        let err = ApiError::InvalidResponse("bad".into());
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn server_error_carries_body_message() {
        let base = serve_once("500 Internal Server Error", r#"{"error":"model unavailable"}"#).await;
        let client = GeneratorClient::new(base);
        let err = client.generate(&request()).await.unwrap_err();
        match err {
            ApiError::Api { status, ref message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "model unavailable");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_parses_roadmap() {
        let base = serve_once(
            "200 OK",
            r#"{"roadmap":{"domain":"Backend Engineering","level":"Beginner","phases":[{"name":"Foundations","weeks":"1-2","topics":[]}]},"mermaid":"graph TD;A-->B;"}"#,
        )
        .await;
        let client = GeneratorClient::new(base);
        let resp = client.generate(&request()).await.unwrap();
        assert_eq!(resp.roadmap.domain, "Backend Engineering");
        assert_eq!(resp.mermaid, "graph TD;A-->B;");
    }

    #[tokio::test]
    async fn malformed_success_body_is_invalid_response() {
        let base = serve_once("200 OK", r#"{"roadmap": "not an object"}"#).await;
        let client = GeneratorClient::new(base);
        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn connection_refused_is_http_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = GeneratorClient::new(format!("http://{addr}"));
        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }

    #[tokio::test]
    async fn health_ok() {
        let base = serve_once("200 OK", r#"{"status":"ok","provider":"ollama"}"#).await;
        let health = GeneratorClient::new(base).health().await.unwrap();
        assert_eq!(health.status, "ok");
    }
}
