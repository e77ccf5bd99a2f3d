//! HTTP implementation of the leaderboard client

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request, StatusCode};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tracing::{debug, warn};

use super::{ClientError, LeaderboardClient};
use crate::config::CLIENT_TIMEOUT_MS;
use crate::protocol::{ErrorBody, LeaderboardEntry, ScoreSubmission};

const LEADERBOARD_PATH: &str = "/api/leaderboard";

/// Leaderboard client over plain HTTP/1.1
#[derive(Clone)]
pub struct HttpLeaderboardClient {
    client: Client<HttpConnector, Full<Bytes>>,
    /// Scheme and authority, e.g. `http://127.0.0.1:3000`
    base_url: String,
    timeout: Duration,
}

impl HttpLeaderboardClient {
    /// Create a new client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(90))
            .build(connector);

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Client with the default timeout
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(base_url, Duration::from_millis(CLIENT_TIMEOUT_MS))
    }

    fn uri(&self, query: Option<String>) -> String {
        match query {
            Some(q) => format!("{}{}?{}", self.base_url, LEADERBOARD_PATH, q),
            None => format!("{}{}", self.base_url, LEADERBOARD_PATH),
        }
    }

    /// Send a request and buffer the response body
    async fn send(&self, req: Request<Full<Bytes>>) -> Result<(StatusCode, Bytes), ClientError> {
        let exchange = async {
            let response = self
                .client
                .request(req)
                .await
                .map_err(|e| ClientError::Connection(e.to_string()))?;
            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| ClientError::Decode(e.to_string()))?
                .to_bytes();
            Ok::<_, ClientError>((status, body))
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| ClientError::Timeout)?
    }
}

#[async_trait]
impl LeaderboardClient for HttpLeaderboardClient {
    async fn submit(&self, name: &str, score: u32) -> Result<(), ClientError> {
        let payload = ScoreSubmission {
            name: name.to_string(),
            score,
        };
        let body = serde_json::to_vec(&payload).map_err(|e| ClientError::InvalidRequest(e.to_string()))?;

        let req = Request::builder()
            .method(Method::POST)
            .uri(self.uri(None))
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;

        let (status, body) = self.send(req).await?;

        if status.is_success() {
            debug!("Submitted score {} for {}", score, name);
            return Ok(());
        }

        let err = if status == StatusCode::BAD_REQUEST {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_else(|_| status.to_string());
            ClientError::Rejected(message)
        } else {
            ClientError::Status(status.as_u16())
        };
        warn!("Score submission failed: {}", err);
        Err(err)
    }

    async fn fetch_top(&self, limit: Option<usize>) -> Result<Vec<LeaderboardEntry>, ClientError> {
        let req = Request::builder()
            .method(Method::GET)
            .uri(self.uri(limit.map(|n| format!("limit={}", n))))
            .body(Full::new(Bytes::new()))
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;

        let (status, body) = self.send(req).await?;

        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_building() {
        let client = HttpLeaderboardClient::with_base_url("http://localhost:3000/");
        assert_eq!(client.uri(None), "http://localhost:3000/api/leaderboard");
        assert_eq!(
            client.uri(Some("limit=5".into())),
            "http://localhost:3000/api/leaderboard?limit=5"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transient() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let client = HttpLeaderboardClient::new("http://127.0.0.1:9", Duration::from_secs(2));
        let err = client.submit("Ada", 3).await.unwrap_err();
        assert!(err.is_transient());
    }
}
