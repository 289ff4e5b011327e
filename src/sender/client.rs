use super::SenderError;
use super::response::ServerRejection;
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, ClientBuilder, StatusCode};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error};
use url::Url;

pub const PUT_ENDPOINT: &str = "/api/put";
const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub max_connections: usize,
    pub keep_alive_timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: Url, timeout: Duration) -> Self {
        Self {
            base_url,
            timeout,
            max_connections: 4,
            keep_alive_timeout: Duration::from_secs(60),
            user_agent: format!("opentsdb-publisher/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Snapshot of the delivery counters of an [`HttpClient`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub points_delivered: u64,
    pub average_response_time: Duration,
}

#[derive(Debug, Default)]
pub struct ClientStats {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    points_delivered: AtomicU64,
    total_response_time: AtomicU64,
}

impl ClientStats {
    pub fn record_request(&self, success: bool, points: usize, response_time: Duration) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_response_time
            .fetch_add(response_time.as_millis() as u64, Ordering::Relaxed);

        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
            self.points_delivered.fetch_add(points as u64, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> DeliveryStats {
        let total_requests = self.total_requests.load(Ordering::Relaxed);
        let total_response_time = self.total_response_time.load(Ordering::Relaxed);

        let average_response_time = if total_requests > 0 {
            Duration::from_millis(total_response_time / total_requests)
        } else {
            Duration::ZERO
        };

        DeliveryStats {
            total_requests,
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            points_delivered: self.points_delivered.load(Ordering::Relaxed),
            average_response_time,
        }
    }
}

/// HTTP transport for the OpenTSDB put endpoint.
///
/// The endpoint URL is resolved once here and the underlying connection pool
/// is shared by every request made through this client and its clones.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
    put_url: Url,
    stats: Arc<ClientStats>,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self, SenderError> {
        let mut put_url = config.base_url.clone();
        put_url.set_path(PUT_ENDPOINT);

        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .pool_max_idle_per_host(config.max_connections)
            .pool_idle_timeout(config.keep_alive_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                SenderError::InvalidConfiguration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            config,
            put_url,
            stats: Arc::new(ClientStats::default()),
        })
    }

    pub fn put_url(&self) -> &Url {
        &self.put_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn stats(&self) -> DeliveryStats {
        self.stats.snapshot()
    }

    /// Posts an encoded JSON array of `points` data points.
    ///
    /// Only 200 and 204 count as success. Any other status is decoded into a
    /// [`ServerRejection`] whose details go to the error log.
    pub async fn put(&self, body: Bytes, points: usize) -> Result<(), SenderError> {
        let start = Instant::now();
        let bytes_sent = body.len();

        let response = self
            .client
            .post(self.put_url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON))
            .body(body)
            .send()
            .await
            .map_err(|e| {
                self.stats.record_request(false, points, start.elapsed());
                SenderError::from(e)
            })?;

        let status = response.status();
        let latency = start.elapsed();

        if matches!(status, StatusCode::OK | StatusCode::NO_CONTENT) {
            self.stats.record_request(true, points, latency);
            debug!(
                "Posted {} points ({} bytes) to {} in {:?}",
                points, bytes_sent, self.put_url, latency
            );
            return Ok(());
        }

        self.stats.record_request(false, points, latency);

        let content = response.bytes().await?;
        let rejection = ServerRejection::decode(status.as_u16(), &content);
        error!(
            status = status.as_u16(),
            "Failed to post data to OpenTSDB: Details: {}", rejection.details
        );

        Err(SenderError::Rejected {
            status: status.as_u16(),
            summary: rejection.summary(),
        })
    }
}
