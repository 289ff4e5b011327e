#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use opentsdb_publisher::domain::PLUGIN_RUNNING_ON_TAG;
use opentsdb_publisher::sender::{BatchSender, ClientConfig, HttpClient};
use opentsdb_publisher::{DataPoint, MetricRecord, MetricValue, Namespace, PluginConfig};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;
use wiremock::MockServer;

pub fn create_test_point(index: usize) -> DataPoint {
    DataPoint {
        metric: format!("intel.test.metric{index}"),
        timestamp: 1_704_067_200 + index as i64,
        value: MetricValue::Int(index as i64),
        tags: BTreeMap::from([("host".to_string(), "node1".to_string())]),
    }
}

pub fn create_test_points(count: usize) -> Vec<DataPoint> {
    (0..count).map(create_test_point).collect()
}

pub fn create_test_record(path: &str, value: impl Into<MetricValue>) -> MetricRecord {
    MetricRecord::new(
        Namespace::from_path(path),
        value,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    )
    .with_tag(PLUGIN_RUNNING_ON_TAG, "node1")
}

pub fn sender_for(mock_server: &MockServer, chunk_size: usize, timeout: Duration) -> BatchSender {
    let base = Url::parse(&mock_server.uri()).unwrap();
    let client = HttpClient::new(ClientConfig::new(base, timeout)).unwrap();
    BatchSender::new(client, chunk_size).unwrap()
}

/// Plugin settings pointing at the mock server, the way the host would pass them.
pub fn plugin_config_for(mock_server: &MockServer) -> PluginConfig {
    let uri = Url::parse(&mock_server.uri()).unwrap();
    PluginConfig::new()
        .with("host", format!("http://{}", uri.host_str().unwrap()))
        .with("port", i64::from(uri.port().unwrap()))
}

/// Bodies of all requests the server saw, decoded as put payloads.
pub async fn received_chunks(mock_server: &MockServer) -> Vec<Vec<DataPoint>> {
    mock_server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| serde_json::from_slice(&request.body).unwrap())
        .collect()
}
