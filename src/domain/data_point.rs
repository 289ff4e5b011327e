use super::metric::MetricValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sample in the shape accepted by OpenTSDB's `/api/put` endpoint.
///
/// Tags are kept ordered so that encoded payloads are deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub metric: String,
    /// Unix epoch seconds.
    pub timestamp: i64,
    pub value: MetricValue,
    pub tags: BTreeMap<String, String>,
}

impl DataPoint {
    /// OpenTSDB rejects anything but numbers, so only numeric points are
    /// eligible for transmission.
    pub fn is_valid(&self) -> bool {
        self.value.is_numeric()
    }
}

/// Encodes a chunk of points as the JSON array body of a put request.
pub fn encode_chunk(points: &[DataPoint]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(points)
}
