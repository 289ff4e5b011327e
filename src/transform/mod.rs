mod namespace;

pub use namespace::split_namespace;

use crate::domain::{DataPoint, HOST_TAG, MetricRecord, PLUGIN_RUNNING_ON_TAG};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Result of converting one batch of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformOutcome {
    /// Valid points, in input order.
    pub points: Vec<DataPoint>,
    /// Number of records dropped for carrying a non-numeric value.
    pub dropped: usize,
}

impl TransformOutcome {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Converts metric records into OpenTSDB data points.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    fallback_host: Option<String>,
}

impl Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host tag value used for records that carry neither `plugin_running_on`
    /// nor their own `host` tag.
    pub fn with_fallback_host(mut self, host: impl Into<String>) -> Self {
        let host = host.into();
        self.fallback_host = (!host.is_empty()).then_some(host);
        self
    }

    pub fn fallback_host(&self) -> Option<&str> {
        self.fallback_host.as_deref()
    }

    /// Builds the candidate point for a record without checking its value.
    pub fn to_data_point(&self, record: &MetricRecord) -> DataPoint {
        let (metric, dynamic_tags) = split_namespace(&record.namespace);

        // Precedence, lowest first: dynamic segments, record tags, injected host.
        let mut tags: BTreeMap<String, String> = dynamic_tags.into_iter().collect();
        tags.extend(record.tags.iter().map(|(k, v)| (k.clone(), v.clone())));

        match record.tags.get(PLUGIN_RUNNING_ON_TAG) {
            Some(running_on) if !running_on.is_empty() => {
                tags.insert(HOST_TAG.to_string(), running_on.clone());
            }
            _ => {
                if tags.get(HOST_TAG).is_none_or(|host| host.is_empty()) {
                    tags.remove(HOST_TAG);
                    if let Some(fallback) = &self.fallback_host {
                        tags.insert(HOST_TAG.to_string(), fallback.clone());
                    }
                }
                debug!(
                    metric = %metric,
                    host = tags.get(HOST_TAG).map_or("<none>", String::as_str),
                    "Record has no {} tag",
                    PLUGIN_RUNNING_ON_TAG
                );
            }
        }

        DataPoint {
            metric,
            timestamp: record.timestamp.timestamp(),
            value: record.value.clone(),
            tags,
        }
    }

    /// Converts every record, dropping points whose value is not numeric.
    pub fn transform(&self, records: &[MetricRecord]) -> TransformOutcome {
        let mut outcome = TransformOutcome {
            points: Vec::with_capacity(records.len()),
            dropped: 0,
        };

        for record in records {
            let point = self.to_data_point(record);
            if point.is_valid() {
                outcome.points.push(point);
            } else {
                warn!(
                    metric = %point.metric,
                    kind = point.value.kind(),
                    "Omitted invalid data point (non-numeric values not allowed in OpenTSDB)"
                );
                outcome.dropped += 1;
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MetricValue, Namespace};
    use chrono::{TimeZone, Utc};

    fn record(path: &str, value: impl Into<MetricValue>) -> MetricRecord {
        MetricRecord::new(
            Namespace::from_path(path),
            value,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
        .with_tag(PLUGIN_RUNNING_ON_TAG, "node1")
    }

    #[test]
    fn non_numeric_value_is_dropped() {
        let records = vec![
            record("/intel/psutil/load/load1", 0.5),
            record("/intel/psutil/status", "running"),
            record("/intel/psutil/vm/free", 1024_i64),
        ];

        let outcome = Transformer::new().transform(&records);

        assert_eq!(outcome.dropped, 1);
        assert_eq!(outcome.points.len(), 2);
        assert_eq!(outcome.points[0].metric, "intel.psutil.load.load1");
        assert_eq!(outcome.points[1].metric, "intel.psutil.vm.free");
    }

    #[test]
    fn bool_and_structured_values_are_dropped() {
        let records = vec![
            record("/a/flag", true),
            record("/a/blob", MetricValue::Structured(serde_json::json!([1, 2]))),
        ];
        let outcome = Transformer::new().transform(&records);
        assert!(outcome.is_empty());
        assert_eq!(outcome.dropped, 2);
    }

    #[test]
    fn injected_host_overrides_record_host() {
        let rec = record("/intel/cpu/idle", 1_i64).with_tag("host", "foo");
        let rec = rec.with_tag(PLUGIN_RUNNING_ON_TAG, "bar");

        let point = Transformer::new().to_data_point(&rec);

        assert_eq!(point.tags.get("host").map(String::as_str), Some("bar"));
        assert_eq!(point.tags.get(PLUGIN_RUNNING_ON_TAG).map(String::as_str), Some("bar"));
    }

    #[test]
    fn record_tags_override_dynamic_tags() {
        let ns = Namespace::from_path("/intel/disk").add_dynamic("device", "sda").add_fixed("reads");
        let rec = MetricRecord::new(ns, 10_i64, Utc::now())
            .with_tag("device", "override")
            .with_tag(PLUGIN_RUNNING_ON_TAG, "node1");

        let point = Transformer::new().to_data_point(&rec);

        assert_eq!(point.metric, "intel.disk.reads");
        assert_eq!(point.tags.get("device").map(String::as_str), Some("override"));
    }

    #[test]
    fn dynamic_host_segment_is_overridden_by_injected_host() {
        let ns = Namespace::from_path("/intel").add_dynamic("host", "from-ns").add_fixed("up");
        let rec = MetricRecord::new(ns, 1_i64, Utc::now()).with_tag(PLUGIN_RUNNING_ON_TAG, "node9");
        let point = Transformer::new().to_data_point(&rec);
        assert_eq!(point.tags.get("host").map(String::as_str), Some("node9"));
    }

    #[test]
    fn missing_running_on_keeps_record_host() {
        let rec = MetricRecord::new(Namespace::from_path("/a/b"), 1_i64, Utc::now()).with_tag("host", "foo");
        let point = Transformer::new().with_fallback_host("fallback").to_data_point(&rec);
        assert_eq!(point.tags.get("host").map(String::as_str), Some("foo"));
    }

    #[test]
    fn missing_running_on_uses_fallback_host() {
        let rec = MetricRecord::new(Namespace::from_path("/a/b"), 1_i64, Utc::now());
        let point = Transformer::new().with_fallback_host("fallback").to_data_point(&rec);
        assert_eq!(point.tags.get("host").map(String::as_str), Some("fallback"));
    }

    #[test]
    fn missing_running_on_without_fallback_omits_host() {
        let rec = MetricRecord::new(Namespace::from_path("/a/b"), 1_i64, Utc::now())
            .with_tag("host", "")
            .with_tag("rack", "r1");
        let point = Transformer::new().to_data_point(&rec);
        assert!(!point.tags.contains_key("host"));
        assert_eq!(point.tags.get("rack").map(String::as_str), Some("r1"));
    }

    #[test]
    fn empty_fallback_is_ignored() {
        assert_eq!(Transformer::new().with_fallback_host("").fallback_host(), None);
    }

    #[test]
    fn timestamp_is_unix_seconds() {
        let point = Transformer::new().to_data_point(&record("/a/b", 1_i64));
        assert_eq!(point.timestamp, 1_704_067_200);
    }
}
