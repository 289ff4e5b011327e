//! Domain layer for opentsdb-publisher.
//!
//! Contains the canonical types shared across all modules:
//! - `MetricRecord`: A collected sample as handed over by the plugin host
//! - `Namespace` / `NamespaceElement`: The hierarchical metric path
//! - `MetricValue`: The typed value payload of a sample
//! - `DataPoint`: The wire-format record posted to `/api/put`

pub mod data_point;
pub mod metric;

pub use data_point::DataPoint;
pub use metric::{MetricRecord, MetricValue, Namespace, NamespaceElement};

/// Tag injected on every data point to identify the originating machine.
pub const HOST_TAG: &str = "host";

/// Tag set by the plugin host carrying the name of the machine the collector ran on.
pub const PLUGIN_RUNNING_ON_TAG: &str = "plugin_running_on";
