#![deny(rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::cast_possible_truncation, // Safe within realistic value bounds (durations, sizes)
    clippy::cast_sign_loss,           // Safe where values are known non-negative
    clippy::missing_errors_doc,       // Internal API
    clippy::module_name_repetitions,  // e.g. SenderError in sender module
    clippy::must_use_candidate,       // Annotated selectively on critical APIs
    clippy::doc_markdown              // Internal API
)]

pub mod app;
pub mod config;
pub mod domain;
pub mod publisher;
pub mod sender;
pub mod transform;

// Re-export main types for easy access
pub use config::{ConfigError, PluginConfig, PublisherConfig};
pub use domain::{DataPoint, MetricRecord, MetricValue, Namespace, NamespaceElement};
pub use publisher::{OpentsdbPublisher, PublishError, PublishOutcome};
pub use sender::{BatchSender, SenderError};
pub use transform::{TransformOutcome, Transformer};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
