use crate::config::{ConfigError, PluginConfig, PublisherConfig};
use crate::domain::MetricRecord;
use crate::sender::{BatchSender, ClientConfig, DeliveryStats, HttpClient, SenderError};
use crate::transform::Transformer;
use thiserror::Error;
use tracing::{error, info};

pub const PLUGIN_NAME: &str = "opentsdb";
pub const PLUGIN_VERSION: u32 = 10;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Delivery error: {0}")]
    Send(#[from] SenderError),
}

/// What a successful publish call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    pub delivered: usize,
    pub dropped: usize,
}

/// Publishes metric records to OpenTSDB.
///
/// The sender is built from the configuration passed to the first `publish`
/// call and reused afterwards; later configurations are not consulted.
#[derive(Debug, Default)]
pub struct OpentsdbPublisher {
    transformer: Transformer,
    sender: Option<BatchSender>,
}

impl OpentsdbPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transformer(transformer: Transformer) -> Self {
        Self {
            transformer,
            sender: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.sender.is_some()
    }

    pub fn stats(&self) -> Option<DeliveryStats> {
        self.sender.as_ref().map(BatchSender::stats)
    }

    pub async fn publish(
        &mut self,
        records: &[MetricRecord],
        config: &PluginConfig,
    ) -> Result<PublishOutcome, PublishError> {
        let sender = self.sender(config)?;

        let outcome = self.transformer.transform(records);
        if outcome.is_empty() {
            info!(
                records = records.len(),
                dropped = outcome.dropped,
                "No valid data points to post"
            );
            return Ok(PublishOutcome {
                delivered: 0,
                dropped: outcome.dropped,
            });
        }

        if let Err(e) = sender.save(&outcome.points).await {
            error!(records = records.len(), "Error posting metrics: {}", e);
            return Err(e.into());
        }

        info!(
            delivered = outcome.points.len(),
            dropped = outcome.dropped,
            "Posted metrics to OpenTSDB"
        );

        Ok(PublishOutcome {
            delivered: outcome.points.len(),
            dropped: outcome.dropped,
        })
    }

    fn sender(&mut self, config: &PluginConfig) -> Result<BatchSender, PublishError> {
        if let Some(sender) = &self.sender {
            return Ok(sender.clone());
        }

        let resolved = PublisherConfig::from_plugin_config(config)?;
        let client = HttpClient::new(ClientConfig::new(resolved.base_url()?, resolved.timeout))?;
        let sender = BatchSender::new(client, resolved.chunk_size)?;

        info!(
            endpoint = %sender.client().put_url(),
            chunk_size = resolved.chunk_size,
            timeout = ?resolved.timeout,
            "Initialized OpenTSDB publisher"
        );

        self.sender = Some(sender.clone());
        Ok(sender)
    }
}
