use super::{HttpClient, SenderError};
use super::client::DeliveryStats;
use crate::domain::DataPoint;
use crate::domain::data_point::encode_chunk;
use bytes::Bytes;
use tracing::{debug, warn};

/// Delivers data points to OpenTSDB in chunks of at most `chunk_size`.
///
/// Chunks go out one after another in input order and the first failing
/// chunk ends the call. Chunks delivered before the failure stay delivered,
/// so a failed `save` may still have written part of its input.
#[derive(Debug, Clone)]
pub struct BatchSender {
    client: HttpClient,
    chunk_size: usize,
}

impl BatchSender {
    pub fn new(client: HttpClient, chunk_size: usize) -> Result<Self, SenderError> {
        if chunk_size == 0 {
            return Err(SenderError::InvalidConfiguration(
                "Chunk size must be greater than 0".to_string(),
            ));
        }

        Ok(Self { client, chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub fn stats(&self) -> DeliveryStats {
        self.client.stats()
    }

    pub async fn save(&self, points: &[DataPoint]) -> Result<(), SenderError> {
        if points.is_empty() {
            return Ok(());
        }

        let total_chunks = points.len().div_ceil(self.chunk_size);
        let mut delivered = 0;

        for (index, chunk) in points.chunks(self.chunk_size).enumerate() {
            debug!(
                "Sending chunk {}/{} with {} points",
                index + 1,
                total_chunks,
                chunk.len()
            );

            let result = match encode_chunk(chunk) {
                Ok(body) => self.client.put(Bytes::from(body), chunk.len()).await,
                Err(e) => Err(e.into()),
            };

            if let Err(e) = result {
                if delivered > 0 {
                    warn!(
                        delivered,
                        remaining = points.len() - delivered,
                        "Chunk {}/{} failed after earlier chunks were delivered",
                        index + 1,
                        total_chunks
                    );
                }
                return Err(e);
            }

            delivered += chunk.len();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sender::ClientConfig;
    use std::time::Duration;
    use url::Url;

    fn client() -> HttpClient {
        let base = Url::parse("http://127.0.0.1:9").unwrap();
        HttpClient::new(ClientConfig::new(base, Duration::from_secs(1))).unwrap()
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let err = BatchSender::new(client(), 0).unwrap_err();
        assert!(matches!(err, SenderError::InvalidConfiguration(_)));
    }

    #[test]
    fn empty_input_sends_nothing() {
        let sender = BatchSender::new(client(), 10).unwrap();
        assert!(tokio_test::block_on(sender.save(&[])).is_ok());
        assert_eq!(sender.stats().total_requests, 0);
    }
}
