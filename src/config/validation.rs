use super::{CHUNK_SIZE_KEY, ConfigError, HOST_KEY, PORT_KEY, PublisherConfig, TIMEOUT_KEY};

impl PublisherConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::Invalid {
                name: HOST_KEY,
                reason: "host must not be empty".to_string(),
            });
        }

        if self.port == 0 {
            return Err(ConfigError::Invalid {
                name: PORT_KEY,
                reason: "port must be greater than 0".to_string(),
            });
        }

        // Every put request carries at least one point
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid {
                name: CHUNK_SIZE_KEY,
                reason: "chunk size must be greater than 0".to_string(),
            });
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: TIMEOUT_KEY,
                reason: "timeout must be greater than 0".to_string(),
            });
        }

        self.base_url()?;

        Ok(())
    }
}
