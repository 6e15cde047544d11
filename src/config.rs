//! Configuration for treehuff

use serde::{Deserialize, Serialize};

use crate::error::{CompressError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Capacity of the buffers wrapped around caller streams.
    pub buffer_capacity: usize,
    /// Compress rejects inputs longer than this many bytes.
    pub max_input_size: u64,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 64 * 1024,
            max_input_size: 100 * 1024 * 1024, // 100 MB
        }
    }
}

impl CodecConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CompressError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.buffer_capacity == 0 {
            return Err(CompressError::InvalidConfig(
                "buffer_capacity must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
