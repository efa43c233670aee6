use serde::{Deserialize, Serialize};
use std::path::Path;
use anyhow::{Context, Result};

pub const DEFAULT_CONFIG_FILE: &str = "huffkit.toml";
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;
pub const MAX_INPUT_BYTES: usize = 64 * 1024 * 1024; // 64MB

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Symbols per shard for chunked round-trips
    pub chunk_size: usize,
    /// Inputs larger than this are refused
    pub max_input_bytes: usize,
    /// Used when RUST_LOG is unset
    pub log_filter: String,
    pub show_codebook: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_input_bytes: MAX_INPUT_BYTES,
            log_filter: "huffkit=info".to_string(),
            show_codebook: true,
        }
    }
}

impl CodecConfig {
    /// Reads the config file if it exists, otherwise falls back to defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let config_file = config_path.unwrap_or(DEFAULT_CONFIG_FILE);

        if Path::new(config_file).exists() {
            let content = std::fs::read_to_string(config_file)
                .with_context(|| format!("reading {}", config_file))?;
            let config: CodecConfig = toml::from_str(&content)
                .with_context(|| format!("parsing {}", config_file))?;
            config.validate()?;
            Ok(config)
        } else if config_path.is_some() {
            anyhow::bail!("config file not found: {}", config_file)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, config_path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        tracing::info!("Wrote config: {}", config_path);
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            anyhow::bail!("chunk_size must be at least 1");
        }
        if self.max_input_bytes == 0 {
            anyhow::bail!("max_input_bytes must be at least 1");
        }
        Ok(())
    }

    pub fn check_input_size(&self, len: usize) -> Result<()> {
        if len > self.max_input_bytes {
            anyhow::bail!(
                "input is {} bytes, limit is {} (max_input_bytes)",
                len,
                self.max_input_bytes
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: CodecConfig = toml::from_str("chunk_size = 128\n").unwrap();
        assert_eq!(config.chunk_size, 128);
        assert_eq!(config.max_input_bytes, MAX_INPUT_BYTES);
        assert_eq!(config.log_filter, "huffkit=info");
        assert!(config.show_codebook);
    }

    #[test]
    fn rejects_zero_chunk_size() {
        let config = CodecConfig {
            chunk_size: 0,
            ..CodecConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn enforces_input_limit() {
        let config = CodecConfig {
            max_input_bytes: 10,
            ..CodecConfig::default()
        };
        assert!(config.check_input_size(10).is_ok());
        assert!(config.check_input_size(11).is_err());
    }
}
