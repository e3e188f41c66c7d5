// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::model::{CompressionMethod, CompressionRequest};
use crate::error::{VidpressError, VidpressResult};
use crate::utils::logging::{LogFormat, LogLevel, LoggingConfig};

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "vidpress.toml";

/// Tool configuration, stored under a `[vidpress]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VidpressConfig {
    /// Directory compressed files are written to
    pub output_dir: String,
    /// Four-character codec identifier for the encoder
    pub codec: String,
    pub default_method: CompressionMethod,
    pub skip_rate: u32,
    pub scale_percent: u32,
    pub log_level: String,
    pub log_format: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    vidpress: VidpressConfig,
}

impl Default for VidpressConfig {
    fn default() -> Self {
        Self {
            output_dir: "output".to_string(),
            codec: "mp4v".to_string(),
            default_method: CompressionMethod::Combined,
            skip_rate: 2,
            scale_percent: 50,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl VidpressConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> VidpressResult<Self> {
        let parsed: ConfigFile = toml::from_str(content)
            .map_err(|e| VidpressError::config(format!("Failed to parse TOML config: {}", e)))?;
        Ok(parsed.vidpress)
    }

    /// Load a config file
    pub fn load_file(file_path: &Path) -> VidpressResult<Self> {
        if !file_path.exists() {
            return Err(VidpressError::config(format!(
                "Config file does not exist: {}",
                file_path.display()
            )));
        }

        let content = std::fs::read_to_string(file_path).map_err(|e| {
            VidpressError::config(format!("Failed to read config file {}: {}", file_path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Explicit path if given, else `vidpress.toml` in the working directory
    /// when it exists
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        }
    }

    pub fn to_toml_string(&self) -> VidpressResult<String> {
        let file = ConfigFile {
            vidpress: self.clone(),
        };
        toml::to_string_pretty(&file).map_err(|e| VidpressError::Serialization {
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> VidpressResult<()> {
        if self.codec.len() != 4 || !self.codec.is_ascii() {
            return Err(VidpressError::config(format!(
                "Codec identifier must be four ASCII characters, got '{}'",
                self.codec
            )));
        }
        if self.output_dir.trim().is_empty() {
            return Err(VidpressError::config("Output directory cannot be empty"));
        }
        LogLevel::parse(&self.log_level)?;
        LogFormat::parse(&self.log_format)?;
        Ok(())
    }

    /// Request built from the configured method and parameters
    pub fn default_request(&self) -> CompressionRequest {
        CompressionRequest::new(self.default_method, self.skip_rate, self.scale_percent)
    }

    pub fn logging(&self) -> VidpressResult<LoggingConfig> {
        Ok(LoggingConfig::new(
            LogLevel::parse(&self.log_level)?,
            LogFormat::parse(&self.log_format)?,
        ))
    }
}
