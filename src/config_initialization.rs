//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::adapters::toml_config::VidpressConfig;
use crate::domain::model::CompressionMethod;
use crate::error::{VidpressError, VidpressResult};

/// Values given on the command line; `None` leaves lower layers in place
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub output_dir: Option<String>,
    pub codec: Option<String>,
    pub method: Option<String>,
    pub skip_rate: Option<u32>,
    pub scale_percent: Option<u32>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

const ENV_OUTPUT_DIR: &str = "VIDPRESS_OUTPUT_DIR";
const ENV_CODEC: &str = "VIDPRESS_CODEC";
const ENV_METHOD: &str = "VIDPRESS_METHOD";
const ENV_SKIP_RATE: &str = "VIDPRESS_SKIP_RATE";
const ENV_SCALE_PERCENT: &str = "VIDPRESS_SCALE_PERCENT";
const ENV_LOG_LEVEL: &str = "VIDPRESS_LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "VIDPRESS_LOG_FORMAT";

/// Effective configuration plus where its values came from.
///
/// Resolution runs before the log subscriber exists, so the provenance is
/// kept here and reported through [`ResolvedConfig::log_summary`] once
/// logging is up.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub config: VidpressConfig,
    /// Configuration file that was read, if any
    pub file: Option<PathBuf>,
    pub env_overrides: usize,
    pub cli_overrides: usize,
}

impl ResolvedConfig {
    pub fn log_summary(&self) {
        match &self.file {
            Some(path) => debug!("Loaded configuration from: {}", path.display()),
            None => debug!("No configuration file, using defaults"),
        }
        if self.env_overrides > 0 {
            debug!("Applied {} environment variable overrides", self.env_overrides);
        }
        if self.cli_overrides > 0 {
            debug!("Applied {} CLI configuration overrides", self.cli_overrides);
        }
        info!(
            "Configuration resolved (output dir {}, codec {}, method {})",
            self.config.output_dir, self.config.codec, self.config.default_method
        );
    }
}

/// Build the effective configuration following precedence:
/// CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> VidpressResult<ResolvedConfig> {
    resolve_configuration(config_path, overrides, |key| std::env::var(key).ok())
}

/// Same as [`initialize_configuration_hierarchy`] with an injectable
/// environment lookup
pub fn resolve_configuration<F>(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
    env: F,
) -> VidpressResult<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let file = VidpressConfig::locate(config_path);
    let mut config = match &file {
        Some(path) => VidpressConfig::load_file(path)?,
        None => VidpressConfig::default(),
    };

    let env_overrides = apply_environment(&mut config, &env)?;
    let cli_overrides = apply_cli_overrides(&mut config, overrides)?;
    config.validate()?;

    Ok(ResolvedConfig {
        config,
        file,
        env_overrides,
        cli_overrides,
    })
}

fn parse_method(value: &str, source: &str) -> VidpressResult<CompressionMethod> {
    CompressionMethod::parse(value)
        .map_err(|e| VidpressError::config(format!("{} from {}", e, source)))
}

fn parse_number(value: &str, source: &str) -> VidpressResult<u32> {
    value
        .trim()
        .parse()
        .map_err(|e| VidpressError::config(format!("Invalid number '{}' in {}: {}", value, source, e)))
}

fn apply_environment<F>(config: &mut VidpressConfig, env: &F) -> VidpressResult<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = 0;

    if let Some(value) = env(ENV_OUTPUT_DIR) {
        config.output_dir = value;
        applied += 1;
    }
    if let Some(value) = env(ENV_CODEC) {
        config.codec = value;
        applied += 1;
    }
    if let Some(value) = env(ENV_METHOD) {
        config.default_method = parse_method(&value, ENV_METHOD)?;
        applied += 1;
    }
    if let Some(value) = env(ENV_SKIP_RATE) {
        config.skip_rate = parse_number(&value, ENV_SKIP_RATE)?;
        applied += 1;
    }
    if let Some(value) = env(ENV_SCALE_PERCENT) {
        config.scale_percent = parse_number(&value, ENV_SCALE_PERCENT)?;
        applied += 1;
    }
    if let Some(value) = env(ENV_LOG_LEVEL) {
        config.log_level = value;
        applied += 1;
    }
    if let Some(value) = env(ENV_LOG_FORMAT) {
        config.log_format = value;
        applied += 1;
    }

    Ok(applied)
}

fn apply_cli_overrides(config: &mut VidpressConfig, overrides: &ConfigOverrides) -> VidpressResult<usize> {
    let mut applied = 0;

    if let Some(value) = &overrides.output_dir {
        config.output_dir = value.clone();
        applied += 1;
    }
    if let Some(value) = &overrides.codec {
        config.codec = value.clone();
        applied += 1;
    }
    if let Some(value) = &overrides.method {
        config.default_method = parse_method(value, "--method")?;
        applied += 1;
    }
    if let Some(value) = overrides.skip_rate {
        config.skip_rate = value;
        applied += 1;
    }
    if let Some(value) = overrides.scale_percent {
        config.scale_percent = value;
        applied += 1;
    }
    if let Some(value) = &overrides.log_level {
        config.log_level = value.clone();
        applied += 1;
    }
    if let Some(value) = &overrides.log_format {
        config.log_format = value.clone();
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("custom.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_layers() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(temp.path(), "");
        let config = resolve_configuration(Some(&path), &ConfigOverrides::default(), env_from(&[])).unwrap().config;
        assert_eq!(config, VidpressConfig::default());
    }

    #[test]
    fn test_env_beats_file_and_cli_beats_env() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(
            temp.path(),
            "[vidpress]\nskip_rate = 3\nscale_percent = 40\noutput_dir = \"from-file\"\n",
        );
        let env = env_from(&[("VIDPRESS_SKIP_RATE", "5"), ("VIDPRESS_OUTPUT_DIR", "from-env")]);
        let overrides = ConfigOverrides {
            output_dir: Some("from-cli".to_string()),
            ..ConfigOverrides::default()
        };

        let resolved = resolve_configuration(Some(&path), &overrides, env).unwrap();
        assert_eq!(resolved.file.as_deref(), Some(path.as_path()));
        assert_eq!(resolved.env_overrides, 2);
        assert_eq!(resolved.cli_overrides, 1);
        let config = resolved.config;
        assert_eq!(config.scale_percent, 40);
        assert_eq!(config.skip_rate, 5);
        assert_eq!(config.output_dir, "from-cli");
    }

    #[test]
    fn test_method_override_parsed() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(temp.path(), "");
        let overrides = ConfigOverrides {
            method: Some("frame-skip".to_string()),
            ..ConfigOverrides::default()
        };
        let config = resolve_configuration(Some(&path), &overrides, env_from(&[])).unwrap().config;
        assert_eq!(config.default_method, CompressionMethod::FrameSkip);
    }

    #[test]
    fn test_bad_env_number_is_config_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(temp.path(), "");
        let env = env_from(&[("VIDPRESS_SCALE_PERCENT", "half")]);
        let err = resolve_configuration(Some(&path), &ConfigOverrides::default(), env).unwrap_err();
        assert!(err.to_string().contains("VIDPRESS_SCALE_PERCENT"));
    }

    #[test]
    fn test_invalid_codec_rejected_after_merge() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_config(temp.path(), "");
        let overrides = ConfigOverrides {
            codec: Some("mpeg4".to_string()),
            ..ConfigOverrides::default()
        };
        assert!(resolve_configuration(Some(&path), &overrides, env_from(&[])).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = resolve_configuration(
            Some(Path::new("/no/such/vidpress.toml")),
            &ConfigOverrides::default(),
            env_from(&[]),
        );
        assert!(result.is_err());
    }
}
