use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_ENV: &str = "SFCHECK_CONFIG";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    #[serde(default = "default_table_width")]
    pub table_width: usize,
    #[serde(default)]
    pub checks: ChecksConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
}

/// Which mvip-mode signals take part in the aggregate status.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChecksConfig {
    #[serde(default = "default_enabled")]
    pub utilization: bool,
    #[serde(default = "default_enabled")]
    pub sessions: bool,
    #[serde(default = "default_enabled")]
    pub disk_activity: bool,
    #[serde(default = "default_enabled")]
    pub cluster_faults: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_utilization_warning_percent")]
    pub utilization_warning_percent: f64,
    #[serde(default = "default_utilization_critical_percent")]
    pub utilization_critical_percent: f64,
    /// Element OS soft limit of active iSCSI sessions per node.
    #[serde(default = "default_sessions_per_node")]
    pub sessions_per_node: u32,
    #[serde(default = "default_session_headroom")]
    pub session_headroom: f64,
    #[serde(default = "default_session_warning_ratio")]
    pub session_warning_ratio: f64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
            state_dir: default_state_dir(),
            table_width: default_table_width(),
            checks: ChecksConfig::default(),
            thresholds: ThresholdsConfig::default(),
        }
    }
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            utilization: true,
            sessions: true,
            disk_activity: true,
            cluster_faults: true,
        }
    }
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            utilization_warning_percent: default_utilization_warning_percent(),
            utilization_critical_percent: default_utilization_critical_percent(),
            sessions_per_node: default_sessions_per_node(),
            session_headroom: default_session_headroom(),
            session_warning_ratio: default_session_warning_ratio(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("unable to parse YAML in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl ProbeConfig {
    /// Loads the file named by `SFCHECK_CONFIG`, or the built-in defaults when
    /// the variable is unset.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load_from_file(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let path_display = path_ref.display().to_string();
        let text = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_display.clone(),
            source,
        })?;

        let cfg: ProbeConfig = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path_display,
            source,
        })?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_version.trim().is_empty() {
            return Err(ConfigError::Validation(
                "api_version must not be empty".to_string(),
            ));
        }
        if self.request_timeout_secs < 1 {
            return Err(ConfigError::Validation(
                "request_timeout_secs must be >= 1".to_string(),
            ));
        }
        if self.state_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "state_dir must not be empty".to_string(),
            ));
        }
        if !(20..=200).contains(&self.table_width) || self.table_width % 2 != 0 {
            return Err(ConfigError::Validation(
                "table_width must be an even number in 20..200".to_string(),
            ));
        }

        validate_thresholds(&self.thresholds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn validate_thresholds(cfg: &ThresholdsConfig) -> Result<(), ConfigError> {
    let percent = 0.0..=100.0;
    if !percent.contains(&cfg.utilization_warning_percent)
        || !percent.contains(&cfg.utilization_critical_percent)
    {
        return Err(ConfigError::Validation(
            "utilization thresholds must be in 0..100".to_string(),
        ));
    }
    if cfg.utilization_warning_percent >= cfg.utilization_critical_percent {
        return Err(ConfigError::Validation(format!(
            "utilization_warning_percent ({}) must be below utilization_critical_percent ({})",
            cfg.utilization_warning_percent, cfg.utilization_critical_percent
        )));
    }
    if cfg.sessions_per_node < 1 {
        return Err(ConfigError::Validation(
            "sessions_per_node must be >= 1".to_string(),
        ));
    }
    if !(cfg.session_headroom > 0.0 && cfg.session_headroom <= 1.0) {
        return Err(ConfigError::Validation(
            "session_headroom must be in (0, 1]".to_string(),
        ));
    }
    if !(cfg.session_warning_ratio > 0.0 && cfg.session_warning_ratio <= 1.0) {
        return Err(ConfigError::Validation(
            "session_warning_ratio must be in (0, 1]".to_string(),
        ));
    }

    Ok(())
}

fn default_api_version() -> String {
    "11.0".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    10
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("/tmp")
}

const fn default_table_width() -> usize {
    60
}

const fn default_enabled() -> bool {
    true
}

const fn default_utilization_warning_percent() -> f64 {
    80.0
}

const fn default_utilization_critical_percent() -> f64 {
    90.0
}

const fn default_sessions_per_node() -> u32 {
    700
}

const fn default_session_headroom() -> f64 {
    0.90
}

const fn default_session_warning_ratio() -> f64 {
    0.80
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let cfg = ProbeConfig::default();
        cfg.validate().expect("default config must validate");
        assert_eq!(cfg.api_version, "11.0");
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
        assert!(cfg.checks.disk_activity && cfg.checks.cluster_faults);
    }

    #[test]
    fn example_file_parses_to_defaults() {
        let cfg: ProbeConfig = serde_yaml::from_str(include_str!("../config.yaml.example"))
            .expect("example config must parse");
        cfg.validate().expect("example config must validate");
        assert_eq!(cfg.table_width, 60);
        assert_eq!(cfg.thresholds.sessions_per_node, 700);
        assert_eq!(cfg.state_dir, PathBuf::from("/tmp"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "checks:\n  disk_activity: false\nstate_dir: /var/tmp/sfcheck")
            .expect("write config");

        let cfg = ProbeConfig::load_from_file(file.path()).expect("config must load");
        assert!(!cfg.checks.disk_activity);
        assert!(cfg.checks.utilization);
        assert_eq!(cfg.state_dir, PathBuf::from("/var/tmp/sfcheck"));
        assert_eq!(cfg.thresholds.utilization_critical_percent, 90.0);
    }

    #[test]
    fn inverted_utilization_thresholds_are_rejected() {
        let mut cfg = ProbeConfig::default();
        cfg.thresholds.utilization_warning_percent = 95.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn odd_table_width_is_rejected() {
        let cfg = ProbeConfig {
            table_width: 61,
            ..ProbeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_reports_read_error() {
        let err = ProbeConfig::load_from_file("/nonexistent/sfcheck.yaml")
            .expect_err("missing file must fail");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
