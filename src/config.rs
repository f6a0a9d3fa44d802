use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Protocol limits enforced at group creation and claim time.
///
/// Durations are block counts on the ledger's logical clock.
#[derive(Debug, Clone)]
pub struct ProtocolLimits {
    pub max_members_cap: u32,
    pub max_name_len: usize,
    pub max_description_len: usize,
    pub grace_period_blocks: u64,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub limits: ProtocolLimits,
    pub snapshot_path: Option<PathBuf>,
    pub snapshot_interval_secs: u64,
    /// When set, the binary ticks the logical block clock at this cadence
    pub block_interval_secs: Option<u64>,
    pub audit_log_dir: Option<PathBuf>,
    pub log_level: String,
    pub environment: String,
}

impl ProtocolLimits {
    /// Create protocol limits from environment variables
    pub fn from_env() -> Result<Self, String> {
        let max_members_cap = env::var("LEDGER_MAX_MEMBERS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(100);

        let max_name_len = env::var("LEDGER_MAX_NAME_LEN")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(64);

        let max_description_len = env::var("LEDGER_MAX_DESCRIPTION_LEN")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(256);

        let grace_period_blocks = env::var("LEDGER_GRACE_PERIOD_BLOCKS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(144);

        // Validate configuration
        if max_members_cap < 2 {
            return Err("LEDGER_MAX_MEMBERS must be at least 2".to_string());
        }

        if max_name_len == 0 {
            return Err("LEDGER_MAX_NAME_LEN must be greater than 0".to_string());
        }

        Ok(Self {
            max_members_cap,
            max_name_len,
            max_description_len,
            grace_period_blocks,
        })
    }
}

impl Default for ProtocolLimits {
    fn default() -> Self {
        Self {
            max_members_cap: 100,
            max_name_len: 64,
            max_description_len: 256,
            grace_period_blocks: 144,
        }
    }
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let limits = ProtocolLimits::from_env()?;

        let snapshot_path = env::var("SNAPSHOT_PATH").ok().map(PathBuf::from);

        let snapshot_interval_secs = env::var("SNAPSHOT_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10);

        let block_interval_secs = env::var("BLOCK_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok());

        let audit_log_dir = env::var("AUDIT_LOG_DIR").ok().map(PathBuf::from);

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        // Validate intervals
        if snapshot_interval_secs == 0 {
            return Err("SNAPSHOT_INTERVAL_SECS must be greater than 0".to_string());
        }

        if block_interval_secs == Some(0) {
            return Err("BLOCK_INTERVAL_SECS must be greater than 0".to_string());
        }

        // Validate log level
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                log_level, valid_log_levels
            ));
        }

        // Validate environment
        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&environment.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid ENVIRONMENT: {}. Must be one of: {:?}",
                environment, valid_environments
            ));
        }

        Ok(Self {
            limits,
            snapshot_path,
            snapshot_interval_secs,
            block_interval_secs,
            audit_log_dir,
            log_level: log_level.to_lowercase(),
            environment: environment.to_lowercase(),
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Get snapshot flush interval as Duration
    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_secs(self.snapshot_interval_secs)
    }

    /// Get block ticker interval as Duration, when configured
    pub fn block_interval(&self) -> Option<Duration> {
        self.block_interval_secs.map(Duration::from_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            limits: ProtocolLimits::default(),
            snapshot_path: None,
            snapshot_interval_secs: 10,
            block_interval_secs: None,
            audit_log_dir: None,
            log_level: "info".to_string(),
            environment: "development".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_limits_default() {
        let limits = ProtocolLimits::default();
        assert_eq!(limits.max_members_cap, 100);
        assert_eq!(limits.max_name_len, 64);
        assert_eq!(limits.grace_period_blocks, 144);
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.snapshot_interval_secs, 10);
        assert!(config.block_interval().is_none());
        assert!(config.is_development());
        assert!(!config.is_production());
    }
}
