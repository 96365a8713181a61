//! Configuration Module
//!
//! Handles loading and managing store configuration from environment variables.

use std::env;

/// Environment variable holding the default TTL in seconds.
pub const DEFAULT_TTL_VAR: &str = "MEMO_CACHE_DEFAULT_TTL";

/// Store configuration parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// TTL in seconds applied to raw values written without an explicit TTL.
    /// `None` means such entries never expire.
    pub default_ttl: Option<u64>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMO_CACHE_DEFAULT_TTL` - Default TTL in seconds (default: none)
    pub fn from_env() -> Self {
        Self {
            default_ttl: env::var(DEFAULT_TTL_VAR)
                .ok()
                .and_then(|v| v.trim().parse().ok()),
        }
    }

    /// Returns a copy of this config with the given default TTL.
    pub fn with_default_ttl(mut self, ttl_seconds: u64) -> Self {
        self.default_ttl = Some(ttl_seconds);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.default_ttl, None);
    }

    #[test]
    fn test_config_with_default_ttl() {
        let config = Config::default().with_default_ttl(30);
        assert_eq!(config.default_ttl, Some(30));
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the variable so parallel tests don't race on it
        env::remove_var(DEFAULT_TTL_VAR);
        assert_eq!(Config::from_env().default_ttl, None);

        env::set_var(DEFAULT_TTL_VAR, "120");
        assert_eq!(Config::from_env().default_ttl, Some(120));

        env::set_var(DEFAULT_TTL_VAR, "soon");
        assert_eq!(Config::from_env().default_ttl, None);

        env::remove_var(DEFAULT_TTL_VAR);
    }
}
