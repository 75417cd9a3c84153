//! Shell configuration loaded from the environment
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use flownet_core::NetworkLimits;

use crate::error::ShellError;

/// Environment variable bounding the vertex count
pub const MAX_VERTICES_VAR: &str = "FLOWNET_MAX_VERTICES";
/// Environment variable bounding the edge count
pub const MAX_EDGES_VAR: &str = "FLOWNET_MAX_EDGES";
/// Environment variable toggling interactive prompts (`0` disables them)
pub const PROMPT_VAR: &str = "FLOWNET_PROMPT";
/// Environment variable holding the default log filter (`RUST_LOG` still wins)
pub const LOG_VAR: &str = "FLOWNET_LOG";

/// Log filter used when neither `RUST_LOG` nor `FLOWNET_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Runtime configuration for the command loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Size limits applied to every network the shell creates
    pub limits: NetworkLimits,
    /// Print prompts before reading input
    pub prompt: bool,
    /// `env_logger` filter directives applied when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            limits: NetworkLimits::default(),
            prompt: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ShellConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ShellError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ShellError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.limits.max_vertices = parse_limit(MAX_VERTICES_VAR, lookup(MAX_VERTICES_VAR))?;
        config.limits.max_edges = parse_limit(MAX_EDGES_VAR, lookup(MAX_EDGES_VAR))?;
        if let Some(value) = lookup(PROMPT_VAR) {
            config.prompt = match value.trim() {
                "1" | "true" | "on" => true,
                "0" | "false" | "off" => false,
                other => return Err(ShellError::Config {
                    key: PROMPT_VAR,
                    reason: format!("expected 0 or 1, found '{}'", other),
                }),
            };
        }
        if let Some(value) = lookup(LOG_VAR) {
            let filter = value.trim();
            if filter.is_empty() {
                return Err(ShellError::Config { key: LOG_VAR, reason: "filter is empty".to_string() });
            }
            config.log_filter = filter.to_string();
        }
        Ok(config)
    }
}

fn parse_limit(key: &'static str, value: Option<String>) -> Result<Option<usize>, ShellError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.trim().parse::<usize>() {
        Ok(0) => Err(ShellError::Config { key, reason: "limit must be positive".to_string() }),
        Ok(limit) => Ok(Some(limit)),
        Err(err) => Err(ShellError::Config { key, reason: format!("'{}': {}", value.trim(), err) }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = ShellConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ShellConfig::default());
        assert_eq!(config.limits.max_vertices, None);
        assert!(config.prompt);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_limits_and_prompt() {
        let config = ShellConfig::from_lookup(lookup(&[
            (MAX_VERTICES_VAR, "100"),
            (MAX_EDGES_VAR, " 500 "),
            (PROMPT_VAR, "0"),
        ])).unwrap();
        assert_eq!(config.limits, NetworkLimits::new(100, 500));
        assert!(!config.prompt);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_log_filter() {
        let config = ShellConfig::from_lookup(lookup(&[(LOG_VAR, " flownet_core=debug,info ")])).unwrap();
        assert_eq!(config.log_filter, "flownet_core=debug,info");

        let err = ShellConfig::from_lookup(lookup(&[(LOG_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, ShellError::Config { key, .. } if key == LOG_VAR));
    }

    #[test]
    fn test_malformed_values() {
        let err = ShellConfig::from_lookup(lookup(&[(MAX_EDGES_VAR, "lots")])).unwrap_err();
        assert!(matches!(err, ShellError::Config { key, .. } if key == MAX_EDGES_VAR));

        let err = ShellConfig::from_lookup(lookup(&[(MAX_VERTICES_VAR, "0")])).unwrap_err();
        assert!(matches!(err, ShellError::Config { key, .. } if key == MAX_VERTICES_VAR));

        assert!(ShellConfig::from_lookup(lookup(&[(PROMPT_VAR, "sometimes")])).is_err());
    }
}
