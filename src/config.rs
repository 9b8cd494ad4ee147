use std::time::Duration;

use anyhow::{ensure, Context, Result};

pub const DEPTH_VAR: &str = "SALMON_DEPTH";
pub const MOVETIME_VAR: &str = "SALMON_MOVETIME_MS";
pub const TABLE_CAPACITY_VAR: &str = "SALMON_TABLE_CAPACITY";

/// Search tuning knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Plies searched below the root
    pub max_depth: u32,
    /// Wall-clock budget; once spent, the best result found so far is returned
    pub max_time: Duration,
    pub table_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_time: Duration::from_secs(5),
            table_capacity: 100_000,
        }
    }
}

impl SearchConfig {
    /// Defaults overridden by `SALMON_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(DEPTH_VAR) {
            config.max_depth = raw
                .trim()
                .parse()
                .with_context(|| format!("{DEPTH_VAR} must be a whole number, got {raw:?}"))?;
        }
        if let Some(raw) = lookup(MOVETIME_VAR) {
            let millis: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{MOVETIME_VAR} must be milliseconds, got {raw:?}"))?;
            config.max_time = Duration::from_millis(millis);
        }
        if let Some(raw) = lookup(TABLE_CAPACITY_VAR) {
            config.table_capacity = raw.trim().parse().with_context(|| {
                format!("{TABLE_CAPACITY_VAR} must be a whole number, got {raw:?}")
            })?;
        }
        ensure!(config.max_depth > 0, "{DEPTH_VAR} must be at least 1");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let config = SearchConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = SearchConfig::from_lookup(lookup(&[
            (DEPTH_VAR, "4"),
            (MOVETIME_VAR, " 250 "),
            (TABLE_CAPACITY_VAR, "10"),
        ]))
        .unwrap();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.max_time, Duration::from_millis(250));
        assert_eq!(config.table_capacity, 10);
    }

    #[test]
    fn zero_depth_is_rejected() {
        let err = SearchConfig::from_lookup(lookup(&[(DEPTH_VAR, "0")])).unwrap_err();
        assert!(err.to_string().contains(DEPTH_VAR));
    }

    #[test]
    fn malformed_value_names_the_variable() {
        let err = SearchConfig::from_lookup(lookup(&[(DEPTH_VAR, "deep")])).unwrap_err();
        assert!(err.to_string().contains(DEPTH_VAR));
    }
}
