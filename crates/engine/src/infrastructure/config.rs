//! Engine configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use veilkeep_domain::{RuleProfile, RuleProfileRegistry};

use super::request_ledger::RequestLedger;

const DEFAULT_SYSTEM_ID: &str = "dnd5e";
const DEFAULT_AUTHORITY_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Host game system, selects the legacy inference profile
    pub system_id: String,
    /// When false, systems without a registered profile never infer
    pub legacy_inference: bool,
    pub authority_timeout: Duration,
    pub ledger_capacity: usize,
    /// Optional JSON world fixture seeded at startup
    pub world_file: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            system_id: DEFAULT_SYSTEM_ID.to_string(),
            legacy_inference: true,
            authority_timeout: Duration::from_millis(DEFAULT_AUTHORITY_TIMEOUT_MS),
            ledger_capacity: RequestLedger::DEFAULT_CAPACITY,
            world_file: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Invalid values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let system_id = get("VEILKEEP_SYSTEM_ID").unwrap_or(defaults.system_id);
        let legacy_inference = parse_or(
            "VEILKEEP_LEGACY_INFERENCE",
            get("VEILKEEP_LEGACY_INFERENCE"),
            defaults.legacy_inference,
        );
        let timeout_ms = parse_or(
            "VEILKEEP_AUTHORITY_TIMEOUT_MS",
            get("VEILKEEP_AUTHORITY_TIMEOUT_MS"),
            DEFAULT_AUTHORITY_TIMEOUT_MS,
        );
        let ledger_capacity = parse_or(
            "VEILKEEP_LEDGER_CAPACITY",
            get("VEILKEEP_LEDGER_CAPACITY"),
            defaults.ledger_capacity,
        );
        let world_file = get("VEILKEEP_WORLD_FILE").map(PathBuf::from);

        Self {
            system_id,
            legacy_inference,
            authority_timeout: Duration::from_millis(timeout_ms),
            ledger_capacity,
            world_file,
        }
    }

    /// Resolve the inference profile for the configured system.
    pub fn rule_profile(&self) -> RuleProfile {
        let mut registry = RuleProfileRegistry::new();
        if !self.legacy_inference {
            registry = registry.with_fallback(RuleProfile::ExplicitOnly);
        }
        let profile = registry.resolve(&self.system_id);
        tracing::info!(
            system_id = %self.system_id,
            profile = profile.name(),
            known_systems = ?registry.list_systems(),
            "Resolved rule profile"
        );
        profile
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Debug,
{
    match raw {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = ?default, "Invalid config value; using default");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> EngineConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config(&[]), EngineConfig::default());
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let config = config(&[
            ("VEILKEEP_AUTHORITY_TIMEOUT_MS", "soon"),
            ("VEILKEEP_LEDGER_CAPACITY", "64"),
            ("VEILKEEP_LEGACY_INFERENCE", "maybe"),
        ]);
        assert_eq!(config.authority_timeout, Duration::from_millis(5000));
        assert_eq!(config.ledger_capacity, 64);
        assert!(config.legacy_inference);
    }

    #[test]
    fn unknown_system_follows_legacy_inference_switch() {
        let inferring = config(&[("VEILKEEP_SYSTEM_ID", "pf2e")]);
        assert_eq!(inferring.rule_profile(), RuleProfile::Dnd5e);

        let explicit = config(&[
            ("VEILKEEP_SYSTEM_ID", "pf2e"),
            ("VEILKEEP_LEGACY_INFERENCE", "false"),
        ]);
        assert_eq!(explicit.rule_profile(), RuleProfile::ExplicitOnly);

        let dnd = config(&[("VEILKEEP_LEGACY_INFERENCE", "false")]);
        assert_eq!(dnd.rule_profile(), RuleProfile::Dnd5e);
    }
}
