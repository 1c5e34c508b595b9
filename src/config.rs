//! Knowledge base configuration

use serde::{Deserialize, Serialize};

/// Configuration for a [`KnowledgeBase`](crate::KnowledgeBase)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KbConfig {
    /// Maximum number of inference tasks processed per fix-point run
    /// (0 = unlimited)
    pub max_steps: usize,
    /// During retraction, also drop justification pairs whose rule's first
    /// antecedent still unifies with the retracted statement.
    ///
    /// This reproduces the original engine's behavior. It can remove a
    /// justification that is logically independent but syntactically
    /// coincidental; disable it for stricter pruning.
    pub prune_matching_support: bool,
}

impl Default for KbConfig {
    fn default() -> Self {
        Self {
            max_steps: 10_000,
            prune_matching_support: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KbConfig::default();
        assert_eq!(config.max_steps, 10_000);
        assert!(config.prune_matching_support);
    }

    #[test]
    fn test_config_fields_default_when_absent() {
        let config: KbConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_steps, 10_000);
        assert!(config.prune_matching_support);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = KbConfig {
            max_steps: 0,
            prune_matching_support: false,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: KbConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_steps, 0);
        assert!(!back.prune_matching_support);
    }
}
