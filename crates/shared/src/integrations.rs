use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;

/// A social platform whose activity can be aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Integration {
    Reddit,
    Spotify,
    Twitter,
}

impl Integration {
    /// Canonical run order.
    pub const ALL: [Integration; 3] = [
        Integration::Reddit,
        Integration::Twitter,
        Integration::Spotify,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Integration::Reddit => "reddit",
            Integration::Spotify => "spotify",
            Integration::Twitter => "twitter",
        }
    }
}

impl fmt::Display for Integration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Picks the integrations to run from the enabled ones.
///
/// An include list wins over an exclude list. Included integrations run in the order
/// they were given; anything not enabled is skipped with a warning.
pub fn select_integrations(
    enabled: &[Integration],
    include: Option<&[Integration]>,
    exclude: Option<&[Integration]>,
) -> Vec<Integration> {
    if let Some(include) = include.filter(|list| !list.is_empty()) {
        let mut selected = Vec::new();
        for integration in include {
            if !enabled.contains(integration) {
                tracing::warn!(%integration, "integration is not listed in ENABLED_INTEGRATIONS, skipping");
                continue;
            }
            if !selected.contains(integration) {
                selected.push(*integration);
            }
        }
        return selected;
    }

    if let Some(exclude) = exclude.filter(|list| !list.is_empty()) {
        return enabled
            .iter()
            .copied()
            .filter(|integration| !exclude.contains(integration))
            .collect();
    }

    enabled.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENABLED: [Integration; 3] = Integration::ALL;

    #[test]
    fn test_select_all_when_no_flags() {
        assert_eq!(select_integrations(&ENABLED, None, None), ENABLED.to_vec());
    }

    #[test]
    fn test_select_include_keeps_given_order() {
        let include = [Integration::Spotify, Integration::Reddit];
        assert_eq!(
            select_integrations(&ENABLED, Some(&include), None),
            vec![Integration::Spotify, Integration::Reddit]
        );
    }

    #[test]
    fn test_select_include_skips_disabled() {
        let enabled = [Integration::Reddit];
        let include = [Integration::Twitter, Integration::Reddit];
        assert_eq!(
            select_integrations(&enabled, Some(&include), None),
            vec![Integration::Reddit]
        );
    }

    #[test]
    fn test_select_exclude() {
        let exclude = [Integration::Twitter];
        assert_eq!(
            select_integrations(&ENABLED, None, Some(&exclude)),
            vec![Integration::Reddit, Integration::Spotify]
        );
    }

    #[test]
    fn test_select_include_takes_precedence() {
        let include = [Integration::Twitter];
        let exclude = [Integration::Twitter];
        assert_eq!(
            select_integrations(&ENABLED, Some(&include), Some(&exclude)),
            vec![Integration::Twitter]
        );
    }

    #[test]
    fn test_integration_deserializes_lowercase() {
        let parsed: Integration = serde_json::from_str("\"spotify\"").unwrap();
        assert_eq!(parsed, Integration::Spotify);
        assert_eq!(parsed.to_string(), "spotify");
    }
}
