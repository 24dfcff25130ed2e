//! Governance instance settings with TOML file support.

use crate::capability::CapabilityKey;
use crate::config::{GovernanceConfig, DEFAULT_VOTING_DURATION_SECS};
use crate::error::GovernanceError;
use quorum_types::AccountAddress;
use quorum_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to stand up one governance instance.
///
/// Loaded from TOML via [`GovernanceSettings::from_toml_file`] or built
/// programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceSettings {
    /// The module's own system identity.
    pub system_identity: AccountAddress,

    /// Label of the system identity's capability in the registry.
    #[serde(default = "default_capability_label")]
    pub system_capability_label: String,

    /// Description of the system identity's capability in the registry.
    #[serde(default = "default_capability_description")]
    pub system_capability_description: String,

    /// Name of the membership credential collection.
    #[serde(default = "default_collection")]
    pub membership_collection: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Initial governance parameters. Kept last so it serializes as a trailing table.
    #[serde(default)]
    pub governance: ConfigSection,
}

/// The `[governance]` table.
///
/// TOML integers are 64-bit, so the threshold is widened to `u128` on load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSection {
    #[serde(default = "default_minimum_voting_threshold")]
    pub minimum_voting_threshold: u64,
    #[serde(default = "default_voting_duration_seconds")]
    pub voting_duration_seconds: u64,
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            minimum_voting_threshold: default_minimum_voting_threshold(),
            voting_duration_seconds: default_voting_duration_seconds(),
        }
    }
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_capability_label() -> String {
    "governance".to_string()
}

fn default_capability_description() -> String {
    "system identity".to_string()
}

fn default_collection() -> String {
    "quorum-members".to_string()
}

fn default_minimum_voting_threshold() -> u64 {
    1
}

fn default_voting_duration_seconds() -> u64 {
    DEFAULT_VOTING_DURATION_SECS
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GovernanceSettings {
    /// Settings with every optional field at its default.
    pub fn new(system_identity: AccountAddress) -> Self {
        Self {
            system_identity,
            system_capability_label: default_capability_label(),
            system_capability_description: default_capability_description(),
            membership_collection: default_collection(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            governance: ConfigSection::default(),
        }
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, GovernanceError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GovernanceError::Settings(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate settings.
    pub fn from_toml_str(s: &str) -> Result<Self, GovernanceError> {
        let settings: Self =
            toml::from_str(s).map_err(|e| GovernanceError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String, GovernanceError> {
        toml::to_string_pretty(self).map_err(|e| GovernanceError::Settings(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), GovernanceError> {
        self.initial_config().validate()?;
        self.log_format()?;
        Ok(())
    }

    pub fn initial_config(&self) -> GovernanceConfig {
        GovernanceConfig::new(
            u128::from(self.governance.minimum_voting_threshold),
            self.governance.voting_duration_seconds,
        )
    }

    pub fn system_capability_key(&self) -> CapabilityKey {
        CapabilityKey::new(
            self.system_capability_label.clone(),
            self.system_capability_description.clone(),
        )
    }

    pub fn log_format(&self) -> Result<LogFormat, GovernanceError> {
        self.log_format.parse().map_err(GovernanceError::Settings)
    }

    /// Install the global tracing subscriber with the configured format and level.
    pub fn init_logging(&self) -> Result<(), GovernanceError> {
        quorum_utils::init_logging(self.log_format()?, &self.log_level)
            .map_err(|e| GovernanceError::Settings(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let settings = GovernanceSettings::from_toml_str(r#"system_identity = "0x5E""#).unwrap();
        assert_eq!(settings.system_identity, AccountAddress::new("0x5e"));
        assert_eq!(settings.initial_config(), GovernanceConfig::default());
        assert_eq!(
            settings.system_capability_key(),
            CapabilityKey::new("governance", "system identity")
        );
        assert_eq!(settings.log_format().unwrap(), LogFormat::Human);
    }

    #[test]
    fn test_full_toml() {
        let toml = r#"
            system_identity = "0xda0"
            system_capability_label = "dao"
            system_capability_description = "root signer v2"
            membership_collection = "guild"
            log_format = "json"
            log_level = "debug"

            [governance]
            minimum_voting_threshold = 3
            voting_duration_seconds = 600
        "#;
        let settings = GovernanceSettings::from_toml_str(toml).unwrap();
        assert_eq!(settings.initial_config(), GovernanceConfig::new(3, 600));
        assert_eq!(settings.membership_collection, "guild");
        assert_eq!(settings.log_format().unwrap(), LogFormat::Json);
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(matches!(
            GovernanceSettings::from_toml_str("system_identity = \"nope\""),
            Err(GovernanceError::Settings(_))
        ));
        assert!(matches!(
            GovernanceSettings::from_toml_str(
                "system_identity = \"0x1\"\n[governance]\nvoting_duration_seconds = 0\n"
            ),
            Err(GovernanceError::InvalidConfig(_))
        ));
        assert!(matches!(
            GovernanceSettings::from_toml_str("system_identity = \"0x1\"\nlog_format = \"xml\"\n"),
            Err(GovernanceError::Settings(_))
        ));
    }

    #[test]
    fn test_init_logging_installs_once() {
        let settings = GovernanceSettings::from_toml_str(
            "system_identity = \"0x5e\"\nlog_format = \"json\"\nlog_level = \"warn\"\n",
        )
        .unwrap();
        let _ = settings.init_logging();
        assert!(matches!(
            settings.init_logging(),
            Err(GovernanceError::Settings(_))
        ));

        let mut bad = settings.clone();
        bad.log_format = "xml".to_string();
        assert!(matches!(bad.init_logging(), Err(GovernanceError::Settings(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let settings = GovernanceSettings::new(AccountAddress::new("0xabc"));
        let text = settings.to_toml_string().unwrap();
        assert_eq!(GovernanceSettings::from_toml_str(&text).unwrap(), settings);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "system_identity = \"0x5e\"").unwrap();
        writeln!(file, "[governance]").unwrap();
        writeln!(file, "minimum_voting_threshold = 2").unwrap();
        let settings = GovernanceSettings::from_toml_file(file.path()).unwrap();
        assert_eq!(settings.initial_config().minimum_voting_threshold, 2);

        assert!(matches!(
            GovernanceSettings::from_toml_file("/definitely/not/here.toml"),
            Err(GovernanceError::Settings(_))
        ));
    }
}
