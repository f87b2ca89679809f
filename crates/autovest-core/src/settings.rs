//! User settings
//!
//! One typed field per option, each validated when loaded.
//!
//! ## Configuration Resolution
//!
//! Settings are loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/autovest/config/settings.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override file keep their default value.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::import::{ImportOptions, DEFAULT_RECURRING_PATTERN};
use crate::models::{RoundUpCap, DEFAULT_MARKET_VOLATILITY};
use crate::scoring::ScoringConfig;

/// Embedded default settings (compiled into binary)
const DEFAULT_SETTINGS: &str = include_str!("../../../config/settings.toml");

/// How much explanation text to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightLevel {
    /// Dashboard summary only
    Basic,
    /// Summary plus health and subscription explanations
    #[default]
    Advanced,
    /// Everything, including the investment explanation
    Full,
}

impl InsightLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
            Self::Full => "full",
        }
    }

    pub fn all() -> &'static [InsightLevel] {
        &[Self::Basic, Self::Advanced, Self::Full]
    }
}

impl std::str::FromStr for InsightLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "advanced" => Ok(Self::Advanced),
            "full" => Ok(Self::Full),
            _ => Err(format!(
                "Unknown insight level: {} (expected basic, advanced or full)",
                s
            )),
        }
    }
}

impl std::fmt::Display for InsightLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Effective settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub currency_symbol: String,
    pub insight_level: InsightLevel,
    pub round_up_cap: RoundUpCap,
    /// Regex over category deciding `is_recurring` for imported rows without the column
    pub recurring_category_pattern: String,
    /// Volatility index for profiles that do not carry one
    pub market_volatility: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            insight_level: InsightLevel::default(),
            round_up_cap: RoundUpCap::default(),
            recurring_category_pattern: DEFAULT_RECURRING_PATTERN.to_string(),
            market_volatility: DEFAULT_MARKET_VOLATILITY,
        }
    }
}

impl Settings {
    /// Load settings from `path`, else the data-dir override, else the defaults
    ///
    /// An explicit `path` must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Settings(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                read_settings(path)?
            }
            None => match default_settings_path() {
                Some(default_path) if default_path.exists() => read_settings(&default_path)?,
                _ => DEFAULT_SETTINGS.to_string(),
            },
        };

        Self::from_toml(&content)
    }

    /// Parse settings from TOML, layering the keys present over the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawSettings = toml::from_str(content)
            .map_err(|e| Error::Settings(format!("Invalid settings TOML: {}", e)))?;

        let mut settings = Settings::default();

        if let Some(display) = raw.display {
            if let Some(symbol) = display.currency_symbol {
                settings.currency_symbol = symbol;
            }
            if let Some(level) = display.insight_level {
                settings.insight_level = level.parse().map_err(Error::Settings)?;
            }
        }

        if let Some(spare_change) = raw.spare_change {
            if let Some(cap) = spare_change.round_up_cap {
                settings.round_up_cap = RoundUpCap::try_from(cap).map_err(Error::Settings)?;
            }
        }

        if let Some(import) = raw.import {
            if let Some(pattern) = import.recurring_category_pattern {
                settings.recurring_category_pattern = pattern;
            }
        }

        if let Some(market) = raw.market {
            if let Some(volatility) = market.volatility {
                settings.market_volatility = volatility;
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.currency_symbol.trim().is_empty() {
            return Err(Error::Settings("currency_symbol must not be empty".into()));
        }
        if !self.market_volatility.is_finite() || !(0.0..=1.0).contains(&self.market_volatility) {
            return Err(Error::Settings(format!(
                "market volatility must be between 0 and 1, got {}",
                self.market_volatility
            )));
        }
        regex::Regex::new(&self.recurring_category_pattern).map_err(|e| {
            Error::Settings(format!("Invalid recurring_category_pattern: {}", e))
        })?;
        Ok(())
    }

    /// Render the effective settings in the same TOML layout they load from
    pub fn to_toml(&self) -> Result<String> {
        let raw = RawSettings {
            display: Some(RawDisplay {
                currency_symbol: Some(self.currency_symbol.clone()),
                insight_level: Some(self.insight_level.to_string()),
            }),
            spare_change: Some(RawSpareChange {
                round_up_cap: Some(self.round_up_cap.into()),
            }),
            import: Some(RawImport {
                recurring_category_pattern: Some(self.recurring_category_pattern.clone()),
            }),
            market: Some(RawMarket {
                volatility: Some(self.market_volatility),
            }),
        };
        toml::to_string(&raw).map_err(|e| Error::Settings(format!("Failed to render settings: {}", e)))
    }

    pub fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            currency_symbol: self.currency_symbol.clone(),
        }
    }

    pub fn import_options(&self) -> Result<ImportOptions> {
        ImportOptions::new(&self.recurring_category_pattern)
    }
}

/// Default settings override path
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("autovest").join("config").join("settings.toml"))
}

fn read_settings(path: &Path) -> Result<String> {
    debug!("Reading settings from {}", path.display());
    fs::read_to_string(path).map_err(|e| {
        Error::Settings(format!("Failed to read {}: {}", path.display(), e))
    })
}

/// Raw settings structure for TOML parsing
#[derive(Debug, Default, Deserialize, Serialize)]
struct RawSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<RawDisplay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    spare_change: Option<RawSpareChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    import: Option<RawImport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    market: Option<RawMarket>,
}

#[derive(Debug, Deserialize, Serialize)]
struct RawDisplay {
    currency_symbol: Option<String>,
    insight_level: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
struct RawSpareChange {
    round_up_cap: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize)]
struct RawImport {
    recurring_category_pattern: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
struct RawMarket {
    volatility: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_default_settings() {
        let settings = Settings::from_toml(DEFAULT_SETTINGS).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.currency_symbol, "₹");
        assert_eq!(settings.insight_level, InsightLevel::Advanced);
        assert_eq!(settings.round_up_cap, RoundUpCap::Ten);
        assert_eq!(settings.market_volatility, 0.15);
    }

    #[test]
    fn test_partial_override() {
        let settings = Settings::from_toml(
            r#"
[display]
currency_symbol = "$"

[spare_change]
round_up_cap = 50
"#,
        )
        .unwrap();

        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.round_up_cap, RoundUpCap::Fifty);
        // Untouched keys keep defaults
        assert_eq!(settings.insight_level, InsightLevel::Advanced);
        assert_eq!(settings.recurring_category_pattern, DEFAULT_RECURRING_PATTERN);
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        let cases = [
            "[spare_change]\nround_up_cap = 25",
            "[display]\ninsight_level = \"verbose\"",
            "[display]\ncurrency_symbol = \"  \"",
            "[market]\nvolatility = 1.5",
            "[import]\nrecurring_category_pattern = \"(unclosed\"",
            "[display\n",
        ];
        for case in cases {
            assert!(
                matches!(Settings::from_toml(case), Err(Error::Settings(_))),
                "accepted: {}",
                case
            );
        }
    }

    #[test]
    fn test_insight_level_parse() {
        assert_eq!("FULL".parse::<InsightLevel>().unwrap(), InsightLevel::Full);
        assert_eq!("basic".parse::<InsightLevel>().unwrap(), InsightLevel::Basic);
        assert!("none".parse::<InsightLevel>().is_err());
        for level in InsightLevel::all() {
            assert_eq!(level.as_str().parse::<InsightLevel>().unwrap(), *level);
        }
    }

    #[test]
    fn test_to_toml_reloads() {
        let settings = Settings {
            currency_symbol: "€".to_string(),
            insight_level: InsightLevel::Full,
            round_up_cap: RoundUpCap::Hundred,
            recurring_category_pattern: "^Bills$".to_string(),
            market_volatility: 0.2,
        };
        let rendered = settings.to_toml().unwrap();
        assert!(rendered.contains("round_up_cap = 100"));
        assert_eq!(Settings::from_toml(&rendered).unwrap(), settings);
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[display]\ninsight_level = \"basic\"").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.insight_level, InsightLevel::Basic);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            Settings::load(Some(&missing)),
            Err(Error::Settings(_))
        ));
    }

    #[test]
    fn test_derived_options() {
        let settings = Settings {
            currency_symbol: "$".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.scoring_config().currency_symbol, "$");

        let options = settings.import_options().unwrap();
        assert!(options.is_recurring_category("Entertainment"));
        assert!(options.is_recurring_category("utilities"));
        assert!(!options.is_recurring_category("Groceries"));
    }
}
