//! Match configurations and pipeline options.
//!
//! Options can be built in code or loaded from TOML/JSON text:
//!
//! ```toml
//! keep_larger_media_queries = true
//! strip_comments = true
//!
//! [[match_configs]]
//! type = "screen"
//! width = "1300px"
//! height = "900px"
//! ```

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CriticalError;
use crate::media::media_match::length_to_px;

/// Media type of a target rendering environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Screen,
    Print,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Screen => "screen",
            MediaType::Print => "print",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-negative length, stored in CSS pixels.
///
/// Deserializes from a bare number (pixels) or a string with a unit, e.g.
/// `"1300px"` or `"80em"`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "LengthRepr")]
pub struct Length(f64);

#[derive(Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Number(f64),
    Text(String),
}

impl Length {
    pub fn px(value: f64) -> Self {
        Self(value)
    }

    pub fn to_px(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

impl FromStr for Length {
    type Err = CriticalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match length_to_px(s) {
            Some(px) if px.is_finite() && px >= 0.0 => Ok(Self(px)),
            _ => Err(CriticalError::invalid_argument(format!(
                "not a valid length: {:?}",
                s
            ))),
        }
    }
}

impl TryFrom<LengthRepr> for Length {
    type Error = CriticalError;

    fn try_from(repr: LengthRepr) -> Result<Self, Self::Error> {
        match repr {
            LengthRepr::Number(px) if px.is_finite() && px >= 0.0 => Ok(Self(px)),
            LengthRepr::Number(px) => Err(CriticalError::invalid_argument(format!(
                "not a valid length: {}",
                px
            ))),
            LengthRepr::Text(text) => text.parse(),
        }
    }
}

/// One target viewport/media environment that media queries are tested
/// against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    #[serde(rename = "type", default)]
    pub media_type: MediaType,
    pub width: Length,
    pub height: Length,
}

impl MatchConfig {
    pub fn screen(width: f64, height: f64) -> Self {
        Self {
            media_type: MediaType::Screen,
            width: Length::px(width),
            height: Length::px(height),
        }
    }

    pub fn print(width: f64, height: f64) -> Self {
        Self {
            media_type: MediaType::Print,
            width: Length::px(width),
            height: Length::px(height),
        }
    }
}

impl fmt::Display for MatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}x{}", self.media_type, self.width, self.height)
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PruneConfig {
    /// Target environments; a media query survives if it matches any.
    #[serde(default = "default_match_configs")]
    pub match_configs: Vec<MatchConfig>,
    /// Keep `min-width`/`min-height` queries aimed at viewports larger than
    /// every configured one.
    #[serde(default)]
    pub keep_larger_media_queries: bool,
    /// Only keep `@font-face` rules whose family was also reported by the
    /// rendering probe.
    #[serde(default)]
    pub require_rendered_fonts: bool,
    /// Remove top-level comments in the postformatting stage.
    #[serde(default = "default_true")]
    pub strip_comments: bool,
}

fn default_match_configs() -> Vec<MatchConfig> {
    vec![MatchConfig::screen(1300.0, 900.0)]
}

fn default_true() -> bool {
    true
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            match_configs: default_match_configs(),
            keep_larger_media_queries: false,
            require_rendered_fonts: false,
            strip_comments: true,
        }
    }
}

impl PruneConfig {
    /// Loads configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(content).context("Invalid critcss TOML configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Loads configuration from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(content).context("Invalid critcss JSON configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects configurations that would silently drop every `@media` block.
    pub fn validate(&self) -> Result<(), CriticalError> {
        if self.match_configs.is_empty() && !self.keep_larger_media_queries {
            return Err(CriticalError::config(
                "at least one match config is required",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_from_units() {
        assert_eq!("1300px".parse::<Length>().unwrap(), Length::px(1300.0));
        assert_eq!("80em".parse::<Length>().unwrap(), Length::px(1280.0));
        assert_eq!("375".parse::<Length>().unwrap(), Length::px(375.0));
        assert!("wide".parse::<Length>().is_err());
        assert!("-5px".parse::<Length>().is_err());
    }

    #[test]
    fn test_match_config_from_json() {
        let cfg: MatchConfig =
            serde_json::from_str(r#"{"type":"print","width":"600px","height":800}"#).unwrap();
        assert_eq!(cfg, MatchConfig::print(600.0, 800.0));
    }

    #[test]
    fn test_match_config_type_defaults_to_screen() {
        let cfg: MatchConfig = serde_json::from_str(r#"{"width":320,"height":480}"#).unwrap();
        assert_eq!(cfg.media_type, MediaType::Screen);
    }

    #[test]
    fn test_prune_config_from_toml() {
        let cfg = PruneConfig::from_toml_str(
            r#"
keep_larger_media_queries = true

[[match_configs]]
type = "screen"
width = "375px"
height = "667px"

[[match_configs]]
width = "1300px"
height = "900px"
"#,
        )
        .unwrap();
        assert!(cfg.keep_larger_media_queries);
        assert!(cfg.strip_comments);
        assert!(!cfg.require_rendered_fonts);
        assert_eq!(cfg.match_configs.len(), 2);
        assert_eq!(cfg.match_configs[0].width, Length::px(375.0));
    }

    #[test]
    fn test_prune_config_defaults() {
        let cfg = PruneConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, PruneConfig::default());
        assert_eq!(cfg.match_configs, vec![MatchConfig::screen(1300.0, 900.0)]);
    }

    #[test]
    fn test_prune_config_rejects_bad_length() {
        let err = PruneConfig::from_json_str(
            r#"{"match_configs":[{"width":"huge","height":"900px"}]}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_prune_config_rejects_empty_configs() {
        let err = PruneConfig::from_toml_str("match_configs = []").unwrap_err();
        assert!(format!("{:#}", err).contains("at least one match config"));
    }
}
