//! Window-chrome configuration.
//!
//! A [`ChromeConfig`] describes how the window is dressed at creation time:
//! whether the system bars are painted transparent and how the window treats
//! display cutouts. The embedding shell may replace the defaults before the
//! window exists, either from Rust with [`set_chrome_config`] or through the
//! C ABI with a JSON document. Partial documents parse; missing fields take
//! the defaults below.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// How the window lays out relative to a display cutout.
///
/// Maps one-to-one onto the `WindowManager.LayoutParams`
/// `LAYOUT_IN_DISPLAY_CUTOUT_MODE_*` constants. The platform side resolves
/// the constant by name at runtime, so an API level that predates cutouts
/// degrades to a logged skip instead of a hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CutoutMode {
    /// Let the system decide.
    SystemDefault,
    /// Extend into the cutout on short edges only.
    ShortEdges,
    /// Never lay out into the cutout; this adapter owns keeping content
    /// clear of it through padding.
    #[default]
    Never,
    /// Always extend into the cutout.
    Always,
}

impl CutoutMode {
    /// Name of the matching `WindowManager$LayoutParams` constant.
    pub fn constant_name(self) -> &'static str {
        match self {
            CutoutMode::SystemDefault => "LAYOUT_IN_DISPLAY_CUTOUT_MODE_DEFAULT",
            CutoutMode::ShortEdges => "LAYOUT_IN_DISPLAY_CUTOUT_MODE_SHORT_EDGES",
            CutoutMode::Never => "LAYOUT_IN_DISPLAY_CUTOUT_MODE_NEVER",
            CutoutMode::Always => "LAYOUT_IN_DISPLAY_CUTOUT_MODE_ALWAYS",
        }
    }
}

/// Window chrome applied by the creation hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromeConfig {
    /// Paint the status and navigation bars fully transparent.
    #[serde(default = "default_transparent_bars")]
    pub transparent_bars: bool,
    /// Cutout layout mode written into the window attributes.
    #[serde(default)]
    pub cutout_mode: CutoutMode,
}

fn default_transparent_bars() -> bool {
    true
}

impl Default for ChromeConfig {
    fn default() -> Self {
        ChromeConfig {
            transparent_bars: true,
            cutout_mode: CutoutMode::Never,
        }
    }
}

impl ChromeConfig {
    /// Parses a (possibly partial) JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// Pending config for the next window creation. None means defaults.
static CHROME_CONFIG: Mutex<Option<ChromeConfig>> = Mutex::new(None);

/// Replaces the chrome config the next creation hook will apply. Takes
/// effect on the next window creation, not retroactively.
pub fn set_chrome_config(config: ChromeConfig) {
    *CHROME_CONFIG.lock().unwrap_or_else(PoisonError::into_inner) = Some(config);
}

/// The chrome config currently in force.
pub fn chrome_config() -> ChromeConfig {
    CHROME_CONFIG
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_defaults() {
        let config = ChromeConfig::from_json("{}").unwrap();
        assert_eq!(config, ChromeConfig::default());
        assert!(config.transparent_bars);
        assert_eq!(config.cutout_mode, CutoutMode::Never);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = ChromeConfig::from_json(r#"{ "cutout_mode": "short_edges" }"#).unwrap();
        assert_eq!(config.cutout_mode, CutoutMode::ShortEdges);
        assert!(config.transparent_bars);
    }

    #[test]
    fn test_malformed_document_errors() {
        assert!(ChromeConfig::from_json(r#"{ "cutout_mode": "sideways" }"#).is_err());
        assert!(ChromeConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_cutout_mode_constant_names() {
        assert_eq!(
            CutoutMode::Never.constant_name(),
            "LAYOUT_IN_DISPLAY_CUTOUT_MODE_NEVER"
        );
        assert_eq!(
            CutoutMode::ShortEdges.constant_name(),
            "LAYOUT_IN_DISPLAY_CUTOUT_MODE_SHORT_EDGES"
        );
    }

    #[test]
    fn test_config_override_store() {
        let custom = ChromeConfig {
            transparent_bars: false,
            cutout_mode: CutoutMode::Always,
        };
        set_chrome_config(custom);
        assert_eq!(chrome_config(), custom);
        set_chrome_config(ChromeConfig::default());
    }
}
