//! Configuration to acknowledge user preferences as well as set defaults.
//!
//! Specifically, we try to find a toc-ideator.toml, and if present we load settings from there.
//! This provides file locations, the share URL prefix and preview preferences.

use facet::Facet;
use std::fs;
use std::path::Path;
use tracing::warn;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "toc-ideator.toml";

#[derive(Facet, Clone, Debug, PartialEq, Eq)]
/// User preferences loaded from toc-ideator.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "toc.json".to_string())]
    /// Where the working outline is saved between runs.
    pub outline_path: String,
    #[facet(default = "store".to_string())]
    /// Directory holding published snapshots.
    pub store_dir: String,
    #[facet(default = "share?id=".to_string())]
    /// Prefix the share id is appended to when building share URLs.
    pub share_prefix: String,
    #[facet(default = true)]
    /// Whether the preview shows dotted numbers.
    pub show_numbers: bool,
    #[facet(default = 2)]
    /// Spaces per indentation level in the preview.
    pub indent_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            outline_path: "toc.json".to_string(),
            store_dir: "store".to_string(),
            share_prefix: "share?id=".to_string(),
            show_numbers: true,
            indent_width: 2,
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from toc-ideator.toml if present.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[must_use]
    /// Load configuration from `path`, falling back to defaults if it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };
        match facet_toml::from_str::<Self>(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), "ignoring invalid config: {e}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
