//! `[build]` section configuration.
//!
//! ```toml
//! [build]
//! output = "dist"     # Output directory (relative to site root)
//! minify = false      # Minify generated XML
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build output directory.
    pub output: PathBuf,

    /// Minify XML output.
    pub minify: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: "dist".into(),
            minify: false,
        }
    }
}
