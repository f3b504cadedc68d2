//! `[sitemap]` section configuration.

use crate::{
    config::{ConfigDiagnostics, FieldPath},
    utils::path::is_contained_file_path,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Enable sitemap generation.
    pub enable: bool,
    /// Output path for sitemap file.
    pub path: PathBuf,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: "sitemap.xml".into(),
        }
    }
}

impl SitemapConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !is_contained_file_path(&self.path) {
            diag.error_with_hint(
                FieldPath::new("sitemap.path"),
                format!("'{}' must be a relative file path without '..'", self.path.display()),
                "e.g. \"sitemap.xml\"",
            );
        }
    }
}
