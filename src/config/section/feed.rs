//! `[feed]` section configuration.
//!
//! ```toml
//! [feed]
//! enable = true
//! path = "rss.xml"                 # Output path / served route
//! title = "haloy.tech - Developer Tips & Tricks"
//! description = "Practical solutions for developers"
//! language = "en-us"
//! link_prefix = "/blog/"           # Item link = {link_prefix}{slug}/
//! ```

use crate::{
    config::{ConfigDiagnostics, FieldPath},
    utils::path::is_contained_file_path,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Enable feed generation.
    pub enable: bool,
    /// Output path for the feed file, relative to the output directory.
    pub path: PathBuf,
    /// Channel title.
    pub title: String,
    /// Channel description.
    pub description: String,
    /// Channel language code.
    pub language: String,
    /// Path prefix of post pages.
    pub link_prefix: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: "rss.xml".into(),
            title: "haloy.tech - Developer Tips & Tricks".into(),
            description: "Practical solutions for developers".into(),
            language: "en-us".into(),
            link_prefix: "/blog/".into(),
        }
    }
}

impl FeedConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (field, value) in [
            (FieldPath::new("feed.title"), &self.title),
            (FieldPath::new("feed.description"), &self.description),
            (FieldPath::new("feed.language"), &self.language),
        ] {
            if value.trim().is_empty() {
                diag.error(field, "must not be empty");
            }
        }

        if !self.link_prefix.starts_with('/') || !self.link_prefix.ends_with('/') {
            diag.error_with_hint(
                FieldPath::new("feed.link_prefix"),
                format!("'{}' must start and end with '/'", self.link_prefix),
                "e.g. \"/blog/\"",
            );
        }

        if !is_contained_file_path(&self.path) {
            diag.error_with_hint(
                FieldPath::new("feed.path"),
                format!("'{}' must be a relative file path without '..'", self.path.display()),
                "e.g. \"rss.xml\"",
            );
        }
    }
}
