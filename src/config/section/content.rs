//! `[content]` section configuration.
//!
//! ```toml
//! [content]
//! dir = "src/content"      # Content root (relative to site root)
//! collection = "blog"      # Collection the feed is built from
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Content root directory; collections are its subdirectories.
    pub dir: PathBuf,

    /// Name of the collection holding blog posts.
    pub collection: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: "src/content".into(),
            collection: "blog".into(),
        }
    }
}

impl ContentConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let name = self.collection.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            diag.error_with_hint(
                FieldPath::new("content.collection"),
                format!("invalid collection name '{}'", self.collection),
                "use a plain directory name, e.g. \"blog\"",
            );
        }
    }
}
