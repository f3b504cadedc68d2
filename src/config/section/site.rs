//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://haloy.tech"   # Canonical site URL (feed channel link)
//! base = "/"                   # Base path the site is served under
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use url::Url;

/// Site URL used when neither config nor CLI provide one.
pub const DEFAULT_SITE_URL: &str = "https://haloy.tech";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Site URL (e.g., "https://example.com").
    pub url: Option<String>,

    /// Base path for served routes (e.g., "/docs/").
    pub base: String,
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            url: None,
            base: "/".into(),
        }
    }
}

impl SiteSectionConfig {
    const URL: FieldPath = FieldPath::new("site.url");
    const BASE: FieldPath = FieldPath::new("site.base");

    /// Parsed site URL, if configured and valid.
    pub fn parsed_url(&self) -> Option<Url> {
        self.url.as_deref().and_then(|s| Url::parse(s).ok())
    }

    /// Base path normalized to start and end with `/`.
    pub fn base_path(&self) -> String {
        let trimmed = self.base.trim_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        }
    }

    /// Validate site configuration.
    ///
    /// # Checks
    /// - `url` must be a valid http(s) URL with a host
    /// - `base` must start with `/`
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(url_str) = &self.url {
            match Url::parse(url_str) {
                Ok(parsed) => {
                    if !matches!(parsed.scheme(), "http" | "https") {
                        diag.error_with_hint(
                            Self::URL,
                            format!(
                                "scheme '{}' not supported, must be http or https",
                                parsed.scheme()
                            ),
                            "use format like https://example.com",
                        );
                    }
                    if parsed.host_str().is_none() {
                        diag.error_with_hint(
                            Self::URL,
                            "URL must have a valid host",
                            "use format like https://example.com",
                        );
                    }
                }
                Err(e) => {
                    diag.error_with_hint(
                        Self::URL,
                        format!("invalid URL: {e}"),
                        "use format like https://example.com",
                    );
                }
            }
        }

        if !self.base.starts_with('/') {
            diag.error_with_hint(
                Self::BASE,
                format!("base path '{}' must start with '/'", self.base),
                format!("use \"/{}\"", self.base),
            );
        }
    }
}
