//! Site configuration management for `blogfeed.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                    |
//! |-------------|--------------------------------------------|
//! | `[site]`    | Site URL and base path                     |
//! | `[content]` | Content root and blog collection           |
//! | `[feed]`    | RSS channel (title, description, language) |
//! | `[sitemap]` | Sitemap generation                         |
//! | `[build]`   | Output directory, minification             |
//! | `[serve]`   | Development server (interface, port)       |

pub mod section;
pub mod types;

pub use section::{
    BuildConfig, ContentConfig, DEFAULT_SITE_URL, FeedConfig, ServeConfig, SiteSectionConfig,
    SitemapConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{BuildArgs, Cli, Commands},
    debug, log,
    utils::path::{find_upward, normalize_path},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing blogfeed.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub site: SiteSectionConfig,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub sitemap: SitemapConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. The project root
    /// is the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let config_path = find_upward(&cwd, &cli.config)
            .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;

        config.config_path = normalize_path(&config_path);
        let root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(cwd);
        config.finalize(cli, &root);
        debug!("config"; "loaded {}", config.config_path.display());

        // After finalize so CLI overrides are checked as well
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Set root, apply CLI overrides and resolve directories against root.
    fn finalize(&mut self, cli: &Cli, root: &Path) {
        let root = normalize_path(root);

        Self::update_option(&mut self.content.dir, cli.content.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());
        self.apply_command_options(cli);

        self.content.dir = normalize_path(&root.join(&self.content.dir));
        self.build.output = normalize_path(&root.join(&self.build.output));
        // feed.path and sitemap.path stay relative to the output directory
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build { build_args } => {
                self.apply_build_args(build_args);
            }
            Commands::Serve {
                build_args,
                interface,
                port,
            } => {
                self.apply_build_args(build_args);
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
            }
            Commands::Query { args } => {
                if let Some(ref url) = args.site_url {
                    self.site.url = Some(url.clone());
                }
            }
        }
    }

    /// Apply build arguments from CLI.
    fn apply_build_args(&mut self, args: &BuildArgs) {
        Self::update_option(&mut self.build.minify, args.minify.as_ref());
        Self::update_option(&mut self.feed.enable, args.rss.as_ref());
        Self::update_option(&mut self.sitemap.enable, args.sitemap.as_ref());

        if let Some(ref url) = args.site_url {
            self.site.url = Some(url.clone());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate all sections.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.content.validate(&mut diag);
        self.feed.validate(&mut diag);
        self.sitemap.validate(&mut diag);

        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("blogfeed.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let result = SiteConfig::parse_with_ignored("[site\nurl = \"x\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_site_config_default() {
        let config = SiteConfig::default();

        assert_eq!(config.config_path, PathBuf::new());
        assert!(config.site.url.is_none());
        assert_eq!(config.content.collection, "blog");
        assert!(config.feed.enable);
        assert!(!config.build.minify);
        assert_eq!(config.serve.port, 4321);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[feed]\ntitle = \"Test\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = SiteConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.feed.title, "Test");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let (_, ignored) = SiteConfig::parse_with_ignored("[site]\nbase = \"/\"").unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_validate_reports_every_section() {
        let config = test_parse_config(
            "[site]\nurl = \"nope\"\n[feed]\ntitle = \"\"\n[sitemap]\npath = \"/sitemap.xml\"",
        );
        let Err(ConfigError::Diagnostics(diag)) = config.validate() else {
            panic!("expected diagnostics");
        };
        assert_eq!(diag.len(), 3);
    }

    #[test]
    fn test_finalize_resolves_paths_and_overrides() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "[content]\ndir = \"posts\"\n[build]\noutput = \"public\"");

        let cli = Cli::parse_from([
            "blogfeed",
            "--output",
            "out",
            "build",
            "--site-url",
            "https://example.com",
            "--minify",
        ]);
        let mut config = SiteConfig::from_path(&path).unwrap();
        config.finalize(&cli, dir.path());

        let root = normalize_path(dir.path());
        assert_eq!(config.content.dir, root.join("posts"));
        assert_eq!(config.build.output, root.join("out"));
        assert_eq!(config.site.url.as_deref(), Some("https://example.com"));
        assert!(config.build.minify);
    }

    #[test]
    fn test_serve_overrides() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "");

        let cli = Cli::parse_from(["blogfeed", "serve", "--port", "9000", "--rss", "false"]);
        let mut config = SiteConfig::from_path(&path).unwrap();
        config.finalize(&cli, dir.path());

        assert_eq!(config.serve.port, 9000);
        assert!(!config.feed.enable);
        assert!(config.sitemap.enable);
    }
}
