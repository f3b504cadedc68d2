//! Sitemap generation.
//!
//! Lists the site root, the blog index and every published post.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://haloy.tech/blog/hello-world/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::{
    config::SiteConfig,
    generator::{feed::FeedDescriptor, minify_xml},
    log,
};
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::fs;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

pub struct Sitemap {
    urls: Vec<UrlEntry>,
}

struct UrlEntry {
    loc: String,
    lastmod: Option<String>,
}

impl Sitemap {
    /// Collect URLs for `feed`, which already excludes drafts.
    pub fn from_feed(feed: &FeedDescriptor, config: &SiteConfig) -> Self {
        // "https://haloy.tech/" + "/docs/" -> "https://haloy.tech/docs"
        let base = config.site.base_path();
        let prefix = format!(
            "{}{}",
            feed.site.as_str().trim_end_matches('/'),
            base.trim_end_matches('/')
        );

        let mut urls = vec![
            UrlEntry {
                loc: format!("{prefix}/"),
                lastmod: None,
            },
            UrlEntry {
                loc: format!("{prefix}{}", config.feed.link_prefix),
                lastmod: feed.items.first().map(|item| item.pub_date.to_date_string()),
            },
        ];

        urls.extend(feed.items.iter().map(|item| UrlEntry {
            loc: format!("{prefix}{}", item.link),
            lastmod: Some(item.pub_date.to_date_string()),
        }));

        Self { urls }
    }

    pub fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for entry in self.urls {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape_xml(&entry.loc));
            xml.push_str("</loc>\n");
            if let Some(lastmod) = entry.lastmod {
                xml.push_str("    <lastmod>");
                xml.push_str(&lastmod);
                xml.push_str("</lastmod>\n");
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Render the sitemap and write it to `<output>/<sitemap.path>`.
pub fn write_sitemap(config: &SiteConfig, feed: &FeedDescriptor) -> Result<()> {
    let xml = Sitemap::from_feed(feed, config).into_xml();
    let xml = minify_xml(&xml, config.build.minify);
    let sitemap_path = config.build.output.join(&config.sitemap.path);

    if let Some(parent) = sitemap_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&sitemap_path, xml.as_bytes())
        .with_context(|| format!("Failed to write sitemap to {}", sitemap_path.display()))?;

    log!("sitemap"; "{}", sitemap_path.file_name().unwrap_or_default().to_string_lossy());
    Ok(())
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
