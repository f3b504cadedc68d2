//! Build command: write feed and sitemap files.

use crate::{
    config::SiteConfig,
    content::ContentStore,
    generator::{
        feed::{FeedBuilder, RequestContext, rss::write_rss},
        sitemap::write_sitemap,
    },
    log,
};
use anyhow::{Context, Result};
use std::fs;

/// Build the feed once, then write rss and sitemap in parallel.
pub fn build_site(config: &SiteConfig, store: &dyn ContentStore) -> Result<()> {
    if !config.feed.enable && !config.sitemap.enable {
        log!("build"; "rss and sitemap are both disabled, nothing to do");
        return Ok(());
    }

    let feed = FeedBuilder::new(store, config)
        .build(&RequestContext::from_config(config))
        .context("Failed to build feed")?;

    let output = &config.build.output;
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory {}", output.display()))?;

    let (rss_result, sitemap_result) = rayon::join(
        || config.feed.enable.then(|| write_rss(config, &feed)).transpose(),
        || config.sitemap.enable.then(|| write_sitemap(config, &feed)).transpose(),
    );
    rss_result?;
    sitemap_result?;

    log!(
        "build";
        "{} post{} -> {}",
        feed.items.len(),
        if feed.items.len() == 1 { "" } else { "s" },
        output.display()
    );
    Ok(())
}
