//! RSS 2.0 feed generation.

use super::{FeedDescriptor, FeedError, FeedItem, FeedSerializer};
use crate::{config::SiteConfig, generator::minify_xml, log, utils::mime};
use anyhow::{Context, Result};
use rss::{CategoryBuilder, ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};
use std::fs;
use url::Url;

/// Renders a [`FeedDescriptor`] as an RSS 2.0 channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct RssSerializer;

impl FeedSerializer for RssSerializer {
    fn content_type(&self) -> &'static str {
        mime::types::XML
    }

    fn render(&self, feed: &FeedDescriptor) -> Result<String, FeedError> {
        let items: Vec<_> = feed
            .items
            .iter()
            .map(|item| to_rss_item(item, &feed.site))
            .collect::<Result<_, _>>()?;

        let channel = ChannelBuilder::default()
            .title(feed.title.clone())
            .link(feed.site.to_string())
            .description(feed.description.clone())
            .language(Some(feed.language.clone()))
            .generator(Some(concat!("blogfeed ", env!("CARGO_PKG_VERSION")).to_string()))
            .items(items)
            .build();

        channel
            .validate()
            .map_err(|e| FeedError::SerializationFailure(format!("RSS validation failed: {e}")))?;
        Ok(channel.to_string())
    }
}

/// Item links are resolved against the site URL.
fn to_rss_item(item: &FeedItem, site: &Url) -> Result<rss::Item, FeedError> {
    let link = site
        .join(&item.link)
        .map_err(|e| FeedError::SerializationFailure(format!("invalid link `{}`: {e}", item.link)))?
        .to_string();

    let categories = item
        .categories
        .iter()
        .map(|tag| CategoryBuilder::default().name(tag.clone()).build())
        .collect::<Vec<_>>();

    Ok(ItemBuilder::default()
        .title(Some(item.title.clone()))
        .link(Some(link.clone()))
        .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
        .description(Some(item.description.clone()))
        .pub_date(Some(item.pub_date.to_rfc2822()))
        .categories(categories)
        .build())
}

/// Render the feed and write it to `<output>/<feed.path>`.
pub fn write_rss(config: &SiteConfig, feed: &FeedDescriptor) -> Result<()> {
    let xml = RssSerializer.render(feed)?;
    let xml = minify_xml(&xml, config.build.minify);
    let rss_path = config.build.output.join(&config.feed.path);

    if let Some(parent) = rss_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&rss_path, xml.as_bytes())
        .with_context(|| format!("Failed to write feed to {}", rss_path.display()))?;

    log!("rss"; "{}", rss_path.file_name().unwrap_or_default().to_string_lossy());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        content::{MemoryStore, test_entry},
        generator::feed::{FeedBuilder, RequestContext},
    };
    use rss::Channel;
    use tempfile::TempDir;

    fn sample_feed() -> FeedDescriptor {
        let store = MemoryStore::with_collection(
            "blog",
            vec![
                test_entry("older", "2024-01-01", false),
                test_entry("hidden", "2024-06-01", true),
                test_entry("newer", "2024-03-01T10:30:00Z", false),
            ],
        );
        FeedBuilder::new(&store, &SiteConfig::default())
            .build(&RequestContext::default())
            .unwrap()
    }

    fn parse(xml: &str) -> Channel {
        Channel::read_from(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_render_channel() {
        let xml = RssSerializer.render(&sample_feed()).unwrap();
        let channel = parse(&xml);

        assert_eq!(channel.title(), "haloy.tech - Developer Tips & Tricks");
        assert_eq!(channel.description(), "Practical solutions for developers");
        assert_eq!(channel.link(), "https://haloy.tech/");
        assert_eq!(channel.language(), Some("en-us"));
    }

    #[test]
    fn test_render_items() {
        let xml = RssSerializer.render(&sample_feed()).unwrap();
        let channel = parse(&xml);
        let items = channel.items();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title(), Some("Post newer"));
        assert_eq!(items[0].link(), Some("https://haloy.tech/blog/newer/"));
        assert_eq!(items[0].pub_date(), Some("Fri, 01 Mar 2024 10:30:00 GMT"));
        assert_eq!(items[0].description(), Some("About newer"));
        assert_eq!(
            items[0].guid().map(|g| (g.value(), g.is_permalink())),
            Some(("https://haloy.tech/blog/newer/", true))
        );
        let categories: Vec<_> = items[0].categories().iter().map(|c| c.name()).collect();
        assert_eq!(categories, ["rust", "newer"]);
        assert_eq!(items[1].title(), Some("Post older"));
    }

    #[test]
    fn test_render_escapes_markup() {
        let mut feed = sample_feed();
        feed.items[0].title = "<script> & \"quotes\"".into();

        let xml = RssSerializer.render(&feed).unwrap();
        assert!(!xml.contains("<script>"));
        assert_eq!(parse(&xml).items()[0].title(), Some("<script> & \"quotes\""));
    }

    #[test]
    fn test_render_site_with_path() {
        let mut feed = sample_feed();
        feed.site = Url::parse("https://example.com/docs/").unwrap();

        let channel = parse(&RssSerializer.render(&feed).unwrap());
        assert_eq!(channel.link(), "https://example.com/docs/");
        // item links are site-rooted paths
        assert_eq!(channel.items()[0].link(), Some("https://example.com/blog/newer/"));
    }

    #[test]
    fn test_render_empty_feed() {
        let mut feed = sample_feed();
        feed.items.clear();

        let channel = parse(&RssSerializer.render(&feed).unwrap());
        assert!(channel.items().is_empty());
    }

    #[test]
    fn test_content_type() {
        assert_eq!(RssSerializer.content_type(), "application/xml");
    }

    #[test]
    fn test_write_rss() {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.build.output = dir.path().to_path_buf();
        config.build.minify = true;
        config.feed.path = "feeds/rss.xml".into();

        write_rss(&config, &sample_feed()).unwrap();

        let written = fs::read_to_string(dir.path().join("feeds/rss.xml")).unwrap();
        assert!(!written.contains('\n'));
        assert_eq!(parse(&written).items().len(), 2);
    }

    #[test]
    fn test_write_rss_minified_keeps_multiline_text() {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.build.output = dir.path().to_path_buf();
        config.build.minify = true;

        let mut entry = test_entry("multi", "2024-01-01", false);
        entry.data.title = "Title over\ntwo lines".to_string();
        entry.data.description = "line one\nline two\n\n  indented".to_string();
        let store = MemoryStore::with_collection("blog", vec![entry]);
        let feed = FeedBuilder::new(&store, &config)
            .build(&RequestContext::default())
            .unwrap();

        write_rss(&config, &feed).unwrap();

        let written = fs::read_to_string(dir.path().join("rss.xml")).unwrap();
        let channel = parse(&written);
        let item = &channel.items()[0];
        assert_eq!(item.title(), Some("Title over\ntwo lines"));
        assert_eq!(item.description(), Some("line one\nline two\n\n  indented"));
    }
}
