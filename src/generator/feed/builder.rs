//! Collection to descriptor.

use super::{FeedDescriptor, FeedError, FeedItem, RequestContext};
use crate::{
    config::{FeedConfig, SiteConfig},
    content::{ContentEntry, ContentStore},
    debug,
};

/// Builds a [`FeedDescriptor`] from one collection of a [`ContentStore`].
///
/// Holds no state between calls: every [`build`](Self::build) reads the
/// collection again.
pub struct FeedBuilder<'a> {
    store: &'a dyn ContentStore,
    collection: &'a str,
    channel: &'a FeedConfig,
}

impl<'a> FeedBuilder<'a> {
    pub fn new(store: &'a dyn ContentStore, config: &'a SiteConfig) -> Self {
        Self {
            store,
            collection: &config.content.collection,
            channel: &config.feed,
        }
    }

    /// Read the collection, drop drafts and sort newest first.
    ///
    /// Posts with equal `pub_date` keep collection order.
    pub fn build(&self, ctx: &RequestContext) -> Result<FeedDescriptor, FeedError> {
        let entries = self.store.get_collection(self.collection).map_err(|source| {
            FeedError::CollectionUnavailable {
                collection: self.collection.to_string(),
                source,
            }
        })?;

        let total = entries.len();
        let mut published: Vec<ContentEntry> =
            entries.into_iter().filter(|entry| !entry.data.draft).collect();

        let drafts = total - published.len();
        if drafts > 0 {
            debug!("feed"; "excluded {} draft{}", drafts, if drafts == 1 { "" } else { "s" });
        }

        // stable: equal dates stay in collection order
        published.sort_by(|a, b| b.data.pub_date.cmp(&a.data.pub_date));

        let items = published
            .into_iter()
            .map(|entry| self.to_item(entry))
            .collect();

        Ok(FeedDescriptor {
            title: self.channel.title.clone(),
            description: self.channel.description.clone(),
            site: ctx.site(),
            items,
            language: self.channel.language.clone(),
        })
    }

    fn to_item(&self, entry: ContentEntry) -> FeedItem {
        FeedItem {
            link: format!("{}{}/", self.channel.link_prefix, entry.slug),
            title: entry.data.title,
            description: entry.data.description,
            pub_date: entry.data.pub_date,
            categories: entry.data.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        content::{MemoryStore, test_entry},
        generator::feed::DEFAULT_SITE,
    };
    use url::Url;

    fn blog(entries: Vec<ContentEntry>) -> MemoryStore {
        MemoryStore::with_collection("blog", entries)
    }

    fn slugs(feed: &FeedDescriptor) -> Vec<&str> {
        feed.items
            .iter()
            .map(|item| {
                item.link
                    .strip_prefix("/blog/")
                    .and_then(|s| s.strip_suffix('/'))
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_drafts_excluded_and_sorted_newest_first() {
        let store = blog(vec![
            test_entry("a", "2024-01-01", false),
            test_entry("b", "2024-02-01", true),
            test_entry("c", "2024-03-01", false),
        ]);
        let config = SiteConfig::default();

        let feed = FeedBuilder::new(&store, &config)
            .build(&RequestContext::default())
            .unwrap();

        assert_eq!(slugs(&feed), ["c", "a"]);
    }

    #[test]
    fn test_empty_collection() {
        let store = blog(vec![]);
        let config = SiteConfig::default();

        let feed = FeedBuilder::new(&store, &config)
            .build(&RequestContext::default())
            .unwrap();

        assert!(feed.items.is_empty());
        assert_eq!(feed.title, "haloy.tech - Developer Tips & Tricks");
    }

    #[test]
    fn test_default_site() {
        let store = blog(vec![test_entry("a", "2024-01-01", false)]);
        let config = SiteConfig::default();

        let feed = FeedBuilder::new(&store, &config)
            .build(&RequestContext::default())
            .unwrap();

        assert_eq!(feed.site, *DEFAULT_SITE);
        assert_eq!(feed.site.as_str(), "https://haloy.tech/");
    }

    #[test]
    fn test_site_from_context() {
        let store = blog(vec![]);
        let config = SiteConfig::default();
        let site = Url::parse("https://example.com").unwrap();

        let feed = FeedBuilder::new(&store, &config)
            .build(&RequestContext::with_site(site.clone()))
            .unwrap();

        assert_eq!(feed.site, site);
    }

    #[test]
    fn test_store_failure() {
        let store = MemoryStore::failing();
        let config = SiteConfig::default();

        let err = FeedBuilder::new(&store, &config)
            .build(&RequestContext::default())
            .unwrap_err();

        assert!(matches!(
            err,
            FeedError::CollectionUnavailable { ref collection, .. } if collection == "blog"
        ));
    }

    #[test]
    fn test_channel_fields() {
        let store = blog(vec![]);
        let config = SiteConfig::default();

        let feed = FeedBuilder::new(&store, &config)
            .build(&RequestContext::default())
            .unwrap();

        assert_eq!(feed.description, "Practical solutions for developers");
        assert_eq!(feed.language, "en-us");
    }

    #[test]
    fn test_item_mapping() {
        let store = blog(vec![test_entry("guides/setup", "2024-05-01", false)]);
        let config = SiteConfig::default();

        let feed = FeedBuilder::new(&store, &config)
            .build(&RequestContext::default())
            .unwrap();

        let item = &feed.items[0];
        assert_eq!(item.title, "Post guides/setup");
        assert_eq!(item.description, "About guides/setup");
        assert_eq!(item.link, "/blog/guides/setup/");
        assert_eq!(item.categories, ["rust", "guides/setup"]);
        assert_eq!(item.pub_date.to_date_string(), "2024-05-01");
    }

    #[test]
    fn test_equal_dates_keep_collection_order() {
        let store = blog(vec![
            test_entry("first", "2024-01-01", false),
            test_entry("older", "2023-12-31", false),
            test_entry("second", "2024-01-01", false),
            test_entry("third", "2024-01-01", false),
        ]);
        let config = SiteConfig::default();

        let feed = FeedBuilder::new(&store, &config)
            .build(&RequestContext::default())
            .unwrap();

        assert_eq!(slugs(&feed), ["first", "second", "third", "older"]);
    }

    #[test]
    fn test_dates_non_increasing_without_drafts() {
        let dates = [
            ("p1", "2023-05-01", false),
            ("p2", "2024-11-20T08:00:00Z", true),
            ("p3", "2024-11-20T09:00:00Z", false),
            ("p4", "2021-01-01", false),
            ("p5", "2025-02-14", true),
            ("p6", "2024-11-20", false),
        ];
        let store = blog(
            dates
                .iter()
                .map(|(slug, date, draft)| test_entry(slug, date, *draft))
                .collect(),
        );
        let config = SiteConfig::default();

        let feed = FeedBuilder::new(&store, &config)
            .build(&RequestContext::default())
            .unwrap();

        assert_eq!(feed.items.len(), 4);
        assert!(feed.items.windows(2).all(|w| w[0].pub_date >= w[1].pub_date));
        assert!(!slugs(&feed).iter().any(|s| *s == "p2" || *s == "p5"));
        assert!(feed.items.iter().all(|item| item.link.starts_with("/blog/") && item.link.ends_with('/')));
    }

    #[test]
    fn test_idempotent() {
        let store = blog(vec![
            test_entry("a", "2024-01-01", false),
            test_entry("b", "2024-02-01", false),
        ]);
        let config = SiteConfig::default();
        let builder = FeedBuilder::new(&store, &config);
        let ctx = RequestContext::default();

        assert_eq!(builder.build(&ctx).unwrap(), builder.build(&ctx).unwrap());
    }

    #[test]
    fn test_custom_channel_config() {
        let store = MemoryStore::with_collection("posts", vec![test_entry("x", "2024-01-01", false)]);
        let mut config = SiteConfig::default();
        config.content.collection = "posts".into();
        config.feed.title = "Notes".into();
        config.feed.link_prefix = "/notes/".into();

        let feed = FeedBuilder::new(&store, &config)
            .build(&RequestContext::default())
            .unwrap();

        assert_eq!(feed.title, "Notes");
        assert_eq!(feed.items[0].link, "/notes/x/");
    }
}
