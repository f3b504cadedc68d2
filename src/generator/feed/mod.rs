//! Feed assembly.
//!
//! [`FeedBuilder`] turns a content collection into a [`FeedDescriptor`]:
//! drafts removed, newest first, one [`FeedItem`] per post. Encoding the
//! descriptor is left to a [`FeedSerializer`] (RSS 2.0 via the `rss` crate).

mod builder;
pub mod rss;

pub use builder::FeedBuilder;

use crate::{
    config::{DEFAULT_SITE_URL, SiteConfig},
    content::ContentError,
    utils::date::DateTimeUtc,
};
use serde::{Serialize, Serializer};
use std::sync::LazyLock;
use thiserror::Error;
use url::Url;

/// Site used when a request carries none.
pub static DEFAULT_SITE: LazyLock<Url> =
    LazyLock::new(|| Url::parse(DEFAULT_SITE_URL).expect("default site URL is valid"));

/// One published post as it appears in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    pub pub_date: DateTimeUtc,
    /// Site-relative path of the post page, `{link_prefix}{slug}/`.
    pub link: String,
    /// Copied from the entry's tags, order preserved.
    pub categories: Vec<String>,
}

/// Channel metadata plus items, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedDescriptor {
    pub title: String,
    pub description: String,
    #[serde(serialize_with = "serialize_url")]
    pub site: Url,
    pub items: Vec<FeedItem>,
    pub language: String,
}

fn serialize_url<S: Serializer>(url: &Url, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(url.as_str())
}

/// Per-invocation input of the builder.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Absolute site URL; `None` falls back to [`DEFAULT_SITE`].
    pub site: Option<Url>,
}

impl RequestContext {
    pub fn from_config(config: &SiteConfig) -> Self {
        config
            .site
            .parsed_url()
            .map_or_else(Self::default, Self::with_site)
    }

    pub fn with_site(site: Url) -> Self {
        Self { site: Some(site) }
    }

    /// The site URL this request resolves to.
    pub fn site(&self) -> Url {
        self.site.clone().unwrap_or_else(|| DEFAULT_SITE.clone())
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("content collection `{collection}` is unavailable")]
    CollectionUnavailable {
        collection: String,
        #[source]
        source: ContentError,
    },

    #[error("failed to serialize feed: {0}")]
    SerializationFailure(String),
}

/// Encodes a descriptor into a syndication document.
pub trait FeedSerializer {
    /// HTTP `Content-Type` of the rendered document.
    fn content_type(&self) -> &'static str;

    fn render(&self, feed: &FeedDescriptor) -> Result<String, FeedError>;
}
