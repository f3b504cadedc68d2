//! Content collections.
//!
//! A collection is a named set of [`ContentEntry`] records (blog posts).
//! The feed builder only depends on the [`ContentStore`] trait; where
//! entries come from is up to the implementation.
//!
//! | Module        | Purpose                                        |
//! |---------------|------------------------------------------------|
//! | `frontmatter` | YAML-like (`---`) and TOML (`+++`) frontmatter |
//! | `store`       | Filesystem-backed [`ContentStore`]             |

pub mod frontmatter;
mod store;

pub use store::FsContentStore;

#[cfg(test)]
pub use store::MemoryStore;

use crate::utils::date::DateTimeUtc;
use frontmatter::FrontmatterError;
use std::path::PathBuf;
use thiserror::Error;

/// One post of a collection.
///
/// Entries are created by the store and only read by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    /// Unique id within the collection (`hello-world`, `guides/setup`).
    pub slug: String,
    pub data: EntryData,
}

/// Validated frontmatter of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryData {
    pub title: String,
    pub description: String,
    pub pub_date: DateTimeUtc,
    /// Tags in frontmatter order.
    pub tags: Vec<String>,
    /// Drafts are never published.
    pub draft: bool,
}

/// Read access to content collections.
pub trait ContentStore: Send + Sync {
    /// Return every entry of the collection `name`, in collection order.
    fn get_collection(&self, name: &str) -> Result<Vec<ContentEntry>, ContentError>;
}

/// Errors raised while enumerating a collection.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to walk collection directory `{0}`")]
    Walk(PathBuf, #[source] jwalk::Error),

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("missing frontmatter in `{0}`")]
    MissingFrontmatter(PathBuf),

    #[error("invalid frontmatter in `{0}`")]
    Frontmatter(PathBuf, #[source] FrontmatterError),

    #[error("invalid entry data in `{0}`: {1}")]
    InvalidData(PathBuf, String),

    #[error("invalid pubDate `{value}` in `{path}`")]
    InvalidDate { path: PathBuf, value: String },

    #[error("duplicate slug `{slug}` in `{first}` and `{second}`")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Build an entry for tests: title/description derive from the slug.
#[cfg(test)]
pub fn test_entry(slug: &str, date: &str, draft: bool) -> ContentEntry {
    ContentEntry {
        slug: slug.to_string(),
        data: EntryData {
            title: format!("Post {slug}"),
            description: format!("About {slug}"),
            pub_date: DateTimeUtc::parse(date).unwrap(),
            tags: vec!["rust".to_string(), slug.to_string()],
            draft,
        },
    }
}
