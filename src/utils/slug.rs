//! Slug generation for collection entry ids.
//!
//! Each path segment is slugified on its own:
//!
//! - lowercase
//! - whitespace becomes `-`
//! - punctuation other than `-` and `_` is dropped
//! - Unicode letters and digits are kept

use std::path::{Component, Path};

/// Slugify a single path segment.
pub fn slugify(segment: &str) -> String {
    segment
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .filter_map(|c| match c {
            c if c.is_whitespace() => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

/// Build an entry slug from a path relative to the collection root.
///
/// The extension is stripped and segments are joined with `/`:
/// `Getting Started/Hello World.md` → `getting-started/hello-world`.
///
/// A trailing `index` names its directory, so `my-post/index.md` → `my-post`.
/// A root `index.md` stays `index`.
pub fn slug_from_relative_path(path: &Path) -> String {
    let stem = path.with_extension("");
    let mut segments: Vec<String> = stem
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(slugify(&s.to_string_lossy())),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect();

    if segments.len() > 1 && segments.last().is_some_and(|s| s == "index") {
        segments.pop();
    }

    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("rust_tips-01"), "rust_tips-01");
        assert_eq!(slugify("What's new?"), "whats-new");
    }

    #[test]
    fn test_slugify_keeps_unicode() {
        assert_eq!(slugify("Über Café"), "über-café");
        assert_eq!(slugify("你好 世界"), "你好-世界");
    }

    #[test]
    fn test_slug_from_relative_path() {
        assert_eq!(slug_from_relative_path(Path::new("first-post.md")), "first-post");
        assert_eq!(
            slug_from_relative_path(Path::new("Guides/Hello World.mdx")),
            "guides/hello-world"
        );
    }

    #[test]
    fn test_slug_drops_trailing_index() {
        assert_eq!(slug_from_relative_path(Path::new("my-post/index.md")), "my-post");
        assert_eq!(
            slug_from_relative_path(Path::new("Guides/Deploys/Index.mdx")),
            "guides/deploys"
        );
        assert_eq!(slug_from_relative_path(Path::new("index.md")), "index");
        assert_eq!(
            slug_from_relative_path(Path::new("index/intro.md")),
            "index/intro"
        );
    }
}
