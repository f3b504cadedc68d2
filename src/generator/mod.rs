//! Content generators for static site output.
//!
//! Generates files from the blog collection:
//!
//! - **Feed**: RSS 2.0 feed for blog readers (`rss.xml`)
//! - **Sitemap**: Search engine indexing (`sitemap.xml`)
//!
//! Both render from the same [`feed::FeedDescriptor`], so drafts and
//! ordering are decided once by the feed builder.

pub mod feed;
pub mod sitemap;

use std::borrow::Cow;

/// Minify XML content if enabled.
///
/// Only whitespace between a `>` and the next `<` is removed. Text content,
/// including its newlines, is left as written.
pub fn minify_xml(content: &str, enabled: bool) -> Cow<'_, str> {
    if !enabled {
        return Cow::Borrowed(content);
    }

    let mut out = String::with_capacity(content.len());
    let mut rest = content.trim_start();

    while let Some(pos) = rest.find('>') {
        let (head, tail) = rest.split_at(pos + 1);
        out.push_str(head);

        let trimmed = tail.trim_start();
        rest = if trimmed.is_empty() || trimmed.starts_with('<') {
            trimmed
        } else {
            tail
        };
    }
    out.push_str(rest);

    Cow::Owned(out)
}
