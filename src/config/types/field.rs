//! Config field path.

/// Dotted path of a config field, as written in `blogfeed.toml`.
///
/// ```ignore
/// const URL: FieldPath = FieldPath::new("site.url");
/// diag.error(URL, "required");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}
