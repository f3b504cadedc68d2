//! Filesystem-backed content store.
//!
//! Layout: `<root>/<collection>/**/*.{md,mdx}`. Files and directories whose
//! name starts with `_` are not part of the collection.

use super::{
    ContentEntry, ContentError, ContentStore, EntryData,
    frontmatter::{self, JsonMap},
};
use crate::{
    log,
    utils::{date::DateTimeUtc, slug::slug_from_relative_path},
};
use jwalk::WalkDir;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// Extensions treated as collection entries.
const CONTENT_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Reads collections from a content directory on every call.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the collection `name`.
    pub fn collection_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Collect entry files relative to `dir`, in sorted walk order.
    fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, ContentError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir).sort(true) {
            let entry = entry.map_err(|e| ContentError::Walk(dir.to_path_buf(), e))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(dir).unwrap_or(&path).to_path_buf();
            if is_content_file(&relative) && !is_ignored(&relative) {
                files.push(relative);
            }
        }

        Ok(files)
    }

    fn load_entry(dir: &Path, relative: &Path) -> Result<(ContentEntry, PathBuf), ContentError> {
        let path = dir.join(relative);
        let source = fs::read_to_string(&path).map_err(|e| ContentError::Io(path.clone(), e))?;

        let (meta, _body) = frontmatter::extract(&source)
            .map_err(|e| ContentError::Frontmatter(path.clone(), e))?
            .ok_or_else(|| ContentError::MissingFrontmatter(path.clone()))?;

        let raw = RawEntryData::from_meta(meta)
            .map_err(|e| ContentError::InvalidData(path.clone(), e.to_string()))?;

        let pub_date =
            DateTimeUtc::parse(&raw.pub_date).ok_or_else(|| ContentError::InvalidDate {
                path: path.clone(),
                value: raw.pub_date.clone(),
            })?;

        let slug = raw
            .slug
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().trim_matches('/').to_string())
            .unwrap_or_else(|| slug_from_relative_path(relative));

        let entry = ContentEntry {
            slug,
            data: EntryData {
                title: raw.title,
                description: raw.description,
                pub_date,
                tags: raw.tags,
                draft: raw.draft,
            },
        };

        Ok((entry, path))
    }
}

impl ContentStore for FsContentStore {
    fn get_collection(&self, name: &str) -> Result<Vec<ContentEntry>, ContentError> {
        let dir = self.collection_dir(name);
        if !dir.is_dir() {
            log!("content"; "collection `{}` does not exist at {}, treating as empty", name, dir.display());
            return Ok(Vec::new());
        }

        let files = Self::collect_files(&dir)?;
        let mut seen: FxHashMap<String, PathBuf> = FxHashMap::default();
        let mut entries = Vec::with_capacity(files.len());

        for relative in files {
            let (entry, path) = Self::load_entry(&dir, &relative)?;
            if let Some(first) = seen.insert(entry.slug.clone(), path.clone()) {
                return Err(ContentError::DuplicateSlug {
                    slug: entry.slug,
                    first,
                    second: path,
                });
            }
            entries.push(entry);
        }

        Ok(entries)
    }
}

fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| CONTENT_EXTENSIONS.contains(&ext))
}

/// `_`-prefixed files and directories are excluded.
fn is_ignored(relative: &Path) -> bool {
    relative.components().any(|c| match c {
        Component::Normal(name) => name.to_string_lossy().starts_with('_'),
        _ => false,
    })
}

// ============================================================================
// Raw frontmatter schema
// ============================================================================

/// Frontmatter fields before timestamp and slug resolution.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntryData {
    #[serde(deserialize_with = "deserialize_scalar")]
    title: String,
    #[serde(deserialize_with = "deserialize_scalar")]
    description: String,
    #[serde(alias = "date", alias = "pub_date", deserialize_with = "deserialize_scalar")]
    pub_date: String,
    #[serde(default, deserialize_with = "deserialize_tags")]
    tags: Vec<String>,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    slug: Option<String>,
}

impl RawEntryData {
    fn from_meta(meta: JsonMap) -> serde_json::Result<Self> {
        serde_json::from_value(Value::Object(meta))
    }
}

/// Accept strings, numbers and booleans as text.
fn deserialize_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!("expected a string, found `{other}`"))),
    }
}

/// Deserialize tags: `null` is empty, a string is comma-separated.
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::String(s) => s.split(',').map(|t| t.trim().to_string()).collect(),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(D::Error::custom(format!("invalid tag `{other}`"))),
            })
            .collect::<Result<Vec<_>, _>>()?,
        other => return Err(D::Error::custom(format!("invalid tags `{other}`"))),
    };

    Ok(tags.into_iter().filter(|t| !t.is_empty()).collect())
}

// ============================================================================
// In-memory store (tests)
// ============================================================================

/// Fixed collections held in memory; `failing` makes every read fail.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: FxHashMap<String, Vec<ContentEntry>>,
    failing: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_collection(name: &str, entries: Vec<ContentEntry>) -> Self {
        let mut collections = FxHashMap::default();
        collections.insert(name.to_string(), entries);
        Self {
            collections,
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            collections: FxHashMap::default(),
            failing: true,
        }
    }
}

#[cfg(test)]
impl ContentStore for MemoryStore {
    fn get_collection(&self, name: &str) -> Result<Vec<ContentEntry>, ContentError> {
        if self.failing {
            return Err(ContentError::Io(
                PathBuf::from(name),
                std::io::Error::other("content store offline"),
            ));
        }
        Ok(self.collections.get(name).cloned().unwrap_or_default())
    }
}
