//! Frontmatter extraction from YAML-like (`---`) or TOML (`+++`) fences.
//!
//! Both formats are normalized to a JSON object so entry validation only
//! deals with one value model.
//!
//! The YAML side is a small indentation-aware reader covering what blog
//! frontmatter uses in practice:
//!
//! ```yaml
//! title: "Hello: World"
//! pubDate: Jul 08 2022      # comment
//! tags: [rust, 'web dev']
//! categories:
//!   - a
//!   - b
//! description: >-
//!   Folded onto
//!   one line
//! seo:
//!   title: Nested keys stay nested
//! draft: false
//! ```

use serde_json::Value;
use thiserror::Error;

pub type JsonMap = serde_json::Map<String, Value>;

#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("invalid TOML frontmatter")]
    Toml(#[from] toml::de::Error),

    #[error("line {line}: {message}")]
    Yaml { line: usize, message: String },
}

/// Extract frontmatter and return (metadata, body).
///
/// Returns `Ok(None)` if the content has no frontmatter fence.
pub fn extract(content: &str) -> Result<Option<(JsonMap, &str)>, FrontmatterError> {
    match detect(content) {
        Some((fm, body, true)) => Ok(Some((parse_toml(fm)?, body))),
        Some((fm, body, false)) => Ok(Some((parse_yaml_like(fm)?, body))),
        None => Ok(None),
    }
}

/// Detect and extract frontmatter.
/// Returns `(frontmatter, body, is_toml)` if found.
fn detect(content: &str) -> Option<(&str, &str, bool)> {
    let trimmed = content.trim_start_matches('\u{feff}').trim_start();

    for (fence, is_toml) in [("---", false), ("+++", true)] {
        if let Some(rest) = trimmed.strip_prefix(fence)
            && let Some(end) = rest.find(&format!("\n{fence}"))
        {
            // Lines are counted from the one after the opening fence
            let fm = rest[..end].split_once('\n').map_or("", |(_, fm)| fm);
            let body = rest[end + 1 + fence.len()..].trim_start_matches(['\r', '\n']);
            return Some((fm, body, is_toml));
        }
    }

    None
}

/// Parse TOML frontmatter.
fn parse_toml(content: &str) -> Result<JsonMap, FrontmatterError> {
    let table: toml::Table = toml::from_str(content)?;
    Ok(table
        .into_iter()
        .map(|(key, value)| (key, toml_to_json(value)))
        .collect())
}

/// Convert a TOML value, keeping datetimes as their string form.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(n) => Value::Number(n.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

/// Parse YAML-like frontmatter (`key: value` lines, block lists, nested
/// mappings and block scalars).
fn parse_yaml_like(content: &str) -> Result<JsonMap, FrontmatterError> {
    let mut reader = YamlReader::new(content);
    let base = reader.peek().map_or(0, |line| line.indent);
    let map = reader.parse_mapping(base)?;

    // Anything left sits left of the first key
    if let Some(line) = reader.peek() {
        return Err(yaml_error(&line, "unexpected indentation"));
    }

    Ok(map)
}

/// One frontmatter line with its 1-based number and indentation.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    indent: usize,
    raw: &'a str,
}

impl<'a> Line<'a> {
    fn new(number: usize, raw: &'a str) -> Self {
        let indent = raw.len() - raw.trim_start_matches([' ', '\t']).len();
        Self { number, indent, raw }
    }

    /// Text after indentation with any trailing comment removed.
    fn content(&self) -> &'a str {
        let raw: &'a str = self.raw;
        strip_comment(&raw[self.indent..]).trim_end()
    }

    /// Body of a `- item` line.
    fn list_item(&self) -> Option<&'a str> {
        let content = self.content();
        if content == "-" {
            Some("")
        } else {
            content.strip_prefix("- ").map(str::trim)
        }
    }
}

fn yaml_error(line: &Line<'_>, message: impl Into<String>) -> FrontmatterError {
    FrontmatterError::Yaml {
        line: line.number,
        message: message.into(),
    }
}

/// Indentation-driven reader over frontmatter lines.
struct YamlReader<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> YamlReader<'a> {
    fn new(content: &'a str) -> Self {
        let lines = content
            .lines()
            .enumerate()
            .map(|(idx, raw)| Line::new(idx + 1, raw))
            .collect();
        Self { lines, pos: 0 }
    }

    /// Next line with content, skipping blank and comment-only lines.
    fn peek(&mut self) -> Option<Line<'a>> {
        while let Some(line) = self.lines.get(self.pos) {
            if !line.content().is_empty() {
                return Some(*line);
            }
            self.pos += 1;
        }
        None
    }

    /// Read `key: value` lines at exactly `indent`.
    fn parse_mapping(&mut self, indent: usize) -> Result<JsonMap, FrontmatterError> {
        let mut map = JsonMap::new();

        while let Some(line) = self.peek() {
            if line.indent < indent {
                break;
            }
            if line.indent > indent {
                return Err(yaml_error(&line, "unexpected indentation"));
            }
            if line.list_item().is_some() {
                return Err(yaml_error(&line, "list item without a key"));
            }

            let content = line.content();
            let Some((key, value)) = split_key(content)
                .or_else(|| content.split_once(':').map(|(k, v)| (k.trim(), v.trim())))
            else {
                return Err(yaml_error(
                    &line,
                    format!("expected `key: value`, found `{content}`"),
                ));
            };
            self.pos += 1;

            let key = unquote(key).unwrap_or_else(|| key.to_string());
            let value = if value.is_empty() {
                self.parse_nested(indent, true)?
            } else if let Some(style) = BlockScalar::parse(value) {
                self.read_block_scalar(indent, style)
            } else {
                parse_yaml_value(&self.continue_plain(indent, value))
            };
            map.insert(key, value);
        }

        Ok(map)
    }

    /// Value of a key or list item written on the following lines.
    ///
    /// A key may own a list at its own indentation. Everything else must be
    /// indented deeper. With nothing below, the value is null.
    fn parse_nested(
        &mut self,
        parent: usize,
        list_at_parent: bool,
    ) -> Result<Value, FrontmatterError> {
        let Some(next) = self.peek() else {
            return Ok(Value::Null);
        };
        let deeper = next.indent > parent;

        if next.list_item().is_some() && (deeper || (list_at_parent && next.indent == parent)) {
            return self.parse_list(next.indent).map(Value::Array);
        }
        if deeper {
            return self.parse_mapping(next.indent).map(Value::Object);
        }

        Ok(Value::Null)
    }

    /// Read `- item` lines at exactly `indent`.
    fn parse_list(&mut self, indent: usize) -> Result<Vec<Value>, FrontmatterError> {
        let mut items = Vec::new();

        while let Some(line) = self.peek() {
            if line.indent != indent {
                break;
            }
            let Some(item) = line.list_item() else {
                break;
            };

            if item.is_empty() {
                self.pos += 1;
                items.push(self.parse_nested(indent, false)?);
            } else if split_key(item).is_some() {
                // `- key: value` opens a mapping anchored at the item text
                let offset = line.raw.len() - line.raw[indent + 1..].trim_start().len();
                self.lines[self.pos] = Line {
                    number: line.number,
                    indent: offset,
                    raw: line.raw,
                };
                items.push(Value::Object(self.parse_mapping(offset)?));
            } else {
                self.pos += 1;
                items.push(parse_yaml_value(&self.continue_plain(indent, item)));
            }
        }

        Ok(items)
    }

    /// Fold deeper-indented continuation lines into a plain scalar.
    fn continue_plain(&mut self, indent: usize, first: &str) -> String {
        let mut text = first.to_string();
        while let Some(line) = self.peek().filter(|line| line.indent > indent) {
            text.push(' ');
            text.push_str(line.content());
            self.pos += 1;
        }
        text
    }

    /// Read the lines of a `|` or `>` scalar verbatim, comments included.
    fn read_block_scalar(&mut self, parent: usize, style: BlockScalar) -> Value {
        let mut body: Vec<&str> = Vec::new();
        let mut base = None;

        while let Some(line) = self.lines.get(self.pos) {
            if line.raw.trim().is_empty() {
                body.push("");
                self.pos += 1;
                continue;
            }
            if line.indent <= parent {
                break;
            }
            let block_indent = *base.get_or_insert(line.indent);
            if line.indent < block_indent {
                break;
            }
            body.push(&line.raw[block_indent..]);
            self.pos += 1;
        }

        let trailing = body.iter().rev().take_while(|line| line.is_empty()).count();
        body.truncate(body.len() - trailing);

        let mut text = if style.folded {
            fold_lines(&body)
        } else {
            body.join("\n")
        };
        match style.chomp {
            Chomp::Strip => {}
            Chomp::Clip => {
                if !text.is_empty() {
                    text.push('\n');
                }
            }
            Chomp::Keep => {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(&"\n".repeat(trailing));
            }
        }

        Value::String(text)
    }
}

/// Trailing newline handling of a block scalar (`-`, default, `+`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chomp {
    Strip,
    Clip,
    Keep,
}

/// Header of a block scalar: `|` keeps newlines, `>` folds them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockScalar {
    folded: bool,
    chomp: Chomp,
}

impl BlockScalar {
    fn parse(header: &str) -> Option<Self> {
        let mut chars = header.chars();
        let folded = match chars.next()? {
            '|' => false,
            '>' => true,
            _ => return None,
        };

        let mut chomp = Chomp::Clip;
        for c in chars {
            match c {
                '-' => chomp = Chomp::Strip,
                '+' => chomp = Chomp::Keep,
                '1'..='9' => {}
                _ => return None,
            }
        }

        Some(Self { folded, chomp })
    }
}

/// Join lines with spaces. Each blank line becomes a newline.
fn fold_lines(lines: &[&str]) -> String {
    let mut out = String::new();
    let mut after_break = true;

    for line in lines {
        if line.is_empty() {
            out.push('\n');
            after_break = true;
            continue;
        }
        if !after_break {
            out.push(' ');
        }
        out.push_str(line);
        after_break = false;
    }

    out
}

/// Split `key: value` on the first `:` followed by whitespace or the end of
/// the line. A quoted key may contain `:`.
fn split_key(line: &str) -> Option<(&str, &str)> {
    let mut quote: Option<char> = None;
    let mut chars = line.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (None, '"' | '\'') if i == 0 => quote = Some(c),
            (None, ':') if chars.peek().is_none_or(|(_, next)| next.is_whitespace()) => {
                return Some((line[..i].trim(), line[i + 1..].trim()));
            }
            _ => {}
        }
    }

    None
}

/// Drop a trailing `# comment` that is not inside quotes.
fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut prev_is_space = true;

    for (i, c) in line.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (None, '"' | '\'') => quote = Some(c),
            (None, '#') if prev_is_space => return &line[..i],
            _ => {}
        }
        prev_is_space = c.is_whitespace();
    }

    line
}

/// Remove matching surrounding quotes, handling simple escapes.
fn unquote(s: &str) -> Option<String> {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        let inner = &s[1..s.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                    None => out.push('\\'),
                }
            } else {
                out.push(c);
            }
        }
        return Some(out);
    }

    if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
        return Some(s[1..s.len() - 1].replace("''", "'"));
    }

    None
}

/// Split an inline list body on commas outside quotes.
fn split_inline_list(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (None, '"' | '\'') => quote = Some(c),
            (None, ',') => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(s[start..].trim());

    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

/// Parse a YAML-like value string to JSON value
///
/// Supports:
/// - Quoted strings: `"a: b"`, `'it''s'`
/// - Inline lists: `[a, "b"]`
/// - Booleans: `true`, `false`
/// - Null: `null`, `~`
/// - Numbers: `123`, `3.14`
/// - Strings: everything else
fn parse_yaml_value(s: &str) -> Value {
    if let Some(unquoted) = unquote(s) {
        return Value::String(unquoted);
    }

    if let Some(inner) = s.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return Value::Array(split_inline_list(inner).into_iter().map(parse_yaml_value).collect());
    }

    if s.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    if s.eq_ignore_ascii_case("null") || s == "~" {
        return Value::Null;
    }

    if let Ok(n) = s.parse::<i64>() {
        return Value::Number(n.into());
    }

    if let Ok(n) = s.parse::<f64>()
        && let Some(num) = serde_json::Number::from_f64(n)
    {
        return Value::Number(num);
    }

    Value::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_yaml_frontmatter() {
        let content = "---\ntitle: Hello\npubDate: 2024-01-01\ntags: [a, b]\n---\n\n# Body";
        let (meta, body) = extract(content).unwrap().unwrap();

        assert_eq!(meta.get("title"), Some(&json!("Hello")));
        assert_eq!(meta.get("pubDate"), Some(&json!("2024-01-01")));
        assert_eq!(meta.get("tags"), Some(&json!(["a", "b"])));
        assert!(body.starts_with("# Body"));
    }

    #[test]
    fn test_yaml_block_list_and_comments() {
        let content = "---\n# leading comment\ntags:\n  - rust\n  - 'web dev'\ndraft: true # not yet\ntitle: \"C# tips: part 1\"\n---\n";
        let (meta, _) = extract(content).unwrap().unwrap();

        assert_eq!(meta.get("tags"), Some(&json!(["rust", "web dev"])));
        assert_eq!(meta.get("draft"), Some(&json!(true)));
        assert_eq!(meta.get("title"), Some(&json!("C# tips: part 1")));
    }

    #[test]
    fn test_yaml_empty_key_is_null() {
        let content = "---\ntags:\ntitle: x\n---\n";
        let (meta, _) = extract(content).unwrap().unwrap();

        assert_eq!(meta.get("tags"), Some(&Value::Null));
        assert_eq!(meta.get("title"), Some(&json!("x")));
    }

    #[test]
    fn test_yaml_nested_mapping_keeps_top_level_keys() {
        let content = "---\ntitle: Real Title\nseo:\n  title: SEO Title\n  image:\n    url: /og.png\npubDate: 2024-01-01\n---\n";
        let (meta, _) = extract(content).unwrap().unwrap();

        assert_eq!(meta.get("title"), Some(&json!("Real Title")));
        assert_eq!(
            meta.get("seo"),
            Some(&json!({ "title": "SEO Title", "image": { "url": "/og.png" } }))
        );
        assert_eq!(meta.get("pubDate"), Some(&json!("2024-01-01")));
    }

    #[test]
    fn test_yaml_list_forms() {
        let content = "---\ntags:\n- rust\n- web\nauthors:\n  - name: Ann\n    url: https://ann.dev\n  - Bob\n---\n";
        let (meta, _) = extract(content).unwrap().unwrap();

        assert_eq!(meta.get("tags"), Some(&json!(["rust", "web"])));
        assert_eq!(
            meta.get("authors"),
            Some(&json!([{ "name": "Ann", "url": "https://ann.dev" }, "Bob"]))
        );
    }

    #[test]
    fn test_yaml_folded_block_scalar() {
        let content = "---\ntitle: x\ndescription: >-\n  A long description\n  over two lines\npubDate: 2024-01-01\n---\n";
        let (meta, _) = extract(content).unwrap().unwrap();

        assert_eq!(
            meta.get("description"),
            Some(&json!("A long description over two lines"))
        );
        assert_eq!(meta.get("pubDate"), Some(&json!("2024-01-01")));
    }

    #[test]
    fn test_yaml_block_scalar_styles() {
        let literal = "---\nbody: |\n  line one # kept\n    indented\n\n  line three\n\ntitle: x\n---\n";
        let (meta, _) = extract(literal).unwrap().unwrap();
        assert_eq!(
            meta.get("body"),
            Some(&json!("line one # kept\n  indented\n\nline three\n"))
        );
        assert_eq!(meta.get("title"), Some(&json!("x")));

        let folded = "---\nbody: >\n  a\n  b\n\n  c\n---\n";
        let (meta, _) = extract(folded).unwrap().unwrap();
        assert_eq!(meta.get("body"), Some(&json!("a b\nc\n")));

        let keep = "---\nbody: |+\n  a\n\n\ntitle: x\n---\n";
        let (meta, _) = extract(keep).unwrap().unwrap();
        assert_eq!(meta.get("body"), Some(&json!("a\n\n\n")));
    }

    #[test]
    fn test_yaml_plain_continuation_lines() {
        let content = "---\ndescription: Tips and\n  tricks for\n  deploys\ntitle: x\n---\n";
        let (meta, _) = extract(content).unwrap().unwrap();

        assert_eq!(meta.get("description"), Some(&json!("Tips and tricks for deploys")));
        assert_eq!(meta.get("title"), Some(&json!("x")));
    }

    #[test]
    fn test_yaml_unexpected_indentation() {
        let err = extract("---\n  title: x\ndraft: true\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Yaml { line: 2, .. }));
    }

    #[test]
    fn test_yaml_scalars() {
        assert_eq!(parse_yaml_value("42"), json!(42));
        assert_eq!(parse_yaml_value("3.5"), json!(3.5));
        assert_eq!(parse_yaml_value("~"), Value::Null);
        assert_eq!(parse_yaml_value("'it''s'"), json!("it's"));
        assert_eq!(parse_yaml_value(r#""say \"hi\"""#), json!("say \"hi\""));
        assert_eq!(
            parse_yaml_value("Tips, tricks, and more"),
            json!("Tips, tricks, and more")
        );
        assert_eq!(parse_yaml_value(r#"["a, b", c]"#), json!(["a, b", "c"]));
    }

    #[test]
    fn test_yaml_list_item_without_key() {
        let err = extract("---\n- orphan\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Yaml { line: 1, .. }));
    }

    #[test]
    fn test_yaml_line_without_colon() {
        let err = extract("---\ntitle: ok\njust text\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Yaml { line: 2, .. }));
    }

    #[test]
    fn test_toml_frontmatter() {
        let content = "+++\ntitle = \"Hello\"\npubDate = 2024-03-01\ntags = [\"a\", \"b\"]\n+++\n\n# Body";
        let (meta, body) = extract(content).unwrap().unwrap();

        assert_eq!(meta.get("title"), Some(&json!("Hello")));
        assert_eq!(meta.get("pubDate"), Some(&json!("2024-03-01")));
        assert_eq!(meta.get("tags"), Some(&json!(["a", "b"])));
        assert!(body.starts_with("# Body"));
    }

    #[test]
    fn test_toml_invalid() {
        let err = extract("+++\ntitle = \n+++\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Toml(_)));
    }

    #[test]
    fn test_no_frontmatter() {
        assert!(extract("# Just content").unwrap().is_none());
        assert!(extract("---\nunterminated: yes\n").unwrap().is_none());
    }
}
