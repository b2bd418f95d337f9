//! `Link` header values.
//!
//! # Responsibilities
//! - Parse one or more `Link` header lines into an ordered [`LinkSet`]
//! - Insert relations without duplicating ones already present
//! - Serialize back into a single comma-joined header value
//!
//! # Design Decisions
//! - Every entry found on the response is re-emitted verbatim, including
//!   ones that are not in `<uri>` form
//! - Relation names compare case-insensitively
//! - Only [`LinkSet::insert`] checks for an existing relation

use std::fmt;

use axum::http::{header, HeaderMap, HeaderValue};

/// One `<uri>; param=value` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    uri: String,
    rels: Vec<String>,
    /// Original text of a parsed entry.
    raw: Option<String>,
}

impl Link {
    /// A link to `uri` with a single relation.
    pub fn new(uri: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            rels: vec![rel.into()],
            raw: None,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn rels(&self) -> &[String] {
        &self.rels
    }

    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r.eq_ignore_ascii_case(rel))
    }

    /// Parse a single entry. Returns `None` if it has no `<uri>` part.
    fn parse(entry: &str) -> Option<Self> {
        let entry = entry.trim();
        let rest = entry.strip_prefix('<')?;
        let end = rest.find('>')?;
        let uri = rest[..end].to_string();

        let mut rels = Vec::new();
        for param in split_outside_quotes(&rest[end + 1..], ';') {
            let Some((name, value)) = param.split_once('=') else {
                continue;
            };
            if name.trim().eq_ignore_ascii_case("rel") {
                let value = value.trim().trim_matches('"');
                rels.extend(value.split_whitespace().map(str::to_string));
            }
        }

        Some(Self {
            uri,
            rels,
            raw: Some(entry.to_string()),
        })
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(raw) = &self.raw {
            return f.write_str(raw);
        }
        write!(f, "<{}>; rel=\"{}\"", self.uri, self.rels.join(" "))
    }
}

/// One comma-separated piece of a `Link` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Link(Link),
    /// Text without a `<uri>` part, kept so it survives a rewrite.
    Unparsed(String),
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Link(link) => write!(f, "{link}"),
            Entry::Unparsed(raw) => f.write_str(raw),
        }
    }
}

/// Ordered `Link` header entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    entries: Vec<Entry>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a header value such as `<a>; rel=self, </docs>; rel="service-doc"`.
    pub fn parse(value: &str) -> Self {
        let mut set = Self::new();
        set.extend_from(value);
        set
    }

    /// Collect every `Link` line of `headers`. Non-UTF-8 lines are ignored.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut set = Self::new();
        for value in headers.get_all(header::LINK) {
            let Ok(value) = value.to_str() else {
                tracing::warn!("Ignoring non-UTF-8 Link header value");
                continue;
            };
            set.extend_from(value);
        }
        set
    }

    fn extend_from(&mut self, value: &str) {
        for piece in split_entries(value) {
            let entry = match Link::parse(piece) {
                Some(link) => Entry::Link(link),
                None => Entry::Unparsed(piece.trim().to_string()),
            };
            self.entries.push(entry);
        }
    }

    pub fn contains(&self, rel: &str) -> bool {
        self.get(rel).is_some()
    }

    /// First link carrying `rel`.
    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.iter().find(|l| l.has_rel(rel))
    }

    /// Add `uri` under `rel` unless the relation is already present.
    /// Returns whether the set changed.
    pub fn insert(&mut self, uri: impl Into<String>, rel: &str) -> bool {
        if self.contains(rel) {
            return false;
        }
        self.entries.push(Entry::Link(Link::new(uri, rel)));
        true
    }

    /// Number of entries, parsed or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parsed links, in header order.
    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Link(link) => Some(link),
            Entry::Unparsed(_) => None,
        })
    }

    /// Replace every `Link` line in `headers` with this set as one value.
    ///
    /// Leaves `headers` untouched if the value is not a valid header value.
    pub fn write_to(&self, headers: &mut HeaderMap) {
        if self.is_empty() {
            headers.remove(header::LINK);
            return;
        }
        match HeaderValue::from_str(&self.to_string()) {
            Ok(value) => {
                headers.insert(header::LINK, value);
            }
            Err(e) => tracing::warn!(error = %e, "Link header value not encodable, keeping original"),
        }
    }
}

impl fmt::Display for LinkSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Split on commas that are not inside `<...>` or a quoted string.
fn split_entries(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_uri = false;
    let mut in_quotes = false;

    for (i, c) in value.char_indices() {
        match c {
            '<' if !in_quotes => in_uri = true,
            '>' if !in_quotes => in_uri = false,
            '"' if !in_uri => in_quotes = !in_quotes,
            ',' if !in_uri && !in_quotes => {
                parts.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

fn split_outside_quotes(value: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (i, c) in value.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == sep && !in_quotes {
            parts.push(&value[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&value[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unquoted_and_quoted_rels() {
        let set = LinkSet::parse(r#"<>; rel=self, </openapi.json>; rel="service-desc""#);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("self").unwrap().uri(), "");
        assert_eq!(set.get("service-desc").unwrap().uri(), "/openapi.json");
    }

    #[test]
    fn test_parse_comma_inside_uri_and_quotes() {
        let set = LinkSet::parse(
            r#"</search?q=a,b>; rel="next"; title="one, two", </docs>; rel=service-doc"#,
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("next").unwrap().uri(), "/search?q=a,b");
        assert!(set.contains("service-doc"));
    }

    #[test]
    fn test_multiple_relations_in_one_entry() {
        let set = LinkSet::parse(r#"</a>; rel="self canonical""#);
        assert!(set.contains("self"));
        assert!(set.contains("CANONICAL"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_insert_skips_existing_relation() {
        let mut set = LinkSet::parse("</mine>; rel=service-doc");
        assert!(!set.insert("/docs", "service-doc"));
        assert!(set.insert("/openapi.json", "service-desc"));
        assert_eq!(
            set.to_string(),
            r#"</mine>; rel=service-doc, </openapi.json>; rel="service-desc""#
        );
    }

    #[test]
    fn test_parsed_entries_are_kept_verbatim() {
        let value = r#"<>; rel=self;   type="text/html""#;
        assert_eq!(LinkSet::parse(value).to_string(), value);
    }

    #[test]
    fn test_entries_without_uri_brackets_are_kept() {
        let mut set = LinkSet::parse("https://x/a; rel=self, , </b>; rel=next");
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().count(), 1);
        assert!(!set.contains("self"));

        assert!(set.insert("/docs", "service-doc"));
        assert_eq!(
            set.to_string(),
            r#"https://x/a; rel=self, </b>; rel=next, </docs>; rel="service-doc""#
        );
    }

    #[test]
    fn test_entries_sharing_a_relation_are_all_kept() {
        let value = r#"</a>; rel=self, </b>; rel="next self""#;
        let mut set = LinkSet::parse(value);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("self").unwrap().uri(), "/a");
        assert_eq!(set.get("next").unwrap().uri(), "/b");

        assert!(!set.insert("/c", "next"));
        assert_eq!(set.to_string(), value);
    }

    #[test]
    fn test_from_headers_merges_lines() {
        let mut headers = HeaderMap::new();
        headers.append(header::LINK, HeaderValue::from_static("</a>; rel=self"));
        headers.append(header::LINK, HeaderValue::from_static("</b>; rel=next, </c>; rel=self"));

        let set = LinkSet::from_headers(&headers);
        assert_eq!(set.len(), 3);
        assert_eq!(set.get("self").unwrap().uri(), "/a");

        set.write_to(&mut headers);
        assert_eq!(headers.get_all(header::LINK).iter().count(), 1);
        assert_eq!(
            headers.get(header::LINK).unwrap(),
            "</a>; rel=self, </b>; rel=next, </c>; rel=self"
        );
    }
}
