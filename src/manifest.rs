//! Provenance side table and output manifest assembly.
//!
//! [`ProvenanceTable`] records, for every entry that existed in only one of
//! the two input distributions, which side it came from. [`ManifestBuilder`]
//! turns that table (plus, when configured, the merged base attributes of
//! both input manifests) into JAR-manifest text: one named section per
//! exclusive entry carrying a `Dist: client|server` attribute for downstream
//! dist-guard tooling.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::Dist;

/// Standard manifest entry path inside an archive.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Per-entry attribute naming the origin distribution of an exclusive entry.
pub const DIST_ATTRIBUTE: &str = "Dist";

// ---------------------------------------------------------------------------
// ProvenanceTable
// ---------------------------------------------------------------------------

/// Ordered entry-name → origin-side table for everything exclusive to one
/// distribution. Shared entries are not recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProvenanceTable(BTreeMap<String, Dist>);

impl ProvenanceTable {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record `entry` as exclusive to `dist`.
    pub fn record(&mut self, entry: impl Into<String>, dist: Dist) {
        self.0.insert(entry.into(), dist);
    }

    /// Origin side of `entry`, if it was recorded as exclusive.
    #[must_use]
    pub fn origin(&self, entry: &str) -> Option<Dist> {
        self.0.get(entry).copied()
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate records in lexicographic entry order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Dist)> {
        self.0.iter().map(|(name, dist)| (name.as_str(), *dist))
    }
}

// ---------------------------------------------------------------------------
// ManifestBuilder
// ---------------------------------------------------------------------------

/// Assembles the output distribution's manifest.
///
/// Main attributes always include `Manifest-Version: 1.0`; base attributes
/// merged from the input manifests are applied client-first, so on a key
/// collision the server's value wins (last write).
#[derive(Clone, Debug, Default)]
pub struct ManifestBuilder {
    main: BTreeMap<String, String>,
    sections: Vec<(String, Dist)>,
}

impl ManifestBuilder {
    /// Create a builder with no base attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge base main attributes parsed from one input manifest.
    pub fn merge_main_attributes(&mut self, attributes: BTreeMap<String, String>) {
        self.main.extend(attributes);
    }

    /// Append one named section per provenance record.
    pub fn add_provenance(&mut self, table: &ProvenanceTable) {
        for (name, dist) in table.iter() {
            self.sections.push((name.to_owned(), dist));
        }
    }

    /// Render manifest text: CRLF line endings, 72-byte line limit with
    /// space-prefixed continuation lines, main section first.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let version = self.main.get("Manifest-Version").map_or("1.0", String::as_str);
        push_wrapped(&mut out, "Manifest-Version", version);
        for (key, value) in &self.main {
            if key.as_str() != "Manifest-Version" {
                push_wrapped(&mut out, key, value);
            }
        }
        out.push_str("\r\n");
        for (name, dist) in &self.sections {
            push_wrapped(&mut out, "Name", name);
            push_wrapped(&mut out, DIST_ATTRIBUTE, dist.as_str());
            out.push_str("\r\n");
        }
        out
    }
}

/// Append `key: value` wrapped to the 72-byte manifest line limit.
fn push_wrapped(out: &mut String, key: &str, value: &str) {
    const LIMIT: usize = 70; // 72 including CRLF
    let line = format!("{key}: {value}");
    let mut bytes = line.as_bytes();
    let mut first = true;
    while !bytes.is_empty() {
        let width = if first { LIMIT } else { LIMIT - 1 };
        let take = bytes.len().min(width);
        if !first {
            out.push(' ');
        }
        // Entry names are ASCII in practice; split on a byte boundary.
        out.push_str(&String::from_utf8_lossy(&bytes[..take]));
        out.push_str("\r\n");
        bytes = &bytes[take..];
        first = false;
    }
}

/// Parse the main section of a manifest into an attribute map.
///
/// Understands space-prefixed continuation lines and stops at the first
/// blank line (named sections of input manifests are not carried over).
#[must_use]
pub fn parse_main_attributes(text: &str) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();
    let mut current: Option<(String, String)> = None;
    for line in text.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            break;
        }
        if let Some(rest) = line.strip_prefix(' ') {
            if let Some((_, value)) = current.as_mut() {
                value.push_str(rest);
            }
            continue;
        }
        if let Some((key, value)) = current.take() {
            attributes.insert(key, value);
        }
        if let Some((key, value)) = line.split_once(':') {
            current = Some((key.trim().to_owned(), value.trim_start().to_owned()));
        }
    }
    if let Some((key, value)) = current.take() {
        attributes.insert(key, value);
    }
    attributes
}
