//! Renders a single entry back into BibTeX text.

use crate::entry::Entry;
use crate::sanitize::DEFAULT_STEM;

/// Entry type emitted when the parsed type is empty.
pub const DEFAULT_ENTRY_TYPE: &str = "article";

/// Serializes `entry` as a standalone BibTeX record.
///
/// Values are whitespace-normalized and fields left blank by that are dropped.
/// Fields appear in their parsed order, the type is lower-cased, and each
/// field value is wrapped in braces.
pub fn entry_to_bib(entry: &Entry) -> String {
    let entry_type = if entry.entry_type.is_empty() {
        DEFAULT_ENTRY_TYPE.to_string()
    } else {
        entry.entry_type.to_lowercase()
    };
    let key = entry.key().unwrap_or(DEFAULT_STEM);

    let lines: Vec<String> = entry
        .tags
        .iter()
        .filter_map(|field| {
            let value = normalize_whitespace(&field.value);
            (!value.is_empty()).then(|| format!("  {} = {{{}}}", field.name, value))
        })
        .collect();

    format!("@{entry_type}{{{key},\n{}\n}}\n", lines.join(",\n"))
}

/// Collapses whitespace runs into single spaces and trims the ends.
pub fn normalize_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
