//! MapBiomas collection legend: class code → Portuguese name + display color.
//!
//! The legend ships as a JSON object keyed by decimal class-code strings:
//!
//! ```json
//! { "3": { "PT": "Formação Florestal", "HEX_COL": "#1f8d49" }, ... }
//! ```
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Display color for classes the legend does not know.
pub const FALLBACK_COLOR: &str = "#808080";

#[derive(Debug, Error)]
pub enum LegendError {
    #[error("cannot read legend file: {0}")]
    Io(#[from] std::io::Error),

    #[error("legend JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One legend entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LegendEntry {
    /// Class name in Portuguese.
    #[serde(rename = "PT")]
    pub name_pt: String,
    /// Display color as `#rrggbb`.
    #[serde(rename = "HEX_COL")]
    pub color_hex: String,
}

/// Immutable class-code → entry mapping for one collection.
#[derive(Debug, Clone, Default)]
pub struct Legend {
    entries: BTreeMap<u32, LegendEntry>,
}

impl Legend {
    /// Load a legend document from disk.
    pub fn from_path(path: &Path) -> Result<Self, LegendError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse a legend document from JSON text. Keys that are not decimal
    /// class codes are ignored; codes never queried cannot match anyway.
    pub fn from_json(text: &str) -> Result<Self, LegendError> {
        let raw: BTreeMap<String, LegendEntry> = serde_json::from_str(text)?;
        let entries = raw
            .into_iter()
            .filter_map(|(key, entry)| key.parse::<u32>().ok().map(|code| (code, entry)))
            .collect();
        Ok(Self { entries })
    }

    /// A legend with no entries. Every lookup misses, so callers fall back
    /// to the placeholder name and color.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a class code. `None` means the caller must supply defaults.
    pub fn get(&self, code: u32) -> Option<&LegendEntry> {
        self.entries.get(&code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Placeholder name for a class code missing from the legend.
pub fn missing_class_name(code: u32) -> String {
    format!("Classe {} (não encontrada)", code)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
        "3":  { "PT": "Formação Florestal", "HEX_COL": "#1f8d49" },
        "15": { "PT": "Pastagem", "HEX_COL": "#edde8e" }
    }"##;

    #[test]
    fn parses_entries_by_code() {
        let legend = Legend::from_json(SAMPLE).unwrap();
        assert_eq!(legend.len(), 2);
        let entry = legend.get(3).unwrap();
        assert_eq!(entry.name_pt, "Formação Florestal");
        assert_eq!(entry.color_hex, "#1f8d49");
    }

    #[test]
    fn unknown_code_returns_none() {
        let legend = Legend::from_json(SAMPLE).unwrap();
        assert!(legend.get(99).is_none());
    }

    #[test]
    fn non_numeric_keys_are_ignored() {
        let legend = Legend::from_json(
            r##"{ "meta": { "PT": "x", "HEX_COL": "#000000" },
                  "4": { "PT": "Savana", "HEX_COL": "#7dc975" } }"##,
        )
        .unwrap();
        assert_eq!(legend.len(), 1);
        assert!(legend.get(4).is_some());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Legend::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LegendError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Legend::from_path(Path::new("/nonexistent/legend.json")).unwrap_err();
        assert!(matches!(err, LegendError::Io(_)));
    }

    #[test]
    fn empty_legend_misses_everything() {
        let legend = Legend::empty();
        assert!(legend.is_empty());
        assert!(legend.get(3).is_none());
    }

    #[test]
    fn placeholder_name_format() {
        assert_eq!(missing_class_name(4), "Classe 4 (não encontrada)");
    }
}
