//! Country-code lookup table.
//!
//! Country nodes are keyed by the short code found in the CSV files (`ENG`,
//! `ESP`, ...). Searching Wikidata needs the full name, which comes from a flat
//! JSON object such as `{"ENG": "England"}`.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{LinkError, LinkResult};

/// Maps country codes to display names.
#[derive(Debug, Clone, Default)]
pub struct CountryLookup {
    names: HashMap<String, String>,
}

impl CountryLookup {
    /// A lookup with no entries; every country is skipped.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read the lookup file at `path`.
    pub fn load(path: &Path) -> LinkResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| LinkError::LookupRead {
            path: path.display().to_string(),
            source,
        })?;
        let lookup = Self::from_json(&text, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), entries = lookup.len(), "loaded country lookup");
        Ok(lookup)
    }

    /// Parse lookup JSON. `origin` names the source in errors.
    pub fn from_json(text: &str, origin: &str) -> LinkResult<Self> {
        let names: HashMap<String, String> =
            serde_json::from_str(text).map_err(|e| LinkError::LookupParse {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { names })
    }

    /// The display name for `code`, if known.
    pub fn name(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(String, String)> for CountryLookup {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_and_unknown_codes() {
        let lookup =
            CountryLookup::from_json(r#"{"ENG": "England", "ESP": "Spain"}"#, "inline").unwrap();
        assert_eq!(lookup.name("ENG"), Some("England"));
        assert_eq!(lookup.name("XKX"), None);
        assert_eq!(lookup.len(), 2);
    }

    #[test]
    fn non_object_json_is_parse_error() {
        let err = CountryLookup::from_json("[1, 2]", "inline").unwrap_err();
        assert!(matches!(err, LinkError::LookupParse { .. }));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("iso_to_country.json");
        std::fs::write(&path, r#"{"ITA": "Italy"}"#).unwrap();
        let lookup = CountryLookup::load(&path).unwrap();
        assert_eq!(lookup.name("ITA"), Some("Italy"));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = CountryLookup::load(Path::new("/nonexistent/iso_to_country.json")).unwrap_err();
        assert!(matches!(err, LinkError::LookupRead { .. }));
    }
}
