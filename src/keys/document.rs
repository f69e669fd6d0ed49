use crate::error::{CatalogError, Result};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::Path;

/// Structured key dump written by the tag reader alongside `dump.bin`
#[derive(Debug, Clone, Deserialize)]
pub struct KeyDumpDocument {
    #[serde(rename = "Card")]
    pub card: Card,
    /// Sparse per-sector keys, indexed by decimal sector number
    #[serde(rename = "SectorKeys", default)]
    pub sector_keys: BTreeMap<String, SectorKeyEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Card {
    #[serde(rename = "UID")]
    pub uid: String,
}

/// Keys of one sector. An absent key falls back to the default; an
/// explicit `null` is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectorKeyEntry {
    #[serde(rename = "KeyA", default, deserialize_with = "present_key")]
    pub key_a: Option<String>,
    #[serde(rename = "KeyB", default, deserialize_with = "present_key")]
    pub key_b: Option<String>,
}

fn present_key<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(key) => Ok(Some(key)),
        None => Err(serde::de::Error::custom("key must be a hex string, not null")),
    }
}

impl KeyDumpDocument {
    pub fn from_json(content: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| CatalogError::document(origin, e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CatalogError::document(path, "file not found"),
            std::io::ErrorKind::InvalidData => CatalogError::document(path, "not valid UTF-8"),
            _ => CatalogError::io(path, e),
        })?;
        Self::from_json(&content, path)
    }

    pub fn uid(&self) -> &str {
        &self.card.uid
    }

    pub fn sector(&self, sector: usize) -> Option<&SectorKeyEntry> {
        self.sector_keys.get(&sector.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_document() {
        let json = r#"{
            "Created": "proxmark3",
            "Card": {"UID": "0A1B2C3D", "SAK": "08"},
            "SectorKeys": {
                "1": {"KeyA": "A0A1A2A3A4A5", "KeyB": "B0B1B2B3B4B5", "AccessConditions": "FF078069"},
                "0": {"KeyA": "000000000000"}
            }
        }"#;
        let doc = KeyDumpDocument::from_json(json, Path::new("dump.json")).unwrap();
        assert_eq!(doc.uid(), "0A1B2C3D");
        assert_eq!(doc.sector(1).unwrap().key_b.as_deref(), Some("B0B1B2B3B4B5"));
        assert!(doc.sector(0).unwrap().key_b.is_none());
        assert!(doc.sector(2).is_none());
    }

    #[test]
    fn test_missing_uid_is_fatal() {
        let json = r#"{"Card": {}, "SectorKeys": {}}"#;
        let err = KeyDumpDocument::from_json(json, Path::new("dump.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Document { .. }));

        let json = r#"{"SectorKeys": {}}"#;
        assert!(KeyDumpDocument::from_json(json, Path::new("dump.json")).is_err());
    }

    #[test]
    fn test_missing_sector_keys_defaults_empty() {
        let json = r#"{"Card": {"UID": "04112233445566"}}"#;
        let doc = KeyDumpDocument::from_json(json, Path::new("dump.json")).unwrap();
        assert!(doc.sector_keys.is_empty());
    }

    #[test]
    fn test_null_key_is_rejected() {
        let json = r#"{"Card": {"UID": "0A1B2C3D"}, "SectorKeys": {"2": {"KeyA": null}}}"#;
        let err = KeyDumpDocument::from_json(json, Path::new("dump.json")).unwrap_err();
        match err {
            CatalogError::Document { reason, .. } => assert!(reason.contains("null"), "{reason}"),
            other => panic!("unexpected error: {other}"),
        }

        let json =
            r#"{"Card": {"UID": "0A1B2C3D"}, "SectorKeys": {"2": {"KeyB": "000000000000"}}}"#;
        let doc = KeyDumpDocument::from_json(json, Path::new("dump.json")).unwrap();
        assert!(doc.sector(2).unwrap().key_a.is_none());
    }

    #[test]
    fn test_non_utf8_file_is_document_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("dump.json");
        std::fs::write(&path, [0xFF, 0xFE, 0x00, 0x7B]).unwrap();

        let err = KeyDumpDocument::load(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Document { .. }), "{err}");
    }

    #[test]
    fn test_invalid_json() {
        let err = KeyDumpDocument::from_json("{not json", Path::new("dump.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Document { .. }));
    }
}
