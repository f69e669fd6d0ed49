//! MIFARE Classic 1K key material.
//!
//! The binary layout is 16 six-byte KeyA values for sectors 0..16 followed by
//! 16 six-byte KeyB values in the same order. It is *not* interleaved per
//! sector.

use super::document::{KeyDumpDocument, SectorKeyEntry};
use crate::error::{CatalogError, KeySlot, Result};
use std::collections::BTreeMap;

pub const SECTOR_COUNT: usize = 16;
pub const KEY_LEN: usize = 6;
pub const KEY_MATERIAL_LEN: usize = SECTOR_COUNT * KEY_LEN * 2;

/// Factory default key, used for any sector or slot the dump leaves out
pub const DEFAULT_KEY: [u8; KEY_LEN] = [0xFF; KEY_LEN];

/// Decode a 12-character hex key into its 6 bytes.
pub fn parse_key(value: &str, sector: usize, slot: KeySlot) -> Result<[u8; KEY_LEN]> {
    let format_error = |reason: String| CatalogError::KeyFormat {
        sector,
        slot,
        value: value.to_string(),
        reason,
    };

    if value.len() != KEY_LEN * 2 {
        return Err(format_error(format!(
            "expected {} hex characters, got {}",
            KEY_LEN * 2,
            value.len()
        )));
    }

    let mut key = [0u8; KEY_LEN];
    hex::decode_to_slice(value, &mut key).map_err(|e| format_error(e.to_string()))?;
    Ok(key)
}

/// Dense key table for all sectors, defaulting every slot to [`DEFAULT_KEY`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorKeyTable {
    pub key_a: [[u8; KEY_LEN]; SECTOR_COUNT],
    pub key_b: [[u8; KEY_LEN]; SECTOR_COUNT],
}

impl Default for SectorKeyTable {
    fn default() -> Self {
        Self {
            key_a: [DEFAULT_KEY; SECTOR_COUNT],
            key_b: [DEFAULT_KEY; SECTOR_COUNT],
        }
    }
}

impl SectorKeyTable {
    /// Merge a sparse sector map over the all-default table.
    ///
    /// Entries whose index is not a sector number in `0..16` are ignored.
    /// Every KeyA is decoded before any KeyB, so the first malformed key is
    /// reported in output order.
    pub fn from_sparse(sparse: &BTreeMap<String, SectorKeyEntry>) -> Result<Self> {
        let mut table = Self::default();
        for slot in [KeySlot::A, KeySlot::B] {
            for sector in 0..SECTOR_COUNT {
                let Some(entry) = sparse.get(&sector.to_string()) else {
                    continue;
                };
                let (value, keys) = match slot {
                    KeySlot::A => (&entry.key_a, &mut table.key_a),
                    KeySlot::B => (&entry.key_b, &mut table.key_b),
                };
                if let Some(key) = value {
                    keys[sector] = parse_key(key, sector, slot)?;
                }
            }
        }
        Ok(table)
    }

    pub fn to_bytes(&self) -> [u8; KEY_MATERIAL_LEN] {
        let mut out = [0u8; KEY_MATERIAL_LEN];
        let keys = self.key_a.iter().chain(self.key_b.iter());
        for (chunk, key) in out.chunks_exact_mut(KEY_LEN).zip(keys) {
            chunk.copy_from_slice(key);
        }
        out
    }
}

/// Derive the 192-byte key material for a key-dump document.
pub fn derive_key_material(doc: &KeyDumpDocument) -> Result<[u8; KEY_MATERIAL_LEN]> {
    Ok(SectorKeyTable::from_sparse(&doc.sector_keys)?.to_bytes())
}
