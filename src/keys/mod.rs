pub mod document;
pub mod material;
pub mod synthesizer;

pub use document::{KeyDumpDocument, SectorKeyEntry};
pub use material::{
    derive_key_material, parse_key, SectorKeyTable, DEFAULT_KEY, KEY_LEN, KEY_MATERIAL_LEN,
    SECTOR_COUNT,
};
pub use synthesizer::{
    key_file_name, synthesize, KeySynthesizer, MissingKeys, SynthesisSummary, Synthesized,
};
