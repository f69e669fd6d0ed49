use super::directory_classifier::TagDirectory;
use crate::error::{CatalogError, Result};
use std::fmt;

/// Files recognised inside a tag directory, matched by filename suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Raw tag bytes
    RawDump,
    /// Structured key-dump document
    KeyDump,
    /// Derived 192-byte key material
    KeyMaterial,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::RawDump,
        ArtifactKind::KeyDump,
        ArtifactKind::KeyMaterial,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            ArtifactKind::RawDump => "dump.bin",
            ArtifactKind::KeyDump => "dump.json",
            ArtifactKind::KeyMaterial => "key.bin",
        }
    }

    pub fn matches(self, file_name: &str) -> bool {
        file_name.ends_with(self.suffix())
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// How to pick a file when several match the same suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Take the first candidate in directory-listing order
    #[default]
    FirstWins,
    /// Treat more than one candidate as an error
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet {
    pub raw_dumps: Vec<String>,
    pub key_dumps: Vec<String>,
    pub key_materials: Vec<String>,
}

impl ArtifactSet {
    pub fn candidates(&self, kind: ArtifactKind) -> &[String] {
        match kind {
            ArtifactKind::RawDump => &self.raw_dumps,
            ArtifactKind::KeyDump => &self.key_dumps,
            ArtifactKind::KeyMaterial => &self.key_materials,
        }
    }

    /// The selected file for `kind`, if any is present.
    pub fn get(&self, kind: ArtifactKind) -> Option<&str> {
        self.candidates(kind).first().map(String::as_str)
    }

    pub fn has(&self, kind: ArtifactKind) -> bool {
        !self.candidates(kind).is_empty()
    }

    pub fn kinds(&self) -> Vec<ArtifactKind> {
        ArtifactKind::ALL
            .into_iter()
            .filter(|k| self.has(*k))
            .collect()
    }

    /// A key dump exists and no key-material file does.
    pub fn needs_key_synthesis(&self) -> bool {
        self.has(ArtifactKind::KeyDump) && !self.has(ArtifactKind::KeyMaterial)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactLocator {
    policy: MatchPolicy,
}

impl ArtifactLocator {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn classify_files<'a, I>(files: I) -> ArtifactSet
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = ArtifactSet::default();
        for name in files {
            // a file may match several suffixes; each kind sees it independently
            if ArtifactKind::RawDump.matches(name) {
                set.raw_dumps.push(name.to_string());
            }
            if ArtifactKind::KeyDump.matches(name) {
                set.key_dumps.push(name.to_string());
            }
            if ArtifactKind::KeyMaterial.matches(name) {
                set.key_materials.push(name.to_string());
            }
        }
        set
    }

    pub fn locate(&self, dir: &TagDirectory) -> Result<ArtifactSet> {
        self.locate_kinds(dir, &ArtifactKind::ALL)
    }

    /// Like [`locate`](Self::locate), but under the strict policy only the
    /// listed kinds must be unambiguous.
    pub fn locate_kinds(
        &self,
        dir: &TagDirectory,
        kinds: &[ArtifactKind],
    ) -> Result<ArtifactSet> {
        let set = Self::classify_files(dir.files.iter().map(String::as_str));

        if self.policy == MatchPolicy::Strict {
            for &kind in kinds {
                let candidates = set.candidates(kind);
                if candidates.len() > 1 {
                    return Err(CatalogError::AmbiguousArtifact {
                        dir: dir.path.clone(),
                        kind: kind.suffix(),
                        candidates: candidates.to_vec(),
                    });
                }
            }
        }

        Ok(set)
    }
}
