use super::document::KeyDumpDocument;
use super::material::derive_key_material;
use crate::error::{CatalogError, Result};
use crate::scanner::{ArtifactKind, ArtifactLocator, DirectoryClassifier, MatchPolicy};
use indicatif::ProgressBar;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Output filename for the key material of the card `uid`.
pub fn key_file_name(uid: &str) -> String {
    format!("hf-mf-{uid}-key.bin")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesized {
    pub path: PathBuf,
    pub bytes: usize,
}

// the UID is spliced into the output filename verbatim
fn is_file_name_safe(uid: &str) -> bool {
    let has_separator = uid.contains(|c: char| c == '/' || c == '\\');
    !(uid.is_empty() || uid == "." || uid == ".." || has_separator)
}

/// Derive and write the key file for one tag directory.
///
/// The file is created exclusively: if it already exists nothing is written
/// and an I/O error is returned.
pub fn synthesize(directory: &Path, json_filename: &str) -> Result<Synthesized> {
    let json_path = directory.join(json_filename);
    let doc = KeyDumpDocument::load(&json_path)?;

    let uid = doc.uid();
    if !is_file_name_safe(uid) {
        return Err(CatalogError::document(
            &json_path,
            format!("Card.UID {uid:?} cannot be used in a filename"),
        ));
    }

    let material = derive_key_material(&doc)?;
    let output_path = directory.join(key_file_name(uid));

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&output_path)
        .map_err(|e| CatalogError::io(&output_path, e))?;
    file.write_all(&material)
        .map_err(|e| CatalogError::io(&output_path, e))?;

    log::debug!("Wrote {} bytes to {}", material.len(), output_path.display());

    Ok(Synthesized {
        path: output_path,
        bytes: material.len(),
    })
}

/// Tag directories found by [`KeySynthesizer::find_missing`]
#[derive(Debug, Default)]
pub struct MissingKeys {
    /// Directory and key-dump filename for each directory lacking a key file
    pub pending: Vec<(PathBuf, String)>,
    /// Directories whose artifacts could not be resolved
    pub rejected: Vec<(PathBuf, CatalogError)>,
}

/// Outcome of a synthesis pass over a tag tree
#[derive(Debug, Default)]
pub struct SynthesisSummary {
    pub succeeded: Vec<Synthesized>,
    pub failed: Vec<(PathBuf, CatalogError)>,
    /// Directories that would be processed, filled on dry runs only
    pub planned: Vec<(PathBuf, String)>,
}

impl SynthesisSummary {
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct KeySynthesizer {
    classifier: DirectoryClassifier,
    locator: ArtifactLocator,
    progress: ProgressBar,
}

impl Default for KeySynthesizer {
    fn default() -> Self {
        Self::new(DirectoryClassifier::default(), MatchPolicy::default())
    }
}

impl KeySynthesizer {
    pub fn new(classifier: DirectoryClassifier, policy: MatchPolicy) -> Self {
        Self {
            classifier,
            locator: ArtifactLocator::new(policy),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Find tag directories that have a key dump but no key file.
    ///
    /// Traversal errors abort. Under the strict policy an ambiguous key dump
    /// or key file is reported as a per-directory failure; other kinds do not
    /// affect synthesis and are not checked.
    pub fn find_missing(&self, root: &Path) -> Result<MissingKeys> {
        let mut missing = MissingKeys::default();
        let key_kinds = [ArtifactKind::KeyDump, ArtifactKind::KeyMaterial];

        for dir in self.classifier.scan(root)? {
            let artifacts = match self.locator.locate_kinds(&dir, &key_kinds) {
                Ok(artifacts) => artifacts,
                Err(e) => {
                    log::warn!("{e}");
                    missing.rejected.push((dir.path, e));
                    continue;
                }
            };
            if !artifacts.needs_key_synthesis() {
                continue;
            }
            if let Some(json) = artifacts.get(ArtifactKind::KeyDump) {
                missing.pending.push((dir.path.clone(), json.to_string()));
            }
        }

        log::info!("{} directories need a key file", missing.pending.len());
        Ok(missing)
    }

    pub fn run(&self, root: &Path, dry_run: bool) -> Result<SynthesisSummary> {
        let MissingKeys { pending, rejected } = self.find_missing(root)?;
        let mut summary = SynthesisSummary {
            failed: rejected,
            ..Default::default()
        };

        if dry_run {
            for (dir, json) in &pending {
                log::info!("Would generate key file in {} from {}", dir.display(), json);
            }
            summary.planned = pending;
            return Ok(summary);
        }

        self.progress.set_length(pending.len() as u64);
        for (dir, json) in pending {
            self.progress.set_message(dir.display().to_string());
            match synthesize(&dir, &json) {
                Ok(done) => {
                    log::info!("Generated {} ({} bytes)", done.path.display(), done.bytes);
                    summary.succeeded.push(done);
                }
                Err(e) => {
                    log::warn!("Key generation failed in {}: {e}", dir.display());
                    summary.failed.push((dir, e));
                }
            }
            self.progress.inc(1);
        }
        self.progress.finish_and_clear();

        Ok(summary)
    }
}
