use crate::error::{CatalogError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

// One physical tag per directory, named by its 4-byte UID
static TAG_DIR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9A-Fa-f]{8}$").unwrap()
});

/// Whether `name` has the shape of a tag directory: 8 hex digits, any case.
pub fn is_tag_directory_name(name: &str) -> bool {
    TAG_DIR_REGEX.is_match(name)
}

/// A directory holding the dumped artifacts of one physical tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDirectory {
    pub path: PathBuf,
    /// Path segments below the scan root, the UID directory included
    pub segments: Vec<String>,
    pub uid_name: String,
    /// Plain files directly inside, in directory-listing order
    pub files: Vec<String>,
}

impl TagDirectory {
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

pub struct DirectoryClassifier {
    excluded: Vec<String>,
}

impl Default for DirectoryClassifier {
    fn default() -> Self {
        Self {
            excluded: vec!["scripts".to_string()],
        }
    }
}

impl DirectoryClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_excluded<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map_or(false, |name| self.excluded.iter().any(|ex| ex == name))
    }

    /// Walk `root` top-down, yielding every tag directory below it.
    ///
    /// Excluded subtrees are pruned before descent. Directories that are not
    /// tag-shaped are still descended into.
    pub fn walk<'a>(&'a self, root: &'a Path) -> impl Iterator<Item = Result<TagDirectory>> + 'a {
        WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(move |entry| !self.is_excluded(entry))
            .filter_map(move |entry| match entry {
                Err(err) => Some(Err(CatalogError::from(err))),
                Ok(entry) => {
                    if !entry.file_type().is_dir() {
                        return None;
                    }
                    let name = entry.file_name().to_str()?;
                    if !is_tag_directory_name(name) {
                        return None;
                    }
                    Some(load_tag_directory(root, entry.path()))
                }
            })
    }

    /// Collect all tag directories, failing on the first traversal error.
    pub fn scan(&self, root: &Path) -> Result<Vec<TagDirectory>> {
        let dirs = self.walk(root).collect::<Result<Vec<_>>>()?;
        log::debug!("Found {} tag directories under {}", dirs.len(), root.display());
        Ok(dirs)
    }

    /// Collect all tag directories, logging and skipping traversal errors.
    pub fn scan_lenient(&self, root: &Path) -> Vec<TagDirectory> {
        let mut dirs = Vec::new();
        for item in self.walk(root) {
            match item {
                Ok(dir) => dirs.push(dir),
                Err(e) => log::warn!("Skipping unreadable entry: {e}"),
            }
        }
        log::debug!("Found {} tag directories under {}", dirs.len(), root.display());
        dirs
    }
}

fn load_tag_directory(root: &Path, path: &Path) -> Result<TagDirectory> {
    let segments = path
        .strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    let uid_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let entries = std::fs::read_dir(path).map_err(|e| CatalogError::io(path, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CatalogError::io(path, e))?;
        if entry.path().is_file() {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    Ok(TagDirectory {
        path: path.to_path_buf(),
        segments,
        uid_name,
        files,
    })
}
