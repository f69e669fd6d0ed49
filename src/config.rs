use crate::error::{CatalogError, Result};
use crate::report::{ReportFormat, SegmentLayout};
use crate::scanner::MatchPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "rfid-catalog.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the tag tree
    pub root: PathBuf,
    /// Directory names pruned from the walk (tooling subtrees)
    pub exclude: Vec<String>,
    /// Reject tag directories holding several files of one artifact kind
    pub strict_artifacts: bool,
    pub layout: SegmentLayout,
    pub parser: ParserConfig,
    pub report: ReportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from(".."),
            exclude: vec!["scripts".to_string()],
            strict_artifacts: false,
            layout: SegmentLayout::default(),
            parser: ParserConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// External program decoding a `dump.bin` into JSON fields
    pub command: Option<String>,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub output: PathBuf,
    pub format: ReportFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("xlsx/rfid_report.json"),
            format: ReportFormat::Json,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| CatalogError::Config {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        let config = Self::from_toml(&content, path)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `explicit` if given, else the default file if it exists, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn match_policy(&self) -> MatchPolicy {
        if self.strict_artifacts {
            MatchPolicy::Strict
        } else {
            MatchPolicy::FirstWins
        }
    }
}
