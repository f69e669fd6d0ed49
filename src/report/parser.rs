use crate::error::{CatalogError, Result};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// Fields the report reads from a decoded tag
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TagFields {
    pub uid: Option<String>,
    pub filament_color: Option<String>,
    pub temperatures: Temperatures,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Temperatures {
    pub min_hotend: Option<f64>,
    pub max_hotend: Option<f64>,
}

/// Decodes a raw tag dump into named fields.
pub trait TagParser {
    fn parse(&self, dump_path: &Path) -> Result<TagFields>;
}

impl<F> TagParser for F
where
    F: Fn(&Path) -> Result<TagFields>,
{
    fn parse(&self, dump_path: &Path) -> Result<TagFields> {
        self(dump_path)
    }
}

/// Runs an external decoder as `<program> <args..> <dump path>` and reads
/// a JSON object of [`TagFields`] from its stdout.
#[derive(Debug, Clone)]
pub struct CommandTagParser {
    program: String,
    args: Vec<String>,
}

impl CommandTagParser {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl TagParser for CommandTagParser {
    fn parse(&self, dump_path: &Path) -> Result<TagFields> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(dump_path)
            .output()
            .map_err(|e| {
                CatalogError::parse(dump_path, format!("failed to run {}: {e}", self.program))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CatalogError::parse(
                dump_path,
                format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();
        if stdout.is_empty() || stdout == "null" {
            return Err(CatalogError::parse(dump_path, "parser returned nothing"));
        }

        serde_json::from_str(stdout).map_err(|e| CatalogError::parse(dump_path, e.to_string()))
    }
}
