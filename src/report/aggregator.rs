use super::layout::{PathInfo, SegmentLayout};
use super::parser::{TagFields, TagParser};
use crate::scanner::{ArtifactKind, ArtifactLocator, DirectoryClassifier};
use indicatif::ProgressBar;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Display value for a field that could not be determined
pub const UNKNOWN: &str = "unknown";

/// Display value for parser-derived fields of a dump that failed to parse
pub const FAILED: &str = "parse failed";

/// Render the hotend range as `min-max°C`, a single `v°C`, or unknown.
pub fn format_temperature(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{min}-{max}°C"),
        (Some(value), None) | (None, Some(value)) => format!("{value}°C"),
        (None, None) => UNKNOWN.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub source: PathBuf,
    pub path_info: PathInfo,
    pub uid: String,
    pub color_code: String,
    pub temperature: String,
    pub parsed: bool,
}

impl ReportRow {
    pub fn from_fields(source: PathBuf, path_info: PathInfo, fields: TagFields) -> Self {
        let temps = &fields.temperatures;
        let temperature = format_temperature(temps.min_hotend, temps.max_hotend);
        Self {
            source,
            path_info,
            uid: fields.uid.unwrap_or_else(|| UNKNOWN.to_string()),
            color_code: fields.filament_color.unwrap_or_else(|| UNKNOWN.to_string()),
            temperature,
            parsed: true,
        }
    }

    pub fn failed(source: PathBuf, path_info: PathInfo) -> Self {
        Self {
            source,
            path_info,
            uid: FAILED.to_string(),
            color_code: FAILED.to_string(),
            temperature: FAILED.to_string(),
            parsed: false,
        }
    }

    /// The five report columns, in sheet order.
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.path_info.material_type,
            &self.path_info.color,
            &self.uid,
            &self.color_code,
            &self.temperature,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatCategory {
    MaterialType,
    Color,
}

impl StatCategory {
    pub fn label(self) -> &'static str {
        match self {
            StatCategory::MaterialType => "Material Type",
            StatCategory::Color => "Color",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    /// Counts over successfully parsed rows
    pub stats: BTreeMap<(StatCategory, String), usize>,
    /// Row counts per (material type, color), failed rows included
    pub cross_tab: BTreeMap<(String, String), usize>,
}

impl Report {
    pub fn push(&mut self, row: ReportRow) {
        if row.parsed {
            *self
                .stats
                .entry((StatCategory::MaterialType, row.path_info.material_type.clone()))
                .or_default() += 1;
            *self
                .stats
                .entry((StatCategory::Color, row.path_info.color.clone()))
                .or_default() += 1;
        }
        *self
            .cross_tab
            .entry((row.path_info.material_type.clone(), row.path_info.color.clone()))
            .or_default() += 1;
        self.rows.push(row);
    }

    pub fn parsed_count(&self) -> usize {
        self.rows.iter().filter(|r| r.parsed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.rows.len() - self.parsed_count()
    }

    pub fn failed_sources(&self) -> Vec<&Path> {
        self.rows
            .iter()
            .filter(|r| !r.parsed)
            .map(|r| r.source.as_path())
            .collect()
    }

    /// Rows per material type, most frequent first.
    pub fn material_type_counts(&self) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.path_info.material_type.as_str()).or_default() += 1;
        }
        let mut counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }
}

pub struct ReportAggregator {
    classifier: DirectoryClassifier,
    locator: ArtifactLocator,
    layout: SegmentLayout,
    progress: ProgressBar,
}

impl Default for ReportAggregator {
    fn default() -> Self {
        Self::new(DirectoryClassifier::default(), SegmentLayout::default())
    }
}

impl ReportAggregator {
    pub fn new(classifier: DirectoryClassifier, layout: SegmentLayout) -> Self {
        Self {
            classifier,
            // every dump.bin gets a row, so candidate ambiguity does not matter here
            locator: ArtifactLocator::default(),
            layout,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// All raw dumps below `root`, each with the classification of its directory.
    pub fn find_dumps(&self, root: &Path) -> Vec<(PathBuf, PathInfo)> {
        let mut dumps = Vec::new();
        for dir in self.classifier.scan_lenient(root) {
            let info = PathInfo::extract(dir.segments.as_slice(), &self.layout);
            let artifacts = match self.locator.locate(&dir) {
                Ok(a) => a,
                Err(e) => {
                    log::warn!("{e}");
                    continue;
                }
            };
            for name in artifacts.candidates(ArtifactKind::RawDump) {
                dumps.push((dir.file_path(name), info.clone()));
            }
        }
        log::info!("Found {} RFID dumps", dumps.len());
        dumps
    }

    /// Build a report over every dump below `root`. Parse failures become
    /// placeholder rows; they never abort the run.
    pub fn aggregate(&self, root: &Path, parser: &dyn TagParser) -> Report {
        let dumps = self.find_dumps(root);
        let mut report = Report::default();

        self.progress.set_length(dumps.len() as u64);
        for (path, info) in dumps {
            self.progress.set_message(path.display().to_string());
            let row = match parser.parse(&path) {
                Ok(fields) => ReportRow::from_fields(path, info, fields),
                Err(e) => {
                    log::warn!("{e}");
                    ReportRow::failed(path, info)
                }
            };
            report.push(row);
            self.progress.inc(1);
        }
        self.progress.finish_and_clear();

        report
    }
}
