use super::aggregator::UNKNOWN;
use serde::Deserialize;

/// Which path segment below the root carries each classification field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SegmentLayout {
    pub category: usize,
    pub material_type: usize,
    pub color: usize,
    pub uid: usize,
}

impl Default for SegmentLayout {
    // <root>/<category>/<material type>/<color>/<UID>
    fn default() -> Self {
        Self {
            category: 0,
            material_type: 1,
            color: 2,
            uid: 3,
        }
    }
}

impl SegmentLayout {
    /// Number of segments a path needs for every field to resolve.
    pub fn required_segments(&self) -> usize {
        [self.category, self.material_type, self.color, self.uid]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo {
    pub category: String,
    pub material_type: String,
    pub color: String,
    pub uid: String,
}

impl PathInfo {
    pub fn unknown() -> Self {
        Self {
            category: UNKNOWN.to_string(),
            material_type: UNKNOWN.to_string(),
            color: UNKNOWN.to_string(),
            uid: UNKNOWN.to_string(),
        }
    }

    /// Read the classification fields out of `segments`; all of them are
    /// unknown if the path is too shallow for the layout.
    pub fn extract<S: AsRef<str>>(segments: &[S], layout: &SegmentLayout) -> Self {
        let segments: Vec<&str> = segments
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|s| *s != "." && *s != "..")
            .collect();

        if segments.len() < layout.required_segments() {
            return Self::unknown();
        }

        Self {
            category: segments[layout.category].to_string(),
            material_type: segments[layout.material_type].to_string(),
            color: segments[layout.color].to_string(),
            uid: segments[layout.uid].to_string(),
        }
    }
}
