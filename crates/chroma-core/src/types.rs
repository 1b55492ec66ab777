//! Core data types shared by the pipeline, the store and the outer surfaces.

use serde::{Deserialize, Serialize};

/// One logged entry describing a completed transform pair.
///
/// `width` and `height` are the resize target, not the source dimensions.
/// `depth` is an opaque caller-supplied attribute and is never derived from
/// pixel content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Original source identifier (duplicates are allowed)
    pub filename: String,

    /// Location of the resized artifact
    #[serde(rename = "processed_image_path")]
    pub processed_path: String,

    /// Location of the false-color artifact
    #[serde(rename = "colormap_image_path")]
    pub colormap_path: String,

    /// Target width of the resize
    pub width: u32,

    /// Target height of the resize
    pub height: u32,

    /// Filter key attached by the caller
    pub depth: i64,
}

/// Inclusive depth interval used by store queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthRange {
    pub min: i64,
    pub max: i64,
}

impl DepthRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// `min > max`; such a range matches nothing.
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    pub fn contains(&self, depth: i64) -> bool {
        self.min <= depth && depth <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_with_log_field_names() {
        let record = ImageRecord {
            filename: "cat.jpg".into(),
            processed_path: "out/cat_processed.jpg".into(),
            colormap_path: "out/cat_colormap.jpg".into(),
            width: 150,
            height: 110,
            depth: 120,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"processed_image_path\":\"out/cat_processed.jpg\""));
        assert!(json.contains("\"colormap_image_path\":\"out/cat_colormap.jpg\""));
        assert!(json.contains("\"depth\":120"));
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = DepthRange::new(100, 120);
        assert!(range.contains(100));
        assert!(range.contains(120));
        assert!(!range.contains(99));
        assert!(!range.contains(121));
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let range = DepthRange::new(10, 5);
        assert!(range.is_inverted());
        assert!(!range.contains(7));
        assert!(!range.contains(10));
    }

    #[test]
    fn test_range_at_integer_limits() {
        let range = DepthRange::new(i64::MIN, i64::MAX);
        assert!(range.contains(i64::MIN));
        assert!(range.contains(0));
        assert!(range.contains(i64::MAX));
    }
}
