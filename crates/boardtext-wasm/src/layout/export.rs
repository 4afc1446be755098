//! JSON document of extracted labels, consumed by the PDF text overlay.

use std::path::Path;

use serde::Serialize;

use super::labels::TextLabel;
use crate::error::BoardTextError;
use crate::gerber::Unit;

/// Description written into every document.
pub const EXTRACTION_METHOD: &str = "Vector clustering (silkscreen strokes)";

/// Positional accuracy of stroke centroids, written into every document.
pub const ACCURACY_NOTE: &str = "±0.5mm (from vector graphics centroids)";

/// One exported label. Lengths are rounded to four decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelRecord {
    /// Designator or placeholder.
    pub designator: String,
    /// Centroid X in millimeters.
    pub x_mm: f64,
    /// Centroid Y in millimeters.
    pub y_mm: f64,
    /// Label size in millimeters.
    pub size_mm: f64,
    /// Rotation in degrees.
    pub rotation_degrees: f64,
    /// Mirrored text.
    pub mirrored: bool,
}

impl From<&TextLabel> for LabelRecord {
    fn from(label: &TextLabel) -> Self {
        Self {
            designator: label.text.clone(),
            x_mm: round4(label.x_mm),
            y_mm: round4(label.y_mm),
            size_mm: round4(label.size_mm),
            rotation_degrees: label.rotation_degrees,
            mirrored: label.mirrored,
        }
    }
}

/// Labels of one silkscreen file, ready to serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelDocument {
    /// Source file name, as given by the caller.
    pub file: String,
    /// Unit declared by the source file.
    pub unit: String,
    /// Number of labels.
    pub text_count: usize,
    /// How the positions were obtained.
    pub extraction_method: String,
    /// Expected positional accuracy.
    pub accuracy_note: String,
    /// The labels, in summary order.
    pub designators: Vec<LabelRecord>,
}

impl LabelDocument {
    /// Builds a document from summarized labels.
    pub fn new(file: impl Into<String>, unit: Unit, labels: &[TextLabel]) -> Self {
        Self {
            file: file.into(),
            unit: unit.to_string(),
            text_count: labels.len(),
            extraction_method: EXTRACTION_METHOD.to_string(),
            accuracy_note: ACCURACY_NOTE.to_string(),
            designators: labels.iter().map(LabelRecord::from).collect(),
        }
    }

    /// Serializes to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`BoardTextError::Serialize`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, BoardTextError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the JSON document to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardTextError::Write`] if the file cannot be written.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), BoardTextError> {
        let path = path.as_ref();
        let json = self.to_json_string()?;
        std::fs::write(path, json).map_err(|source| BoardTextError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "wrote label document");
        Ok(())
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
