//! Per-file entry points: outline layers to board extents, silkscreen layers
//! to labels.

use std::path::Path;

use crate::config::ParseOptions;
use crate::error::BoardTextError;
use crate::gerber::{parse_points, PointStream};
use crate::layout::{
    assign_names, boundary_points, cluster_with, reduce, summarize, BoardExtent, ClusterOutcome,
    LabelDocument, TextLabel,
};

/// Reads a file as text. Invalid UTF-8 is replaced rather than rejected.
///
/// # Errors
///
/// Returns [`BoardTextError::Io`] if the file cannot be read.
pub fn read_source(path: impl AsRef<Path>) -> Result<String, BoardTextError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| BoardTextError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Result of parsing a board outline (keepout) layer.
#[derive(Debug, Clone)]
pub struct OutlineReport {
    /// Decoded points and parse diagnostics.
    pub stream: PointStream,
    /// Extent of every point, or `None` if the file had no coordinates.
    pub extent: Option<BoardExtent>,
    /// Unique points sorted by X then Y.
    pub boundary: Vec<(f64, f64)>,
}

impl OutlineReport {
    /// Parses outline text.
    ///
    /// # Errors
    ///
    /// Returns [`BoardTextError::InvalidOptions`] if `options` fail validation.
    pub fn from_text(text: &str, options: &ParseOptions) -> Result<Self, BoardTextError> {
        options.validate()?;
        let stream = parse_points(text, options.format);
        let extent = reduce(&stream.points);
        let boundary = boundary_points(&stream.points);
        if let Some(extent) = &extent {
            tracing::debug!(
                width = extent.width,
                height = extent.height,
                "board extent"
            );
        }
        Ok(Self {
            stream,
            extent,
            boundary,
        })
    }

    /// Parses outline bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BoardTextError::InvalidOptions`] if `options` fail validation.
    pub fn from_bytes(data: &[u8], options: &ParseOptions) -> Result<Self, BoardTextError> {
        Self::from_text(&String::from_utf8_lossy(data), options)
    }

    /// Reads and parses an outline file.
    ///
    /// # Errors
    ///
    /// Returns [`BoardTextError::Io`] if the file cannot be read, or
    /// [`BoardTextError::InvalidOptions`] if `options` fail validation.
    /// A missing file is reported before the options are checked.
    pub fn from_path(
        path: impl AsRef<Path>,
        options: &ParseOptions,
    ) -> Result<Self, BoardTextError> {
        Self::from_text(&read_source(path)?, options)
    }
}

/// Result of parsing a silkscreen layer.
#[derive(Debug, Clone)]
pub struct SilkscreenReport {
    /// Decoded points and parse diagnostics. Naming warnings are appended to
    /// `stream.warnings` as well.
    pub stream: PointStream,
    /// Clusters that survived the size gate, with discard counts.
    pub outcome: ClusterOutcome,
    /// One label per retained cluster, sorted by position.
    pub labels: Vec<TextLabel>,
}

impl SilkscreenReport {
    /// Parses silkscreen text and summarizes its glyph clusters.
    ///
    /// # Errors
    ///
    /// Returns [`BoardTextError::InvalidOptions`] if `options` fail validation.
    pub fn from_text(text: &str, options: &ParseOptions) -> Result<Self, BoardTextError> {
        options.validate()?;
        let mut stream = parse_points(text, options.format);
        let outcome = cluster_with(&stream.points, options);
        let labels = summarize(&outcome.clusters, &stream.points);
        if labels.is_empty() && !stream.points.is_empty() {
            stream
                .warnings
                .push("no point cluster large enough to form a label".to_string());
        }
        Ok(Self {
            stream,
            outcome,
            labels,
        })
    }

    /// Parses silkscreen bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BoardTextError::InvalidOptions`] if `options` fail validation.
    pub fn from_bytes(data: &[u8], options: &ParseOptions) -> Result<Self, BoardTextError> {
        Self::from_text(&String::from_utf8_lossy(data), options)
    }

    /// Reads and parses a silkscreen file.
    ///
    /// # Errors
    ///
    /// Returns [`BoardTextError::Io`] if the file cannot be read, or
    /// [`BoardTextError::InvalidOptions`] if `options` fail validation.
    /// A missing file is reported before the options are checked.
    pub fn from_path(
        path: impl AsRef<Path>,
        options: &ParseOptions,
    ) -> Result<Self, BoardTextError> {
        Self::from_text(&read_source(path)?, options)
    }

    /// Renames labels by position from an external designator list, e.g.
    /// placement data. A length mismatch is recorded as a warning; names are
    /// still applied in order.
    pub fn apply_names<S: AsRef<str>>(&mut self, names: &[S]) -> usize {
        if names.len() != self.labels.len() {
            tracing::warn!(
                labels = self.labels.len(),
                names = names.len(),
                "designator count does not match label count"
            );
            self.stream.warnings.push(format!(
                "{} designators supplied for {} labels; names assigned by position",
                names.len(),
                self.labels.len()
            ));
        }
        assign_names(&mut self.labels, names)
    }

    /// Builds the exportable label document.
    pub fn document(&self, file: impl Into<String>) -> LabelDocument {
        LabelDocument::new(file, self.stream.final_unit, &self.labels)
    }
}
