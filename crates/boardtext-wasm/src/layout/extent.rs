//! Board extent reduction for outline layers.

use serde::Serialize;

use crate::gerber::DecodedPoint;

/// Axis-aligned extent of a point stream, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoardExtent {
    /// Minimum X coordinate.
    pub min_x: f64,
    /// Maximum X coordinate.
    pub max_x: f64,
    /// Minimum Y coordinate.
    pub min_y: f64,
    /// Maximum Y coordinate.
    pub max_y: f64,
    /// `max_x - min_x`.
    pub width: f64,
    /// `max_y - min_y`.
    pub height: f64,
}

/// Reduces `points` to their extent in one pass. Every command counts,
/// including moves and flashes.
///
/// Returns `None` for an empty stream.
pub fn reduce(points: &[DecodedPoint]) -> Option<BoardExtent> {
    let (first, rest) = points.split_first()?;

    let mut min_x = first.x_mm;
    let mut max_x = first.x_mm;
    let mut min_y = first.y_mm;
    let mut max_y = first.y_mm;

    for point in rest {
        min_x = min_x.min(point.x_mm);
        max_x = max_x.max(point.x_mm);
        min_y = min_y.min(point.y_mm);
        max_y = max_y.max(point.y_mm);
    }

    Some(BoardExtent {
        min_x,
        max_x,
        min_y,
        max_y,
        width: max_x - min_x,
        height: max_y - min_y,
    })
}

/// Unique `(x, y)` pairs of the stream, sorted by X then Y.
pub fn boundary_points(points: &[DecodedPoint]) -> Vec<(f64, f64)> {
    let mut unique: Vec<(f64, f64)> = points.iter().map(|p| (p.x_mm, p.y_mm)).collect();
    unique.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    unique.dedup_by(|a, b| a.0.total_cmp(&b.0).is_eq() && a.1.total_cmp(&b.1).is_eq());
    unique
}
