//! Turns retained clusters into positioned text labels.

use serde::Serialize;

use super::cluster::Cluster;
use crate::gerber::DecodedPoint;

/// A recovered label position on the silkscreen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLabel {
    /// Designator, or a `Pos(x,y)` placeholder until names are assigned.
    pub text: String,
    /// Centroid X in millimeters.
    pub x_mm: f64,
    /// Centroid Y in millimeters.
    pub y_mm: f64,
    /// Larger of the cluster's X and Y spans, in millimeters.
    pub size_mm: f64,
    /// Always 0; rotation is not detected.
    pub rotation_degrees: f64,
    /// Always `false`; mirroring is not detected.
    pub mirrored: bool,
}

/// Placeholder text encoding a centroid.
pub fn placeholder_text(x_mm: f64, y_mm: f64) -> String {
    format!("Pos({x_mm:.1},{y_mm:.1})")
}

/// Computes one label per cluster, sorted ascending by `(x_mm, y_mm)`.
///
/// Member indices outside `points` are ignored; a cluster left with no
/// valid members produces no label.
pub fn summarize(clusters: &[Cluster], points: &[DecodedPoint]) -> Vec<TextLabel> {
    let mut labels: Vec<TextLabel> = clusters
        .iter()
        .filter_map(|cluster| summarize_one(cluster, points))
        .collect();
    labels.sort_by(|a, b| a.x_mm.total_cmp(&b.x_mm).then(a.y_mm.total_cmp(&b.y_mm)));
    labels
}

fn summarize_one(cluster: &Cluster, points: &[DecodedPoint]) -> Option<TextLabel> {
    let members: Vec<&DecodedPoint> = cluster
        .members()
        .iter()
        .filter_map(|&index| points.get(index))
        .collect();
    let (first, _) = members.split_first()?;

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut min_x = first.x_mm;
    let mut max_x = first.x_mm;
    let mut min_y = first.y_mm;
    let mut max_y = first.y_mm;

    for point in &members {
        sum_x += point.x_mm;
        sum_y += point.y_mm;
        min_x = min_x.min(point.x_mm);
        max_x = max_x.max(point.x_mm);
        min_y = min_y.min(point.y_mm);
        max_y = max_y.max(point.y_mm);
    }

    #[allow(clippy::cast_precision_loss)]
    let count = members.len() as f64;
    let x_mm = sum_x / count;
    let y_mm = sum_y / count;

    Some(TextLabel {
        text: placeholder_text(x_mm, y_mm),
        x_mm,
        y_mm,
        size_mm: (max_x - min_x).max(max_y - min_y),
        rotation_degrees: 0.0,
        mirrored: false,
    })
}

/// Assigns external designator names by position: the i-th label gets the
/// i-th name. Nothing spatial is checked, so a list in a different order or
/// of a different length misnames labels silently.
///
/// Labels past the end of `names` keep their placeholder and surplus names
/// are dropped. Returns how many labels were renamed.
pub fn assign_names<S: AsRef<str>>(labels: &mut [TextLabel], names: &[S]) -> usize {
    let mut renamed = 0;
    for (label, name) in labels.iter_mut().zip(names) {
        label.text = name.as_ref().to_string();
        renamed += 1;
    }
    renamed
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::gerber::DrawCommand;
    use crate::layout::cluster::cluster;

    const EPSILON: f64 = 1e-9;

    fn points(coords: &[(f64, f64)]) -> Vec<DecodedPoint> {
        coords
            .iter()
            .map(|&(x, y)| DecodedPoint {
                x_mm: x,
                y_mm: y,
                command: DrawCommand::Draw,
            })
            .collect()
    }

    #[test]
    fn centroid_and_size_of_three_points() {
        let pts = points(&[(1.0, 1.0), (1.5, 1.2), (2.0, 1.1)]);
        let labels = summarize(&cluster(&pts, 5.0), &pts);
        assert_eq!(labels.len(), 1);
        let label = &labels[0];
        assert!((label.x_mm - 1.5).abs() < EPSILON);
        assert!((label.y_mm - 1.1).abs() < EPSILON);
        assert!((label.size_mm - 1.0).abs() < EPSILON);
        assert!(label.rotation_degrees.abs() < EPSILON);
        assert!(!label.mirrored);
        assert_eq!(label.text, "Pos(1.5,1.1)");
    }

    #[test]
    fn noise_only_yields_no_labels() {
        let pts = points(&[(0.0, 0.0), (1.0, 1.0), (100.0, 100.0)]);
        assert!(summarize(&cluster(&pts, 5.0), &pts).is_empty());
    }

    #[test]
    fn size_uses_larger_span() {
        let pts = points(&[(0.0, 0.0), (0.5, 3.0), (1.0, 1.0)]);
        let labels = summarize(&cluster(&pts, 5.0), &pts);
        assert!((labels[0].size_mm - 3.0).abs() < EPSILON);
    }

    #[test]
    fn labels_sorted_by_x_then_y() {
        let pts = points(&[
            (50.0, 10.0),
            (50.5, 10.0),
            (51.0, 10.0),
            (10.0, 40.0),
            (10.5, 40.0),
            (11.0, 40.0),
            (10.0, 5.0),
            (10.5, 5.0),
            (11.0, 5.0),
        ]);
        let labels = summarize(&cluster(&pts, 2.0), &pts);
        assert_eq!(labels.len(), 3);
        assert!((labels[0].y_mm - 5.0).abs() < EPSILON);
        assert!((labels[1].y_mm - 40.0).abs() < EPSILON);
        assert!((labels[2].x_mm - 50.5).abs() < EPSILON);
    }

    #[test]
    fn names_assigned_by_position() {
        let pts = points(&[
            (30.0, 0.0),
            (30.5, 0.0),
            (31.0, 0.0),
            (0.0, 0.0),
            (0.5, 0.0),
            (1.0, 0.0),
        ]);
        let mut labels = summarize(&cluster(&pts, 2.0), &pts);
        let renamed = assign_names(&mut labels, &["R1", "U2"]);
        assert_eq!(renamed, 2);
        assert_eq!(labels[0].text, "R1");
        assert!((labels[0].x_mm - 0.5).abs() < EPSILON);
        assert_eq!(labels[1].text, "U2");
    }

    #[test]
    fn short_name_list_leaves_placeholders() {
        let pts = points(&[
            (30.0, 0.0),
            (30.5, 0.0),
            (31.0, 0.0),
            (0.0, 0.0),
            (0.5, 0.0),
            (1.0, 0.0),
        ]);
        let mut labels = summarize(&cluster(&pts, 2.0), &pts);
        let renamed = assign_names(&mut labels, &[String::from("C7")]);
        assert_eq!(renamed, 1);
        assert_eq!(labels[0].text, "C7");
        assert_eq!(labels[1].text, "Pos(30.5,0.0)");
    }

    #[test]
    fn surplus_names_are_ignored() {
        let pts = points(&[(0.0, 0.0), (0.5, 0.0), (1.0, 0.0)]);
        let mut labels = summarize(&cluster(&pts, 2.0), &pts);
        let renamed = assign_names(&mut labels, &["D1", "D2", "D3"]);
        assert_eq!(renamed, 1);
        assert_eq!(labels[0].text, "D1");
    }

    #[test]
    fn out_of_range_indices_are_skipped() {
        let pts = points(&[(0.0, 0.0), (0.5, 0.0), (1.0, 0.0)]);
        let clusters = cluster(&pts, 2.0);
        let labels = summarize(&clusters, &pts[..1]);
        assert_eq!(labels.len(), 1);
        assert!(labels[0].size_mm.abs() < EPSILON);
    }
}
