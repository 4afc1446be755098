//! Proximity clustering of decoded silkscreen points.
//!
//! Silkscreen text arrives as strokes, so each legible label shows up as a
//! dense run of nearby points. Clusters are grown in one forward pass: a
//! cluster is seeded at the first unassigned point, and every later
//! unassigned point closer than the threshold to *any* current member joins
//! immediately, which lets long chains of short strokes end up together. A
//! point scanned before a later member joined is never revisited.

use std::collections::{BTreeSet, HashMap};

use crate::config::{ClusterStrategy, ParseOptions, DEFAULT_MIN_CLUSTER_SIZE};
use crate::gerber::DecodedPoint;

/// Indices into the point stream, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    members: Vec<usize>,
}

impl Cluster {
    /// Member indices in ascending order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Number of member points.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; a cluster holds at least its seed.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Retained clusters plus counts of what was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterOutcome {
    /// Clusters that met the minimum size, in discovery order.
    pub clusters: Vec<Cluster>,
    /// Clusters formed before the size gate.
    pub formed: usize,
    /// Points that ended up in discarded clusters.
    pub discarded_points: usize,
}

/// Clusters `points` with the linear strategy and the default size gate.
pub fn cluster(points: &[DecodedPoint], threshold_mm: f64) -> Vec<Cluster> {
    gate(
        form_linear(points, threshold_mm),
        DEFAULT_MIN_CLUSTER_SIZE,
    )
    .clusters
}

/// Clusters `points` using the threshold, size gate and strategy in
/// `options`. Both strategies produce identical membership.
pub fn cluster_with(points: &[DecodedPoint], options: &ParseOptions) -> ClusterOutcome {
    let formed = match options.strategy {
        ClusterStrategy::Linear => form_linear(points, options.cluster_threshold_mm),
        ClusterStrategy::Grid => form_grid(points, options.cluster_threshold_mm),
    };
    let outcome = gate(formed, options.min_cluster_size);
    tracing::debug!(
        formed = outcome.formed,
        retained = outcome.clusters.len(),
        discarded_points = outcome.discarded_points,
        "clustered points"
    );
    outcome
}

fn gate(formed: Vec<Cluster>, min_size: usize) -> ClusterOutcome {
    let formed_count = formed.len();
    let (clusters, dropped): (Vec<Cluster>, Vec<Cluster>) =
        formed.into_iter().partition(|c| c.len() >= min_size);
    ClusterOutcome {
        clusters,
        formed: formed_count,
        discarded_points: dropped.iter().map(Cluster::len).sum(),
    }
}

fn is_assigned(assigned: &[bool], index: usize) -> bool {
    assigned.get(index).copied().unwrap_or(true)
}

fn mark(assigned: &mut [bool], index: usize) {
    if let Some(slot) = assigned.get_mut(index) {
        *slot = true;
    }
}

fn within(points: &[DecodedPoint], a: usize, b: usize, threshold_mm: f64) -> bool {
    match (points.get(a), points.get(b)) {
        (Some(a), Some(b)) => a.distance_to(b) < threshold_mm,
        _ => false,
    }
}

fn form_linear(points: &[DecodedPoint], threshold_mm: f64) -> Vec<Cluster> {
    let mut assigned = vec![false; points.len()];
    let mut formed = Vec::new();

    for seed in 0..points.len() {
        if is_assigned(&assigned, seed) {
            continue;
        }
        mark(&mut assigned, seed);
        let mut members = vec![seed];

        for candidate in seed + 1..points.len() {
            if is_assigned(&assigned, candidate) {
                continue;
            }
            if members
                .iter()
                .any(|&member| within(points, member, candidate, threshold_mm))
            {
                mark(&mut assigned, candidate);
                members.push(candidate);
            }
        }

        formed.push(Cluster { members });
    }

    formed
}

/// Uniform grid over the points with cells one threshold wide, so any two
/// points closer than the threshold sit in the same or adjacent cells.
struct Grid {
    cell_mm: f64,
    buckets: HashMap<(i64, i64), Vec<usize>>,
}

impl Grid {
    fn new(points: &[DecodedPoint], cell_mm: f64) -> Self {
        let mut grid = Self {
            cell_mm,
            buckets: HashMap::new(),
        };
        for (index, point) in points.iter().enumerate() {
            let key = grid.cell_of(point);
            grid.buckets.entry(key).or_default().push(index);
        }
        grid
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_of(&self, point: &DecodedPoint) -> (i64, i64) {
        (
            (point.x_mm / self.cell_mm).floor() as i64,
            (point.y_mm / self.cell_mm).floor() as i64,
        )
    }

    fn neighbours(&self, point: &DecodedPoint) -> impl Iterator<Item = usize> + '_ {
        let (cx, cy) = self.cell_of(point);
        (-1..=1)
            .flat_map(move |dx| {
                (-1..=1).map(move |dy| (cx.saturating_add(dx), cy.saturating_add(dy)))
            })
            .filter_map(|key| self.buckets.get(&key))
            .flatten()
            .copied()
    }
}

/// Same absorption order as [`form_linear`]: a point joins when some member
/// with a smaller index is within the threshold. Candidates discovered from
/// a member are always larger than it, and are absorbed smallest first.
fn form_grid(points: &[DecodedPoint], threshold_mm: f64) -> Vec<Cluster> {
    // Oversized by a hair so rounding in the division cannot put two close
    // points two cells apart.
    let grid = Grid::new(points, threshold_mm * (1.0 + 1e-9));
    let mut assigned = vec![false; points.len()];
    let mut formed = Vec::new();

    for seed in 0..points.len() {
        if is_assigned(&assigned, seed) {
            continue;
        }
        mark(&mut assigned, seed);
        let mut members = vec![seed];
        let mut candidates = BTreeSet::new();
        collect_candidates(&grid, points, seed, threshold_mm, &assigned, &mut candidates);

        while let Some(next) = candidates.pop_first() {
            if is_assigned(&assigned, next) {
                continue;
            }
            mark(&mut assigned, next);
            members.push(next);
            collect_candidates(&grid, points, next, threshold_mm, &assigned, &mut candidates);
        }

        formed.push(Cluster { members });
    }

    formed
}

fn collect_candidates(
    grid: &Grid,
    points: &[DecodedPoint],
    member: usize,
    threshold_mm: f64,
    assigned: &[bool],
    candidates: &mut BTreeSet<usize>,
) {
    let Some(origin) = points.get(member) else {
        return;
    };
    for other in grid.neighbours(origin) {
        if other > member
            && !is_assigned(assigned, other)
            && within(points, member, other, threshold_mm)
        {
            candidates.insert(other);
        }
    }
}
