//! R-tree over the segments of a route path.
//!
//! Segments are stored in [`LocalFrame`][nav_core::LocalFrame] metres.  A
//! nearest query walks candidates in increasing distance and stops as soon as
//! they get farther than the best hit, so long routes cost `O(log n)` per fix
//! instead of a scan over every segment.
//!
//! # Ties
//!
//! A self-intersecting route can have several segments at the same minimum
//! distance.  The hit with the smallest segment index (earliest along the
//! path) wins, which keeps the projection from jumping ahead at crossings.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// Squared distances closer than this (m²) are treated as equal.
const TIE_EPSILON_M2: f64 = 1e-6;

// ── R-tree segment entry ──────────────────────────────────────────────────────

#[derive(Clone)]
struct SegmentEntry {
    a:       [f64; 2],
    b:       [f64; 2],
    segment: usize,
}

impl RTreeObject for SegmentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.a, self.b)
    }
}

impl PointDistance for SegmentEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let (_, q) = closest_on_segment(self.a, self.b, *point);
        dist_2(q, *point)
    }
}

/// Parameter `t ∈ [0, 1]` and position of the point on `a→b` closest to `p`.
///
/// Degenerate (zero-length) segments return `t = 0`.
pub fn closest_on_segment(a: [f64; 2], b: [f64; 2], p: [f64; 2]) -> (f64, [f64; 2]) {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let len_2 = dx * dx + dy * dy;
    if len_2 <= f64::EPSILON {
        return (0.0, a);
    }
    let t = (((p[0] - a[0]) * dx + (p[1] - a[1]) * dy) / len_2).clamp(0.0, 1.0);
    (t, [a[0] + t * dx, a[1] + t * dy])
}

#[inline]
fn dist_2(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

// ── SegmentIndex ──────────────────────────────────────────────────────────────

/// The segment of a path nearest to a query point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SegmentHit {
    /// Segment `i` joins path vertices `i` and `i + 1`.
    pub segment:    usize,
    /// Position along the segment, `[0, 1]`.
    pub t:          f64,
    /// Squared planar distance in m².
    pub distance_2: f64,
}

/// Spatial index of a path's segments in planar metres.
#[derive(Clone)]
pub struct SegmentIndex {
    tree: RTree<SegmentEntry>,
}

impl SegmentIndex {
    /// Bulk-load the segments joining consecutive `points`.
    pub fn build(points: &[[f64; 2]]) -> Self {
        let entries: Vec<SegmentEntry> = points
            .windows(2)
            .enumerate()
            .map(|(segment, w)| SegmentEntry { a: w[0], b: w[1], segment })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Nearest segment to `xy`, earliest segment on ties.
    ///
    /// Returns `None` only for an empty index.
    pub fn nearest(&self, xy: [f64; 2]) -> Option<SegmentHit> {
        let mut best: Option<(&SegmentEntry, f64)> = None;

        for (entry, d2) in self.tree.nearest_neighbor_iter_with_distance_2(&xy) {
            match best {
                None => best = Some((entry, d2)),
                Some((_, best_d2)) if d2 > best_d2 + TIE_EPSILON_M2 => break,
                Some((best_entry, _)) if entry.segment < best_entry.segment => {
                    best = Some((entry, d2));
                }
                Some(_) => {}
            }
        }

        best.map(|(entry, d2)| {
            let (t, _) = closest_on_segment(entry.a, entry.b, xy);
            SegmentHit { segment: entry.segment, t, distance_2: d2 }
        })
    }
}
