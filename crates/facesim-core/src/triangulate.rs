//! Ear-clipping triangulation.
//!
//! The polygon is kept as a doubly linked ring over the input slice. Ear
//! status is computed once for every vertex and afterwards only for the two
//! neighbours of each clipped vertex, so the whole pass is O(n²) in the
//! number of boundary points. Iteration order depends only on the input
//! order, which makes the output deterministic.

use crate::landmarks::Landmark;
use glam::Vec2;

const AREA_EPSILON: f32 = 1e-12;

/// Twice the signed area of the polygon (positive when counter-clockwise).
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum()
}

#[inline]
fn corner(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - b)
}

/// Inclusive of the boundary; works for either triangle winding.
#[inline]
fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

struct Ring<'a> {
    points: &'a [Vec2],
    prev: Vec<usize>,
    next: Vec<usize>,
    orientation: f32,
}

impl Ring<'_> {
    fn corner_area(&self, i: usize) -> f32 {
        corner(
            self.points[self.prev[i]],
            self.points[i],
            self.points[self.next[i]],
        )
    }

    fn is_ear(&self, i: usize) -> bool {
        let (a, c) = (self.prev[i], self.next[i]);
        let (pa, pb, pc) = (self.points[a], self.points[i], self.points[c]);
        if corner(pa, pb, pc) * self.orientation <= AREA_EPSILON {
            return false;
        }
        let mut j = self.next[c];
        while j != a {
            let p = self.points[j];
            // Coincident duplicates of the corner itself never block it.
            if p != pa && p != pb && p != pc && point_in_triangle(p, pa, pb, pc) {
                return false;
            }
            j = self.next[j];
        }
        true
    }

    fn unlink(&mut self, i: usize) -> (usize, usize) {
        let (a, c) = (self.prev[i], self.next[i]);
        self.next[a] = c;
        self.prev[c] = a;
        (a, c)
    }

    fn find(&self, start: usize, remaining: usize, pred: impl Fn(usize) -> bool) -> Option<usize> {
        let mut cursor = start;
        for _ in 0..remaining {
            if pred(cursor) {
                return Some(cursor);
            }
            cursor = self.next[cursor];
        }
        None
    }

    /// Triangle `(prev, i, next)` wound counter-clockwise.
    fn triangle(&self, i: usize) -> [usize; 3] {
        let (a, c) = (self.prev[i], self.next[i]);
        if self.orientation > 0.0 {
            [a, i, c]
        } else {
            [a, c, i]
        }
    }
}

/// Triangulates the polygon whose boundary visits `points` in order.
///
/// Returns counter-clockwise triangles as indices into `points`. Either input
/// winding is accepted. Collinear corners are dropped without emitting
/// zero-area triangles; if a self-intersecting boundary leaves no valid ear
/// the current corner is clipped anyway, so the result always references
/// valid indices and the loop always terminates.
pub fn ear_clip(points: &[Vec2]) -> Vec<[usize; 3]> {
    let n = points.len();
    let mut triangles = Vec::with_capacity(n.saturating_sub(2));
    if n < 3 {
        return triangles;
    }
    let area = signed_area(points);
    if area.abs() <= AREA_EPSILON {
        return triangles;
    }

    let mut ring = Ring {
        points,
        prev: (0..n).map(|i| (i + n - 1) % n).collect(),
        next: (0..n).map(|i| (i + 1) % n).collect(),
        orientation: area.signum(),
    };
    let mut ear: Vec<bool> = (0..n).map(|i| ring.is_ear(i)).collect();

    let mut remaining = n;
    let mut cur = 0;
    while remaining > 3 {
        let found = ring.find(cur, remaining, |i| ear[i]);
        let clip = match found {
            Some(i) => i,
            None => {
                let flat = ring.find(cur, remaining, |i| {
                    ring.corner_area(i).abs() <= AREA_EPSILON
                });
                if let Some(flat) = flat {
                    let (a, c) = ring.unlink(flat);
                    remaining -= 1;
                    ear[a] = ring.is_ear(a);
                    ear[c] = ring.is_ear(c);
                    cur = c;
                    continue;
                }
                log::trace!("ear_clip: no ear among {remaining} corners, forcing {cur}");
                cur
            }
        };
        triangles.push(ring.triangle(clip));
        let (a, c) = ring.unlink(clip);
        remaining -= 1;
        ear[a] = ring.is_ear(a);
        ear[c] = ring.is_ear(c);
        cur = c;
    }

    if ring.corner_area(cur).abs() > AREA_EPSILON {
        triangles.push(ring.triangle(cur));
    }
    triangles
}

/// Boundary of `region` as usable landmark indices: out-of-range entries,
/// consecutive repeats and a closing repeat of the first index are removed.
pub fn usable_boundary(landmarks: &[Landmark], region: &[usize]) -> Vec<usize> {
    let mut boundary: Vec<usize> = Vec::with_capacity(region.len());
    for &index in region {
        if index >= landmarks.len() || !landmarks[index].is_finite() {
            continue;
        }
        if boundary.last() == Some(&index) {
            continue;
        }
        boundary.push(index);
    }
    while boundary.len() > 1 && boundary.first() == boundary.last() {
        boundary.pop();
    }
    boundary
}

/// Ear-clips one region in the image plane and returns landmark indices,
/// three per triangle. Regions with fewer than three usable points yield
/// nothing.
///
/// Image space has y pointing down, so the counter-clockwise triangles from
/// [`ear_clip`] are swapped to stay counter-clockwise once y is flipped into
/// mesh space.
pub fn triangulate_region(landmarks: &[Landmark], region: &[usize]) -> Vec<u32> {
    let boundary = usable_boundary(landmarks, region);
    if boundary.len() < 3 {
        log::debug!(
            "skipping region with {} usable of {} points",
            boundary.len(),
            region.len()
        );
        return Vec::new();
    }
    let points: Vec<Vec2> = boundary.iter().map(|&i| landmarks[i].xy()).collect();
    ear_clip(&points)
        .into_iter()
        .flat_map(|[a, b, c]| [boundary[a], boundary[c], boundary[b]])
        .map(|i| i as u32)
        .collect()
}
