// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subtracting tab zones from linear outline elements
//!
//! Each path or ring is clipped as an open string against the filled zone
//! rectangle with i_overlay, keeping what lies outside. The rectangle is
//! closed: linework running along its edge is removed, contact of zero length
//! splits nothing.
//!
//! i_overlay hands back fragments in its own order and on its own integer
//! grid. Fragments are snapped back onto the input vertices, put in the order
//! they appear along the input and re-joined where they touch. A ring that
//! loses a piece comes back as open paths, with the fragments on either side
//! of its start vertex joined, so a ring crossed by one band at two places
//! yields exactly two paths.

use std::fmt;

use i_overlay::core::fill_rule::FillRule;
use i_overlay::float::clip::FloatClip;
use i_overlay::string::clip::ClipRule;
use nalgebra::{Point2, Vector2};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::layout::TabZone;
use crate::outline::{BoundingBox, Outline, Primitive, PrimitiveKind, EPSILON_2D};

/// Snapping tolerance relative to the extent of the geometry involved.
/// i_overlay works on a 2^29 grid over that extent, so this stays well above
/// its rounding.
const RELATIVE_TOLERANCE: f64 = 1e-7;

/// Everything outside the zone, edges on the zone boundary excluded
const OUTSIDE_CLOSED: ClipRule = ClipRule {
    invert: true,
    boundary_included: true,
};

/// Non-fatal problem found while cutting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CutWarning {
    /// Element at `index` is not a path or ring and was dropped
    UnsupportedPrimitive { index: usize, kind: PrimitiveKind },
}

impl fmt::Display for CutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedPrimitive { index, kind } => write!(
                f,
                "element {index} is a {kind}; only paths and rings can be cut, element dropped"
            ),
        }
    }
}

/// Result of subtracting one zone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutOutcome {
    /// Surviving fragments, in input order
    pub primitives: Vec<Primitive>,
    pub warnings: Vec<CutWarning>,
}

/// Subtract `zone` from every path and ring in `primitives`
///
/// Unsupported primitives are dropped and reported in
/// [`CutOutcome::warnings`]. The output is not re-flattened.
pub fn subtract_zone(primitives: &[Primitive], zone: &TabZone) -> CutOutcome {
    let mut outcome = CutOutcome {
        primitives: Vec::with_capacity(primitives.len()),
        warnings: Vec::new(),
    };

    for (index, primitive) in primitives.iter().enumerate() {
        match primitive {
            Primitive::Path(points) => {
                outcome.primitives.extend(subtract_from_path(points, zone));
            }
            Primitive::Ring(points) => {
                outcome.primitives.extend(subtract_from_ring(points, zone));
            }
            other => {
                let kind = other.kind();
                tracing::warn!(index, %kind, "Cutter skipped unsupported primitive");
                outcome
                    .warnings
                    .push(CutWarning::UnsupportedPrimitive { index, kind });
            }
        }
    }

    outcome
}

/// Union cut fragments into one outline
///
/// Linework already covered by an earlier fragment is dissolved, so an edge
/// shared by two neighbouring parts is kept once. Fragments without length
/// are dropped. A ring that loses linework becomes open paths.
pub fn merge_primitives(primitives: Vec<Primitive>) -> Outline {
    let tol = tolerance(BoundingBox::of_primitives(&primitives));
    let mut covered = CoverageIndex::default();
    let mut kept: Vec<Primitive> = Vec::with_capacity(primitives.len());

    for primitive in primitives {
        match primitive {
            Primitive::Path(points) if path_length(&points) > tol => {
                match covered.dissolve(&points, tol) {
                    Some(pieces) => kept.extend(pieces.into_iter().map(Primitive::Path)),
                    None => kept.push(Primitive::Path(points)),
                }
            }
            Primitive::Ring(points) if path_length(&points) > tol => {
                let closed = close_ring(&points);
                match covered.dissolve(&closed, tol) {
                    Some(pieces) => kept.extend(
                        join_at_start(pieces, &closed[0], tol)
                            .into_iter()
                            .map(Primitive::Path),
                    ),
                    None => kept.push(Primitive::Ring(points)),
                }
            }
            Primitive::Path(_) | Primitive::Ring(_) => {}
            other => kept.push(other),
        }
    }

    Outline::from(kept)
}

fn subtract_from_path(points: &[Point2<f64>], zone: &TabZone) -> Vec<Primitive> {
    if !may_intersect(points, zone) {
        return vec![Primitive::Path(points.to_vec())];
    }
    let tol = cut_tolerance(points, zone);
    match clip_outside(points, zone, tol) {
        Some(pieces) => pieces.into_iter().map(Primitive::Path).collect(),
        None => vec![Primitive::Path(points.to_vec())],
    }
}

fn subtract_from_ring(points: &[Point2<f64>], zone: &TabZone) -> Vec<Primitive> {
    if !may_intersect(points, zone) {
        return vec![Primitive::Ring(points.to_vec())];
    }

    let closed = close_ring(points);
    let tol = cut_tolerance(&closed, zone);
    let Some(pieces) = clip_outside(&closed, zone, tol) else {
        return vec![Primitive::Ring(points.to_vec())];
    };

    join_at_start(pieces, &closed[0], tol)
        .into_iter()
        .map(Primitive::Path)
        .collect()
}

/// Parts of the polyline outside `zone`, in order along it.
///
/// Returns `None` when nothing was removed.
fn clip_outside(points: &[Point2<f64>], zone: &TabZone, tol: f64) -> Option<Vec<Vec<Point2<f64>>>> {
    let subject: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
    let mut rect: Vec<[f64; 2]> = zone
        .to_polygon()
        .exterior
        .iter()
        .map(|p| [p.x, p.y])
        .collect();
    // Contours are closed implicitly
    rect.pop();

    let clipped: Vec<Vec<[f64; 2]>> = subject.clip_by(&rect, FillRule::NonZero, OUTSIDE_CLOSED);

    let mut located: Vec<(f64, Vec<Point2<f64>>)> = clipped
        .into_iter()
        .filter_map(|piece| {
            let mut snapped = Vec::with_capacity(piece.len());
            for [x, y] in piece {
                push_unique(&mut snapped, snap(points, Point2::new(x, y), tol), tol);
            }
            (snapped.len() >= 2).then(|| (locate(points, &snapped[0], tol), snapped))
        })
        .collect();
    located.sort_by(|a, b| a.0.total_cmp(&b.0));

    let pieces = stitch(located.into_iter().map(|(_, piece)| piece), tol);
    let kept: f64 = pieces.iter().map(|piece| path_length(piece)).sum();
    if path_length(points) - kept <= tol * points.len() as f64 {
        return None;
    }

    Some(
        pieces
            .into_iter()
            .filter(|piece| path_length(piece) > tol)
            .collect(),
    )
}

/// Put the fragment running through the ring's start vertex first, joining
/// the two halves when the start vertex survived as a fragment boundary.
fn join_at_start(
    mut pieces: Vec<Vec<Point2<f64>>>,
    origin: &Point2<f64>,
    tol: f64,
) -> Vec<Vec<Point2<f64>>> {
    if pieces.len() >= 2 {
        let starts_at_origin = pieces[0].first().is_some_and(|p| near(p, origin, tol));
        let ends_at_origin = pieces[pieces.len() - 1]
            .last()
            .is_some_and(|p| near(p, origin, tol));
        if starts_at_origin && ends_at_origin {
            let head = pieces.remove(0);
            if let Some(tail) = pieces.last_mut() {
                tail.extend_from_slice(&head[1..]);
            }
            if let Some(joined) = pieces.pop() {
                pieces.insert(0, joined);
            }
            return pieces;
        }
    }

    let through_origin = pieces.iter().position(|piece| {
        piece.len() > 2 && piece[1..piece.len() - 1].iter().any(|p| near(p, origin, tol))
    });
    if let Some(index) = through_origin {
        pieces[..=index].rotate_right(1);
    }
    pieces
}

/// Join consecutive fragments that end where the next one starts
fn stitch(pieces: impl IntoIterator<Item = Vec<Point2<f64>>>, tol: f64) -> Vec<Vec<Point2<f64>>> {
    let mut out: Vec<Vec<Point2<f64>>> = Vec::new();
    for piece in pieces {
        if let Some(last) = out.last_mut() {
            if last.last().is_some_and(|p| near(p, &piece[0], tol)) {
                last.extend_from_slice(&piece[1..]);
                continue;
            }
        }
        out.push(piece);
    }
    out
}

/// Position of `p` along the polyline as `segment index + parameter`
fn locate(points: &[Point2<f64>], p: &Point2<f64>, tol: f64) -> f64 {
    let mut best_distance = f64::INFINITY;
    let mut best_key = 0.0;
    for (i, w) in points.windows(2).enumerate() {
        let d = w[1] - w[0];
        let len2 = d.norm_squared();
        let t = if len2 > 0.0 {
            ((p - w[0]).dot(&d) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let distance = (w[0] + d * t - p).norm();
        // First match wins so the start of a ring keys to 0
        if distance < best_distance - tol {
            best_distance = distance;
            best_key = i as f64 + t;
        }
    }
    best_key
}

fn snap(vertices: &[Point2<f64>], p: Point2<f64>, tol: f64) -> Point2<f64> {
    vertices
        .iter()
        .find(|v| (**v - p).norm() <= tol)
        .copied()
        .unwrap_or(p)
}

fn may_intersect(points: &[Point2<f64>], zone: &TabZone) -> bool {
    BoundingBox::of_points(points)
        .map(|bbox| bbox.overlaps(&zone.bounds()))
        .unwrap_or(false)
}

fn cut_tolerance(points: &[Point2<f64>], zone: &TabZone) -> f64 {
    let zone_bounds = zone.bounds();
    tolerance(Some(
        BoundingBox::of_points(points).map_or(zone_bounds, |bbox| bbox.union(&zone_bounds)),
    ))
}

fn tolerance(bbox: Option<BoundingBox>) -> f64 {
    let extent = bbox.map_or(0.0, |b| b.width().max(b.height()));
    (extent * RELATIVE_TOLERANCE).max(EPSILON_2D)
}

fn close_ring(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut closed = points.to_vec();
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if !near(first, last, EPSILON_2D) {
            closed.push(*first);
        }
    }
    closed
}

fn near(a: &Point2<f64>, b: &Point2<f64>, tol: f64) -> bool {
    (a - b).norm() <= tol
}

fn push_unique(path: &mut Vec<Point2<f64>>, p: Point2<f64>, tol: f64) {
    if path.last().map_or(true, |last| !near(last, &p, tol)) {
        path.push(p);
    }
}

fn finish_piece(pieces: &mut Vec<Vec<Point2<f64>>>, current: &mut Vec<Point2<f64>>, tol: f64) {
    let piece = std::mem::take(current);
    if piece.len() >= 2 && path_length(&piece) > tol {
        pieces.push(piece);
    }
}

fn path_length(points: &[Point2<f64>]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}

/// Supporting line of a segment: canonical direction and offset, quantized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct LineKey {
    dx: i64,
    dy: i64,
    offset: i64,
}

const DIRECTION_QUANTUM: f64 = 1e-6;

/// Intervals of linework already emitted, per supporting line
#[derive(Default)]
struct CoverageIndex {
    lines: FxHashMap<LineKey, Vec<(f64, f64)>>,
}

impl CoverageIndex {
    /// Remove already covered linework from a polyline and record the rest.
    ///
    /// Returns `None` when nothing was covered.
    fn dissolve(&mut self, points: &[Point2<f64>], tol: f64) -> Option<Vec<Vec<Point2<f64>>>> {
        let mut pieces = Vec::new();
        let mut current: Vec<Point2<f64>> = Vec::new();
        let mut removed = false;

        for w in points.windows(2) {
            let (a, b) = (w[0], w[1]);
            let Some((key, sa, sb)) = line_key(&a, &b, tol) else {
                continue;
            };
            let (lo, hi) = (sa.min(sb), sa.max(sb));
            let intervals = self.lines.entry(key).or_default();
            let mut free = uncovered(lo, hi, intervals, tol);
            intervals.push((lo, hi));

            if free.len() == 1 && free[0] == (lo, hi) {
                push_unique(&mut current, a, tol);
                push_unique(&mut current, b, tol);
                continue;
            }

            removed = true;
            if sa > sb {
                free.reverse();
            }
            for (s0, s1) in free {
                let (start, end) = if sa <= sb { (s0, s1) } else { (s1, s0) };
                let start_point = point_at(&a, &b, sa, sb, start);
                if !current.last().is_some_and(|p| near(p, &start_point, tol)) {
                    finish_piece(&mut pieces, &mut current, tol);
                    current.push(start_point);
                }
                push_unique(&mut current, point_at(&a, &b, sa, sb, end), tol);
            }
            if !current.last().is_some_and(|p| near(p, &b, tol)) {
                finish_piece(&mut pieces, &mut current, tol);
            }
        }
        finish_piece(&mut pieces, &mut current, tol);

        removed.then_some(pieces)
    }
}

/// Key of the line through `a` and `b` plus the positions of both ends on it
fn line_key(a: &Point2<f64>, b: &Point2<f64>, tol: f64) -> Option<(LineKey, f64, f64)> {
    let d = b - a;
    let len = d.norm();
    if len <= tol {
        return None;
    }
    let mut u: Vector2<f64> = d / len;
    if u.x < -EPSILON_2D || (u.x.abs() <= EPSILON_2D && u.y < 0.0) {
        u = -u;
    }
    let offset = u.x * a.y - u.y * a.x;
    let key = LineKey {
        dx: (u.x / DIRECTION_QUANTUM).round() as i64,
        dy: (u.y / DIRECTION_QUANTUM).round() as i64,
        offset: (offset / tol).round() as i64,
    };
    Some((key, u.dot(&a.coords), u.dot(&b.coords)))
}

/// Parts of `[lo, hi]` not covered by any interval
fn uncovered(lo: f64, hi: f64, covered: &[(f64, f64)], tol: f64) -> Vec<(f64, f64)> {
    let mut free = vec![(lo, hi)];
    for &(c0, c1) in covered {
        free = free
            .into_iter()
            .flat_map(|(f0, f1)| {
                let mut parts: SmallVec<[(f64, f64); 2]> = SmallVec::new();
                if c1 <= f0 + tol || c0 >= f1 - tol {
                    parts.push((f0, f1));
                } else {
                    if c0 > f0 + tol {
                        parts.push((f0, c0));
                    }
                    if c1 < f1 - tol {
                        parts.push((c1, f1));
                    }
                }
                parts
            })
            .collect();
    }
    free
}

fn point_at(a: &Point2<f64>, b: &Point2<f64>, sa: f64, sb: f64, s: f64) -> Point2<f64> {
    if s == sa {
        *a
    } else if s == sb {
        *b
    } else {
        a + (b - a) * ((s - sa) / (sb - sa))
    }
}
