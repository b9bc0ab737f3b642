use tracing::debug;

use crate::geometry::{Chain, Line, Shape};
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::polygon_2d::turning_angle;
use crate::math::{Point2, EPSILON};

/// Removes redundant near-colinear vertices from a chain.
///
/// Arcs are kept as they are and every run of consecutive lines is reduced
/// with Ramer–Douglas–Peucker at tolerance [`EPSILON`], which also absorbs
/// lines no longer than [`EPSILON`] into their neighbours. A lone short line
/// between two arcs stays, so the chain remains connected. The result never
/// has more shapes than the input.
#[derive(Debug)]
pub struct SimplifyChain<'a> {
    chain: &'a Chain,
}

impl<'a> SimplifyChain<'a> {
    #[must_use]
    pub fn new(chain: &'a Chain) -> Self {
        Self { chain }
    }

    #[must_use]
    pub fn execute(&self) -> Chain {
        let shapes = self.chain.shapes.clone();
        if shapes.is_empty() {
            return self.chain.clone();
        }

        let closed = self.chain.closed;
        let simplified = if closed && shapes.iter().all(|s| !s.is_arc()) {
            simplify_closed_polygon(&shapes)
        } else {
            let shapes = if closed { seat_at_run_start(shapes) } else { shapes };
            simplify_runs(&shapes)
        };

        debug!(
            before = self.chain.len(),
            after = simplified.len(),
            "simplified chain"
        );
        Chain {
            shapes: simplified,
            closed,
        }
    }
}

/// Rotates a closed mixed chain so that no line run wraps across the seam.
fn seat_at_run_start(mut shapes: Vec<Shape>) -> Vec<Shape> {
    let n = shapes.len();
    if let Some(k) = (0..n).find(|&k| shapes[k].is_arc() != shapes[(k + n - 1) % n].is_arc()) {
        shapes.rotate_left(k);
    }
    shapes
}

fn simplify_runs(shapes: &[Shape]) -> Vec<Shape> {
    let mut out = Vec::with_capacity(shapes.len());
    let mut i = 0;
    while i < shapes.len() {
        if shapes[i].is_arc() {
            out.push(shapes[i]);
            i += 1;
            continue;
        }
        let run_end = shapes[i..]
            .iter()
            .position(Shape::is_arc)
            .map_or(shapes.len(), |p| i + p);
        let run = &shapes[i..run_end];
        if run.len() < 2 {
            out.extend_from_slice(run);
        } else {
            let mut points = vec![run[0].start_point()];
            points.extend(run.iter().map(Shape::end_point));
            out.extend(lines_through(&reduce(&points)));
        }
        i = run_end;
    }
    out
}

/// A closed all-line chain, seated at its sharpest corner before reduction.
fn simplify_closed_polygon(shapes: &[Shape]) -> Vec<Shape> {
    let ring: Vec<Point2> = shapes.iter().map(Shape::start_point).collect();
    let n = ring.len();
    if n < 3 {
        return shapes.to_vec();
    }

    let mut seat = 0;
    let mut sharpest = f64::NEG_INFINITY;
    for k in 0..n {
        let angle = turning_angle(&ring[(k + n - 1) % n], &ring[k], &ring[(k + 1) % n]);
        if angle > sharpest {
            sharpest = angle;
            seat = k;
        }
    }

    let mut points: Vec<Point2> = ring[seat..].iter().chain(&ring[..seat]).copied().collect();
    points.push(points[0]);
    let mut reduced = reduce(&points);

    // reduced = [v0, .., vm, v0]; the seam v0 goes if it sits on the v_m → v1 chord.
    if reduced.len() > 4 {
        let m = reduced.len() - 2;
        if point_to_segment_dist(&reduced[0], &reduced[m], &reduced[1]) <= EPSILON {
            reduced.pop();
            reduced.remove(0);
            reduced.push(reduced[0]);
        }
    }
    lines_through(&reduced)
}

/// Explicit-stack Ramer–Douglas–Peucker; keeps both ends.
fn reduce(points: &[Point2]) -> Vec<Point2> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0, n - 1)];
    while let Some((i, j)) = stack.pop() {
        if j <= i + 1 {
            continue;
        }
        let mut farthest = i;
        let mut max_dist = 0.0;
        for k in i + 1..j {
            // Degenerates to point distance when the chord ends coincide.
            let dist = point_to_segment_dist(&points[k], &points[i], &points[j]);
            if dist > max_dist {
                max_dist = dist;
                farthest = k;
            }
        }
        if max_dist > EPSILON {
            keep[farthest] = true;
            stack.push((farthest, j));
            stack.push((i, farthest));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

fn lines_through(points: &[Point2]) -> Vec<Shape> {
    points
        .windows(2)
        .map(|w| Shape::Line(Line::new(w[0], w[1])))
        .collect()
}
