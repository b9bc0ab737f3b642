use super::chain::Chain;
use super::shape::{Arc, Line, Shape};
use crate::math::arc_2d::{arc_from_bulge, circular_segment_area, BULGE_EPSILON};
use crate::math::Point2;

/// Bulge-encoded polyline vertex for mixed line/arc segments.
///
/// `bulge = tan(sweep_angle / 4)`:
/// - `0` = straight line to next vertex
/// - `> 0` = counter-clockwise arc to next vertex
/// - `< 0` = clockwise arc to next vertex
/// - `|bulge| = 1` = semicircle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlineVertex {
    pub x: f64,
    pub y: f64,
    pub bulge: f64,
}

impl PlineVertex {
    #[must_use]
    pub fn new(x: f64, y: f64, bulge: f64) -> Self {
        Self { x, y, bulge }
    }

    /// Creates a line vertex (bulge = 0).
    #[must_use]
    pub fn line(x: f64, y: f64) -> Self {
        Self { x, y, bulge: 0.0 }
    }

    #[must_use]
    pub fn point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    #[must_use]
    pub fn is_arc(&self) -> bool {
        self.bulge.abs() >= BULGE_EPSILON
    }
}

/// A polyline with mixed straight-line and circular-arc segments.
///
/// The working form of the offset algorithm. For closed polylines the last
/// vertex connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Pline {
    pub vertices: Vec<PlineVertex>,
    pub closed: bool,
}

impl Pline {
    /// Creates a `Pline` with all-zero bulges (line segments only).
    #[must_use]
    pub fn from_points(points: &[Point2], closed: bool) -> Self {
        let vertices = points.iter().map(|p| PlineVertex::line(p.x, p.y)).collect();
        Self { vertices, closed }
    }

    /// Encodes a chain as vertices with bulges.
    ///
    /// A closed chain drops its repeated closing point.
    #[must_use]
    pub fn from_chain(chain: &Chain) -> Self {
        let mut vertices: Vec<PlineVertex> = chain
            .shapes
            .iter()
            .map(|s| {
                let p = s.start_point();
                PlineVertex::new(p.x, p.y, s.bulge())
            })
            .collect();
        if !chain.closed {
            if let Some(last) = chain.shapes.last() {
                let p = last.end_point();
                vertices.push(PlineVertex::line(p.x, p.y));
            }
        }
        Self {
            vertices,
            closed: chain.closed,
        }
    }

    /// Decodes the polyline back into line and arc shapes.
    ///
    /// Zero-length segments are skipped.
    #[must_use]
    pub fn to_chain(&self) -> Chain {
        let n = self.vertices.len();
        let mut shapes = Vec::with_capacity(n);
        for i in 0..self.segment_count() {
            let v0 = &self.vertices[i];
            let v1 = &self.vertices[(i + 1) % n];
            let (p0, p1) = (v0.point(), v1.point());
            if (p1 - p0).norm() < BULGE_EPSILON {
                continue;
            }
            if v0.is_arc() {
                shapes.push(Shape::Arc(Arc::from_bulge(&p0, &p1, v0.bulge)));
            } else {
                shapes.push(Shape::Line(Line::new(p0, p1)));
            }
        }
        Chain::new(shapes)
    }

    /// Exact signed area of a closed polyline, arcs included.
    ///
    /// Positive for counter-clockwise. Open polylines are treated as closed.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        if n < 2 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..n {
            let v0 = &self.vertices[i];
            let v1 = &self.vertices[(i + 1) % n];
            area += 0.5 * (v0.x * v1.y - v1.x * v0.y);
            if v0.is_arc() && (i + 1 < n || self.closed) {
                let arc = arc_from_bulge(&v0.point(), &v1.point(), v0.bulge);
                area += circular_segment_area(arc.radius, arc.sweep);
            }
        }
        area
    }

    /// Returns a new polyline with vertices in reverse order and negated bulges.
    ///
    /// For a segment `v[i] → v[i+1]` with bulge `b`, the reversed segment
    /// `v[i+1] → v[i]` has bulge `-b`.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let m = self.vertices.len();
        if m == 0 {
            return self.clone();
        }
        let mut vertices = Vec::with_capacity(m);
        if self.closed {
            // Keep the closing segment: v[0] stays first, walking backwards.
            for j in 0..m {
                let idx = (m - j) % m;
                let prev = (idx + m - 1) % m;
                let v = &self.vertices[idx];
                vertices.push(PlineVertex::new(v.x, v.y, -self.vertices[prev].bulge));
            }
        } else {
            for j in 0..m {
                let v = &self.vertices[m - 1 - j];
                let bulge = if j < m - 1 {
                    -self.vertices[m - 2 - j].bulge
                } else {
                    0.0
                };
                vertices.push(PlineVertex::new(v.x, v.y, bulge));
            }
        }
        Self {
            vertices,
            closed: self.closed,
        }
    }

    /// Returns the number of segments in this polyline.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        let n = self.vertices.len();
        if n < 2 {
            return 0;
        }
        if self.closed {
            n
        } else {
            n - 1
        }
    }
}
