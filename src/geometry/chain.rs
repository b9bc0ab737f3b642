use std::f64::consts::PI;

use super::bbox::Aabb;
use super::pline::Pline;
use super::shape::Shape;
use crate::math::{points_coincide, Point2, EPSILON};

/// Winding direction of a closed outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
}

impl Orientation {
    /// Orientation implied by a signed area; zero area counts as counter-clockwise.
    #[must_use]
    pub fn from_signed_area(area: f64) -> Self {
        if area < 0.0 {
            Self::Clockwise
        } else {
            Self::CounterClockwise
        }
    }

    #[must_use]
    pub fn is_clockwise(self) -> bool {
        self == Self::Clockwise
    }
}

/// An ordered run of connected shapes, each one starting where the previous ends.
///
/// `closed` holds iff the first start coincides with the last end.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub shapes: Vec<Shape>,
    pub closed: bool,
}

impl Chain {
    /// Creates a chain, deriving `closed` from its endpoints.
    #[must_use]
    pub fn new(shapes: Vec<Shape>) -> Self {
        let closed = match (shapes.first(), shapes.last()) {
            (Some(first), Some(last)) => {
                points_coincide(&first.start_point(), &last.end_point())
            }
            _ => false,
        };
        Self { shapes, closed }
    }

    #[must_use]
    pub fn start_point(&self) -> Option<Point2> {
        self.shapes.first().map(Shape::start_point)
    }

    #[must_use]
    pub fn end_point(&self) -> Option<Point2> {
        self.shapes.last().map(Shape::end_point)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Polyline vertices: each shape's start, plus the final end when open.
    #[must_use]
    pub fn vertices(&self) -> Vec<Point2> {
        let mut vertices: Vec<Point2> = self.shapes.iter().map(Shape::start_point).collect();
        if !self.closed {
            vertices.extend(self.end_point());
        }
        vertices
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.shapes.iter().map(Shape::length).sum()
    }

    /// Exact signed area enclosed by the chain, arcs included.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        Pline::from_chain(self).signed_area()
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        Orientation::from_signed_area(self.signed_area())
    }

    /// Returns the chain traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            shapes: self.shapes.iter().rev().map(Shape::reversed).collect(),
            closed: self.closed,
        }
    }

    /// Returns a closed chain restarted `k` shapes later.
    #[must_use]
    pub fn rotated(&self, k: usize) -> Self {
        let mut shapes = self.shapes.clone();
        if !shapes.is_empty() {
            let k = k % shapes.len();
            shapes.rotate_left(k);
        }
        Self {
            shapes,
            closed: self.closed,
        }
    }

    /// Bounding box of every shape, or `None` for an empty chain.
    #[must_use]
    pub fn bbox(&self) -> Option<Aabb> {
        self.shapes
            .iter()
            .map(Shape::bbox)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Returns `true` if `p` lies inside this closed chain or within
    /// [`EPSILON`] of its boundary.
    ///
    /// Winding number over the exact lines and arcs.
    #[must_use]
    pub fn contains_point(&self, p: &Point2) -> bool {
        if !self.closed {
            return false;
        }
        if self.shapes.iter().any(|s| s.distance_to(p) <= EPSILON) {
            return true;
        }
        let winding: f64 = self.shapes.iter().map(|s| s.subtended_angle(p)).sum();
        winding.abs() > PI
    }

    /// Returns `true` if `other` lies entirely inside or on this closed chain.
    ///
    /// Open chains are tested on their vertices. Closed chains are tested
    /// shape by shape, so an edge leaving through a notch is caught even
    /// when both of its ends are inside.
    #[must_use]
    pub fn contains_chain(&self, other: &Self) -> bool {
        if !self.closed || other.is_empty() {
            return false;
        }
        let (Some(outer), Some(inner)) = (self.bbox(), other.bbox()) else {
            return false;
        };
        if !outer.grown(EPSILON).contains(&inner) {
            return false;
        }
        if other.closed {
            other.shapes.iter().all(|s| self.contains_shape(s))
        } else {
            other.vertices().iter().all(|p| self.contains_point(p))
        }
    }

    /// Both ends of `shape`, and the middle of every piece between its
    /// crossings with the boundary, lie inside or on it.
    fn contains_shape(&self, shape: &Shape) -> bool {
        if !self.contains_point(&shape.start_point()) || !self.contains_point(&shape.end_point()) {
            return false;
        }
        let mut cuts = vec![0.0, 1.0];
        for edge in &self.shapes {
            cuts.extend(shape.crossing_params(edge));
        }
        cuts.sort_by(f64::total_cmp);
        cuts.windows(2)
            .all(|w| self.contains_point(&shape.point_at(0.5 * (w[0] + w[1]))))
    }
}
