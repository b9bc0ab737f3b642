use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::bbox::Aabb;
use crate::math::arc_2d::{bulge_from_sweep, ArcParams};
use crate::math::distance_2d::{angle_in_arc_range, point_to_arc_dist, point_to_segment_dist};
use crate::math::intersect_2d::{
    arc_arc_intersect_2d, line_arc_intersect_2d, segment_segment_intersect_2d,
};
use crate::math::polygon_2d::subtended_angle;
use crate::math::{normalize_angle, points_coincide, right_normal, Point2, EPSILON, TOLERANCE};

/// One of the two ends of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum End {
    Start,
    End,
}

impl End {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// A straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
}

impl Line {
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Returns the same line traversed the other way.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }
}

/// A circular arc.
///
/// With `reversed == false` the arc sweeps counter-clockwise from
/// `start_angle` to `end_angle`; with `reversed == true` it sweeps clockwise.
/// The start point is always at `start_angle`. Angles are kept in `[0, 2π)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub center: Point2,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub reversed: bool,
}

impl Arc {
    #[must_use]
    pub fn new(center: Point2, radius: f64, start_angle: f64, end_angle: f64, reversed: bool) -> Self {
        Self {
            center,
            radius,
            start_angle: normalize_angle(start_angle),
            end_angle: normalize_angle(end_angle),
            reversed,
        }
    }

    /// Builds the arc described by a bulge segment from `p0` to `p1`.
    #[must_use]
    pub fn from_bulge(p0: &Point2, p1: &Point2, bulge: f64) -> Self {
        let params = crate::math::arc_2d::arc_from_bulge(p0, p1, bulge);
        Self::new(
            params.center,
            params.radius,
            params.start_angle,
            params.start_angle + params.sweep,
            params.sweep < 0.0,
        )
    }

    /// Center-radius-sweep form used by the intersection routines.
    #[must_use]
    pub fn params(&self) -> ArcParams {
        ArcParams {
            center: self.center,
            radius: self.radius,
            start_angle: self.start_angle,
            sweep: self.signed_sweep(),
        }
    }

    #[must_use]
    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    #[must_use]
    pub fn start_point(&self) -> Point2 {
        self.point_at_angle(self.start_angle)
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        self.point_at_angle(self.end_angle)
    }

    /// Unsigned included angle in `[0, 2π)`.
    #[must_use]
    pub fn angle_length(&self) -> f64 {
        if self.reversed {
            normalize_angle(self.start_angle - self.end_angle)
        } else {
            normalize_angle(self.end_angle - self.start_angle)
        }
    }

    /// Point halfway along the sweep.
    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        self.point_at_angle(self.start_angle + self.signed_sweep() / 2.0)
    }

    /// Included angle, negative for clockwise arcs.
    #[must_use]
    pub fn signed_sweep(&self) -> f64 {
        if self.reversed {
            -self.angle_length()
        } else {
            self.angle_length()
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.angle_length()
    }

    /// Returns the same arc traversed the other way.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            center: self.center,
            radius: self.radius,
            start_angle: self.end_angle,
            end_angle: self.start_angle,
            reversed: !self.reversed,
        }
    }

    /// Returns `true` if `angle` lies within the swept range.
    #[must_use]
    pub fn contains_angle(&self, angle: f64) -> bool {
        angle_in_arc_range(angle, self.start_angle, self.signed_sweep())
    }

    /// Rebuilds the arc so that `end` lands on `new_point`.
    ///
    /// The opposite end stays where it is; the included angle and sweep
    /// direction are preserved, so center and radius move instead.
    #[must_use]
    pub fn with_endpoint(&self, end: End, new_point: Point2) -> Self {
        let fixed = match end {
            End::Start => self.end_point(),
            End::End => self.start_point(),
        };
        let chord = fixed - new_point;
        let chord_len = chord.norm();
        if chord_len < TOLERANCE {
            return *self;
        }

        let half = chord_len / 2.0;
        let v = chord / chord_len;
        let d = half / (self.angle_length() / 2.0).tan();
        let f = if (end == End::Start) ^ self.reversed {
            1.0
        } else {
            -1.0
        };
        let center = new_point + v * half - right_normal(&v) * (f * d);

        let moved_angle = (new_point.y - center.y).atan2(new_point.x - center.x);
        let fixed_angle = (fixed.y - center.y).atan2(fixed.x - center.x);
        let (start_angle, end_angle) = match end {
            End::Start => (moved_angle, fixed_angle),
            End::End => (fixed_angle, moved_angle),
        };
        Self::new(
            center,
            (new_point - center).norm(),
            start_angle,
            end_angle,
            self.reversed,
        )
    }

    /// Bounding box including the quadrant extremes the arc passes through.
    #[must_use]
    pub fn bbox(&self) -> Aabb {
        let mut bbox = Aabb::from_corners(self.start_point(), self.end_point());
        for k in 0..4 {
            let angle = f64::from(k) * FRAC_PI_2;
            if self.contains_angle(angle) {
                bbox = bbox.including(&self.point_at_angle(angle));
            }
        }
        bbox
    }

    /// Signed angle the arc sweeps around `p`, which must lie off the arc.
    ///
    /// Equal to the chord's angle, plus a full turn when `p` sits in the
    /// circular segment between chord and arc.
    #[must_use]
    pub fn subtended_angle(&self, p: &Point2) -> f64 {
        let (a, b) = (self.start_point(), self.end_point());
        let chord = b - a;
        let bulge_side = chord.perp(&(self.midpoint() - a));
        let (u, v) = (a - p, b - p);
        if u.perp(&v).abs() <= f64::EPSILON * u.norm() * v.norm() && u.dot(&v) < 0.0 {
            // On the open chord the arc passes half way round.
            return if bulge_side > 0.0 { -PI } else { PI };
        }
        let angle = subtended_angle(p, &a, &b);
        let in_segment =
            (p - self.center).norm() < self.radius && chord.perp(&(p - a)) * bulge_side > 0.0;
        if in_segment {
            angle + TAU * self.signed_sweep().signum()
        } else {
            angle
        }
    }

    /// Center, radius, included angle and midpoint agree within [`EPSILON`].
    ///
    /// The midpoint separates the two halves of a circle, which share
    /// everything else.
    #[must_use]
    pub fn equals_fuzzy(&self, other: &Self) -> bool {
        points_coincide(&self.center, &other.center)
            && (self.radius - other.radius).abs() <= EPSILON
            && (self.angle_length() - other.angle_length()).abs() <= EPSILON
            && points_coincide(&self.midpoint(), &other.midpoint())
    }
}

/// A drawable segment: either a line or an arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Line(Line),
    Arc(Arc),
}

impl Shape {
    #[must_use]
    pub fn start_point(&self) -> Point2 {
        match self {
            Self::Line(l) => l.start,
            Self::Arc(a) => a.start_point(),
        }
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        match self {
            Self::Line(l) => l.end,
            Self::Arc(a) => a.end_point(),
        }
    }

    #[must_use]
    pub fn point(&self, end: End) -> Point2 {
        match end {
            End::Start => self.start_point(),
            End::End => self.end_point(),
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Line(l) => l.length(),
            Self::Arc(a) => a.length(),
        }
    }

    #[must_use]
    pub fn is_arc(&self) -> bool {
        matches!(self, Self::Arc(_))
    }

    /// Returns the shape traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        match self {
            Self::Line(l) => Self::Line(l.flipped()),
            Self::Arc(a) => Self::Arc(a.flipped()),
        }
    }

    /// Moves one end onto `point`. Lines take the point verbatim; arcs are
    /// reconstructed around it.
    #[must_use]
    pub fn with_endpoint(&self, end: End, point: Point2) -> Self {
        match (self, end) {
            (Self::Line(l), End::Start) => Self::Line(Line::new(point, l.end)),
            (Self::Line(l), End::End) => Self::Line(Line::new(l.start, point)),
            (Self::Arc(a), _) => Self::Arc(a.with_endpoint(end, point)),
        }
    }

    /// Bulge of the segment from start to end.
    #[must_use]
    pub fn bulge(&self) -> f64 {
        match self {
            Self::Line(_) => 0.0,
            Self::Arc(a) => bulge_from_sweep(a.signed_sweep()),
        }
    }

    #[must_use]
    pub fn bbox(&self) -> Aabb {
        match self {
            Self::Line(l) => Aabb::from_corners(l.start, l.end),
            Self::Arc(a) => a.bbox(),
        }
    }

    /// Point at parameter `t` in `[0, 1]` from start to end.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        match self {
            Self::Line(l) => l.start + (l.end - l.start) * t,
            Self::Arc(a) => a.params().point_at(t),
        }
    }

    #[must_use]
    pub fn distance_to(&self, p: &Point2) -> f64 {
        match self {
            Self::Line(l) => point_to_segment_dist(p, &l.start, &l.end),
            Self::Arc(a) => point_to_arc_dist(p, &a.center, a.radius, a.start_angle, a.signed_sweep()),
        }
    }

    /// Signed angle swept around `p`; `p` must not lie on the shape.
    #[must_use]
    pub fn subtended_angle(&self, p: &Point2) -> f64 {
        match self {
            Self::Line(l) => subtended_angle(p, &l.start, &l.end),
            Self::Arc(a) => a.subtended_angle(p),
        }
    }

    /// Parameters along `self` where it meets `other`, tangencies included.
    #[must_use]
    pub fn crossing_params(&self, other: &Self) -> Vec<f64> {
        match (self, other) {
            (Self::Line(a), Self::Line(b)) => {
                segment_segment_intersect_2d(&a.start, &a.end, &b.start, &b.end)
                    .map(|c| c.t_a)
                    .into_iter()
                    .collect()
            }
            (Self::Line(a), Self::Arc(b)) => line_arc_intersect_2d(&a.start, &a.end, &b.params())
                .iter()
                .map(|c| c.t_a)
                .collect(),
            (Self::Arc(a), Self::Line(b)) => line_arc_intersect_2d(&b.start, &b.end, &a.params())
                .iter()
                .map(|c| c.t_b)
                .collect(),
            (Self::Arc(a), Self::Arc(b)) => arc_arc_intersect_2d(&a.params(), &b.params())
                .iter()
                .map(|c| c.t_a)
                .collect(),
        }
    }

    /// Same kind, same endpoints in either direction, and for arcs the same
    /// circle and included angle, all within [`EPSILON`].
    #[must_use]
    pub fn equals_fuzzy(&self, other: &Self) -> bool {
        let same_kind = match (self, other) {
            (Self::Line(_), Self::Line(_)) => true,
            (Self::Arc(a), Self::Arc(b)) => a.equals_fuzzy(b),
            _ => false,
        };
        if !same_kind {
            return false;
        }
        let (s0, e0) = (self.start_point(), self.end_point());
        let (s1, e1) = (other.start_point(), other.end_point());
        (points_coincide(&s0, &s1) && points_coincide(&e0, &e1))
            || (points_coincide(&s0, &e1) && points_coincide(&e0, &s1))
    }
}

impl From<Line> for Shape {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<Arc> for Shape {
    fn from(arc: Arc) -> Self {
        Self::Arc(arc)
    }
}
