mod filter;
mod raw_offset;
mod self_intersect;
mod slice;
mod stitch;

use tracing::debug;

use crate::config::JoinStyle;
use crate::error::{OperationError, Result};
use crate::geometry::pline::Pline;
use crate::math::{EPSILON, TOLERANCE};

/// Offsets a closed polyline (with potential arc segments) using the
/// slice-and-filter algorithm.
///
/// Positive distance offsets to the left of the direction of travel (inward
/// for counter-clockwise), negative to the right. Result loops that wind the
/// other way from the input are collapsed and dropped, so the result may be
/// empty.
#[derive(Debug)]
pub struct PlineOffset {
    pline: Pline,
    distance: f64,
    join: JoinStyle,
}

impl PlineOffset {
    #[must_use]
    pub fn new(pline: Pline, distance: f64) -> Self {
        Self {
            pline,
            distance,
            join: JoinStyle::default(),
        }
    }

    #[must_use]
    pub fn join_style(mut self, join: JoinStyle) -> Self {
        self.join = join;
        self
    }

    /// Executes the offset, returning zero or more closed result polylines.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the polyline is open, has
    /// fewer than 2 vertices, or contains a zero-length line segment.
    pub fn execute(&self) -> Result<Vec<Pline>> {
        if !self.pline.closed {
            return Err(
                OperationError::InvalidInput("pline offset needs a closed polyline".to_owned()).into(),
            );
        }
        if self.pline.vertices.len() < 2 {
            return Err(OperationError::InvalidInput(
                "at least 2 vertices required for pline offset".to_owned(),
            )
            .into());
        }
        if self.distance.abs() < TOLERANCE {
            return Ok(vec![self.pline.clone()]);
        }

        // Step 1: Build raw offset polyline.
        let raw = raw_offset::build(&self.pline, self.distance, self.join)?;
        if raw.vertices.len() < 2 {
            return Ok(Vec::new());
        }

        // Step 2: Find all self-intersections.
        let intersections = self_intersect::find_all(&raw);
        let loops = if intersections.is_empty() {
            // An inverted loop has vertices closer to the source than the distance.
            let threshold = self.distance.abs() - EPSILON;
            let keep = raw
                .vertices
                .iter()
                .all(|v| filter::min_dist_to_pline(&v.point(), &self.pline) >= threshold);
            if keep {
                vec![raw]
            } else {
                Vec::new()
            }
        } else {
            // Step 3: Slice at intersection points.
            let slices = slice::build(&raw.vertices, &intersections);
            // Step 4: Filter slices by distance to original.
            let valid = filter::apply(&slices, &self.pline, self.distance);
            // Step 5: Stitch valid slices into result polylines.
            stitch::connect(&valid)
        };

        let ccw = self.pline.signed_area() > 0.0;
        let result: Vec<Pline> = loops
            .into_iter()
            .filter(|p| {
                let area = p.signed_area();
                area.abs() > TOLERANCE && (area > 0.0) == ccw
            })
            .collect();
        debug!(
            intersections = intersections.len(),
            loops = result.len(),
            "pline offset"
        );
        Ok(result)
    }
}
