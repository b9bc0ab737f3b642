use crate::geometry::pline::{Pline, PlineVertex};
use crate::math::EPSILON;

use super::slice::PlineSlice;

/// Stitches kept slices back into closed polylines by matching endpoints.
///
/// Greedy: each loop is extended with the closest unused slice starting where
/// it currently ends, until none is within [`EPSILON`]. Chains that fail to
/// close are discarded.
#[must_use]
pub fn connect(slices: &[&PlineSlice]) -> Vec<Pline> {
    let n = slices.len();
    let mut used = vec![false; n];
    let mut results = Vec::new();

    for start in 0..n {
        if used[start] {
            continue;
        }
        used[start] = true;
        let mut verts: Vec<PlineVertex> = slices[start].vertices.clone();

        while let Some(end) = verts.last().map(PlineVertex::point) {
            let best = (0..n)
                .filter(|&c| !used[c])
                .filter_map(|c| Some((c, (slices[c].start()? - end).norm())))
                .filter(|&(_, d)| d < EPSILON)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            let Some((next, _)) = best else {
                break;
            };
            used[next] = true;
            // The shared point now starts the next slice's first segment.
            let tail = &slices[next].vertices;
            if let Some(last) = verts.last_mut() {
                last.bulge = tail[0].bulge;
            }
            verts.extend_from_slice(&tail[1..]);
        }

        let closes = match (verts.first(), verts.last()) {
            (Some(f), Some(l)) => (f.point() - l.point()).norm() < EPSILON,
            _ => false,
        };
        if !closes {
            continue;
        }
        verts.pop();

        let has_arc = verts.iter().any(PlineVertex::is_arc);
        if verts.len() >= 3 || (has_arc && verts.len() >= 2) {
            results.push(Pline {
                vertices: verts,
                closed: true,
            });
        }
    }

    results
}
