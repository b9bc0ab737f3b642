use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

use crate::geometry::Aabb;
use crate::math::Point2;

type PointEntry<T> = GeomWithData<[f64; 2], (usize, T)>;
type BoxEntry<T> = GeomWithData<Rectangle<[f64; 2]>, (usize, T)>;

/// A query hit: the stored payload, its point and squared distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a, T> {
    pub item: &'a T,
    pub point: Point2,
    pub distance_2: f64,
}

/// Static nearest-neighbour index over 2D points.
///
/// Built once by bulk load; no insertion or removal afterwards. Results come
/// in increasing distance order with ties broken by insertion order.
#[derive(Debug)]
pub struct SpatialIndex<T> {
    tree: RTree<PointEntry<T>>,
}

impl<T> SpatialIndex<T> {
    #[must_use]
    pub fn build<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (Point2, T)>,
    {
        let entries = points
            .into_iter()
            .enumerate()
            .map(|(seq, (p, item))| GeomWithData::new([p.x, p.y], (seq, item)))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Every entry within `radius` of `query` (inclusive).
    #[must_use]
    pub fn within(&self, query: &Point2, radius: f64) -> Vec<Neighbor<'_, T>> {
        let q = [query.x, query.y];
        let mut hits: Vec<(usize, Neighbor<'_, T>)> = self
            .tree
            .locate_within_distance(q, radius * radius)
            .map(|entry| (entry.data.0, to_neighbor(entry, query)))
            .collect();
        sort_hits(&mut hits);
        hits.into_iter().map(|(_, n)| n).collect()
    }

    /// The `k` entries closest to `query`.
    #[must_use]
    pub fn nearest(&self, query: &Point2, k: usize) -> Vec<Neighbor<'_, T>> {
        if k == 0 {
            return Vec::new();
        }
        let q = [query.x, query.y];
        let mut hits: Vec<(usize, Neighbor<'_, T>)> = Vec::new();
        let mut cutoff = f64::INFINITY;
        for (entry, distance_2) in self.tree.nearest_neighbor_iter_with_distance_2(&q) {
            // Keep pulling equal-distance entries so ties resolve by insertion order.
            if hits.len() >= k && distance_2 > cutoff {
                break;
            }
            hits.push((entry.data.0, to_neighbor(entry, query)));
            if hits.len() == k {
                cutoff = distance_2;
            }
        }
        sort_hits(&mut hits);
        hits.truncate(k);
        hits.into_iter().map(|(_, n)| n).collect()
    }
}

fn to_neighbor<'a, T>(entry: &'a PointEntry<T>, query: &Point2) -> Neighbor<'a, T> {
    let [x, y] = *entry.geom();
    let point = Point2::new(x, y);
    Neighbor {
        item: &entry.data.1,
        point,
        distance_2: (point - query).norm_squared(),
    }
}

fn sort_hits<T>(hits: &mut [(usize, Neighbor<'_, T>)]) {
    hits.sort_by(|(sa, a), (sb, b)| a.distance_2.total_cmp(&b.distance_2).then(sa.cmp(sb)));
}

/// Static index over bounding boxes answering containment queries.
#[derive(Debug)]
pub struct BoxIndex<T> {
    tree: RTree<BoxEntry<T>>,
}

impl<T> BoxIndex<T> {
    #[must_use]
    pub fn build<I>(boxes: I) -> Self
    where
        I: IntoIterator<Item = (Aabb, T)>,
    {
        let entries = boxes
            .into_iter()
            .enumerate()
            .map(|(seq, (b, item))| {
                let rect = Rectangle::from_corners([b.min.x, b.min.y], [b.max.x, b.max.y]);
                GeomWithData::new(rect, (seq, item))
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Items whose box lies entirely inside `envelope`, in insertion order.
    #[must_use]
    pub fn contained_in(&self, envelope: &Aabb) -> Vec<&T> {
        let aabb = AABB::from_corners([envelope.min.x, envelope.min.y], [envelope.max.x, envelope.max.y]);
        let mut hits: Vec<&(usize, T)> = self
            .tree
            .locate_in_envelope(&aabb)
            .map(|entry| &entry.data)
            .collect();
        hits.sort_by_key(|(seq, _)| *seq);
        hits.into_iter().map(|(_, item)| item).collect()
    }
}
