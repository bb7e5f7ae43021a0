//! Exact nearest neighbour search over a static 3D point cloud.
//!
//! [`KdTree`] is a balanced k-d tree built once over a [`PointCloud`] and
//! only read afterwards, so a single tree can be shared by reference across
//! threads. Queries are exact: the result is always the true closest point,
//! and when several points are equally close the one with the lowest index in
//! the original cloud is returned. Label assignment downstream depends on this
//! choice, so it never varies with the shape of the tree.
//!
//! [`KdTree`]: ./struct.KdTree.html
//! [`PointCloud`]: ../cloud/struct.PointCloud.html
use crate::cloud::{is_finite, PointCloud};
use crate::error::{Result, SurfconnError};
use log::debug;
use nalgebra::Point3;
use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Maximum number of points held by a leaf bucket.
const LEAF_SIZE: usize = 8;
/// Marks a node without children.
const NO_CHILD: usize = usize::MAX;

/// Result of a nearest neighbour query.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Neighbor {
    /// Euclidean distance between the query and the closest point.
    pub distance: f64,
    /// Index of the closest point in the original cloud ordering.
    pub index: usize,
}

#[derive(Debug, Clone)]
struct Node {
    min: [f64; 3],
    max: [f64; 3],
    left: usize,
    right: usize,
    // leaf bucket: indices[start..end]
    start: usize,
    end: usize,
}

impl Node {
    fn is_leaf(&self) -> bool {
        self.left == NO_CHILD
    }

    /// Squared distance from `q` to this node's bounding box.
    fn box_distance2(&self, q: &[f64; 3]) -> f64 {
        let mut d2 = 0.0;
        for axis in 0..3 {
            let v = q[axis];
            if v < self.min[axis] {
                d2 += (self.min[axis] - v) * (self.min[axis] - v);
            } else if v > self.max[axis] {
                d2 += (v - self.max[axis]) * (v - self.max[axis]);
            }
        }
        d2
    }
}

/// A static k-d tree over a point cloud.
#[derive(Debug, Clone)]
pub struct KdTree {
    points: Vec<[f64; 3]>,
    indices: Vec<usize>,
    nodes: Vec<Node>,
    root: usize,
}

#[derive(Debug, Copy, Clone)]
struct Best {
    distance2: f64,
    index: usize,
}

impl Best {
    fn offer(&mut self, distance2: f64, index: usize) {
        if distance2 < self.distance2 || (distance2 == self.distance2 && index < self.index) {
            self.distance2 = distance2;
            self.index = index;
        }
    }
}

fn distance2(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    // same summation order as `Node::box_distance2`, so a box is never
    // reported farther than a point inside it
    let mut d2 = 0.0;
    for axis in 0..3 {
        d2 += (a[axis] - b[axis]) * (a[axis] - b[axis]);
    }
    d2
}

impl KdTree {
    /// Build a tree over the given cloud.
    ///
    /// # Errors
    ///
    /// - `SurfconnError::InvalidInput` if the cloud is empty.
    pub fn build(cloud: PointCloud) -> Result<Self> {
        if cloud.is_empty() {
            return Err(SurfconnError::InvalidInput(
                "point cloud",
                "cannot index an empty point cloud".to_string(),
            ));
        }
        let points: Vec<[f64; 3]> = cloud.points().iter().map(|p| [p.x, p.y, p.z]).collect();
        let mut tree = KdTree {
            indices: (0..points.len()).collect(),
            points,
            nodes: Vec::new(),
            root: 0,
        };
        tree.nodes.reserve(2 * tree.points.len() / LEAF_SIZE + 1);
        tree.root = tree.build_recursive(0, tree.points.len());
        debug!(
            "built k-d tree over {} points ({} nodes)",
            tree.points.len(),
            tree.nodes.len()
        );
        Ok(tree)
    }

    fn build_recursive(&mut self, start: usize, end: usize) -> usize {
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for &idx in &self.indices[start..end] {
            let p = &self.points[idx];
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }

        let count = end - start;
        if count <= LEAF_SIZE {
            self.nodes.push(Node {
                min,
                max,
                left: NO_CHILD,
                right: NO_CHILD,
                start,
                end,
            });
            return self.nodes.len() - 1;
        }

        // split along the widest extent, at the median
        let extent = [max[0] - min[0], max[1] - min[1], max[2] - min[2]];
        let axis = if extent[0] >= extent[1] && extent[0] >= extent[2] {
            0
        } else if extent[1] >= extent[2] {
            1
        } else {
            2
        };
        let points = &self.points;
        let _ = self.indices[start..end].select_nth_unstable_by(count / 2, |&a, &b| {
            points[a][axis]
                .partial_cmp(&points[b][axis])
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(&b))
        });

        let mid = start + count / 2;
        let left = self.build_recursive(start, mid);
        let right = self.build_recursive(mid, end);
        self.nodes.push(Node {
            min,
            max,
            left,
            right,
            start,
            end,
        });
        self.nodes.len() - 1
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: a tree cannot be built over an empty cloud.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Find the point closest to `point`.
    ///
    /// Among equidistant points, the one with the lowest original index wins.
    ///
    /// # Errors
    ///
    /// - `SurfconnError::InvalidInput` if the query has a non-finite
    /// coordinate.
    pub fn query(&self, point: &Point3<f64>) -> Result<Neighbor> {
        if !is_finite(point) {
            return Err(SurfconnError::InvalidInput(
                "query point",
                format!("non-finite coordinate in {:?}", point.coords.as_slice()),
            ));
        }
        let q = [point.x, point.y, point.z];
        let mut best = Best {
            distance2: f64::INFINITY,
            index: usize::MAX,
        };
        self.search(self.root, &q, &mut best);
        Ok(Neighbor {
            distance: best.distance2.sqrt(),
            index: best.index,
        })
    }

    fn search(&self, node_idx: usize, q: &[f64; 3], best: &mut Best) {
        let node = &self.nodes[node_idx];
        // equality is not pruned: an equally distant point with a lower
        // index may still live in there
        if node.box_distance2(q) > best.distance2 {
            return;
        }
        if node.is_leaf() {
            for &idx in &self.indices[node.start..node.end] {
                best.offer(distance2(&self.points[idx], q), idx);
            }
            return;
        }

        // visit the nearer child first to shrink the bound early
        let left = &self.nodes[node.left];
        let right = &self.nodes[node.right];
        if left.box_distance2(q) <= right.box_distance2(q) {
            self.search(node.left, q, best);
            self.search(node.right, q, best);
        } else {
            self.search(node.right, q, best);
            self.search(node.left, q, best);
        }
    }

    /// Answer a batch of independent queries. Result `k` corresponds to
    /// query point `k`.
    ///
    /// With the `parallel` feature the queries are spread over the rayon
    /// thread pool; the output is the same either way.
    pub fn batch_query(&self, points: &[Point3<f64>]) -> Result<Vec<Neighbor>> {
        #[cfg(feature = "parallel")]
        {
            points.par_iter().map(|p| self.query(p)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            points.iter().map(|p| self.query(p)).collect()
        }
    }
}
