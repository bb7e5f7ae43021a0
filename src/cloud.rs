//! Point clouds and labelled cortical surfaces.
//!
//! A [`PointCloud`] is an ordered set of 3D coordinates; order matters
//! because every downstream result refers to points by position. A
//! [`HemisphereSurfacePair`] bundles the inner (white) and outer (pial)
//! surfaces of one hemisphere, which share vertex count and per-vertex
//! region labels.
//!
//! [`PointCloud`]: ./struct.PointCloud.html
//! [`HemisphereSurfacePair`]: ./struct.HemisphereSurfacePair.html
use crate::error::{Result, SurfconnError};
use nalgebra::Point3;
use ndarray::ArrayView2;
use num_traits::AsPrimitive;
use std::ops::Index;

/// An immutable, ordered sequence of finite 3D points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud {
    points: Vec<Point3<f64>>,
}

impl PointCloud {
    /// Create a point cloud, checking that every coordinate is finite.
    pub fn new(points: Vec<Point3<f64>>) -> Result<Self> {
        if let Some(i) = points.iter().position(|p| !is_finite(p)) {
            return Err(SurfconnError::InvalidInput(
                "point cloud",
                format!("point {} has a non-finite coordinate", i),
            ));
        }
        Ok(PointCloud { points })
    }

    /// Create a point cloud from plain `[x, y, z]` rows.
    pub fn from_rows(rows: &[[f64; 3]]) -> Result<Self> {
        PointCloud::new(rows.iter().map(|r| Point3::new(r[0], r[1], r[2])).collect())
    }

    /// Create a point cloud from a `V x 3` array of any primitive numeric
    /// type, such as the `f32` vertex arrays of surface files.
    pub fn from_array<A>(array: ArrayView2<A>) -> Result<Self>
    where
        A: AsPrimitive<f64>,
    {
        if array.ncols() != 3 {
            return Err(SurfconnError::InvalidInput(
                "point array",
                format!("expected 3 columns, got shape {:?}", array.shape()),
            ));
        }
        let points = array
            .outer_iter()
            .map(|row| Point3::new(row[0].as_(), row[1].as_(), row[2].as_()))
            .collect();
        PointCloud::new(points)
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the cloud has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The points, in their original order.
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// A new cloud holding the points of `self` followed by those of `other`.
    pub fn concat(&self, other: &PointCloud) -> PointCloud {
        let mut points = Vec::with_capacity(self.len() + other.len());
        points.extend_from_slice(&self.points);
        points.extend_from_slice(&other.points);
        PointCloud { points }
    }
}

impl Index<usize> for PointCloud {
    type Output = Point3<f64>;

    fn index(&self, index: usize) -> &Point3<f64> {
        &self.points[index]
    }
}

pub(crate) fn is_finite(p: &Point3<f64>) -> bool {
    p.coords.iter().all(|c| c.is_finite())
}

/// A point cloud with one region label per point. Label 0 means unlabelled.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledPointCloud {
    cloud: PointCloud,
    labels: Vec<u32>,
}

impl LabeledPointCloud {
    /// Pair a cloud with its labels.
    ///
    /// # Errors
    ///
    /// - `SurfconnError::InvalidInput` if there is not exactly one label per
    /// point.
    pub fn new(cloud: PointCloud, labels: Vec<u32>) -> Result<Self> {
        if cloud.len() != labels.len() {
            return Err(SurfconnError::size_mismatch("point labels", cloud.len(), labels.len()));
        }
        Ok(LabeledPointCloud { cloud, labels })
    }

    /// The underlying points.
    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    /// The per-point labels.
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the cloud has no points.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Split into the point cloud and label vector.
    pub fn into_parts(self) -> (PointCloud, Vec<u32>) {
        (self.cloud, self.labels)
    }
}

/// Which of the two cortical surfaces a vertex belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Gray/white matter boundary (`?h.white`).
    Inner,
    /// Gray matter/CSF boundary (`?h.pial`).
    Outer,
}

/// The inner and outer surface of one hemisphere, with one shared label per
/// vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct HemisphereSurfacePair {
    inner: PointCloud,
    outer: PointCloud,
    labels: Vec<u32>,
}

impl HemisphereSurfacePair {
    /// Build a surface pair from two point clouds and their shared labels.
    ///
    /// # Errors
    ///
    /// - `SurfconnError::InvalidInput` if the two surfaces have different
    /// vertex counts, or the label count differs from the vertex count.
    pub fn new(inner: PointCloud, outer: PointCloud, labels: Vec<u32>) -> Result<Self> {
        if inner.len() != outer.len() {
            return Err(SurfconnError::size_mismatch("outer surface", inner.len(), outer.len()));
        }
        if labels.len() != inner.len() {
            return Err(SurfconnError::size_mismatch("surface labels", inner.len(), labels.len()));
        }
        Ok(HemisphereSurfacePair { inner, outer, labels })
    }

    /// Build a surface pair from two labelled surfaces, which must agree on
    /// every vertex label.
    pub fn from_labeled(inner: LabeledPointCloud, outer: LabeledPointCloud) -> Result<Self> {
        if inner.len() != outer.len() {
            return Err(SurfconnError::size_mismatch("outer surface", inner.len(), outer.len()));
        }
        if let Some(v) = (0..inner.len()).find(|&v| inner.labels[v] != outer.labels[v]) {
            return Err(SurfconnError::InvalidInput(
                "surface labels",
                format!(
                    "inner and outer surfaces disagree at vertex {} ({} vs {})",
                    v, inner.labels[v], outer.labels[v]
                ),
            ));
        }
        let (inner, labels) = inner.into_parts();
        let (outer, _) = outer.into_parts();
        Ok(HemisphereSurfacePair { inner, outer, labels })
    }

    /// Number of vertices per surface (`V`).
    pub fn vertex_count(&self) -> usize {
        self.labels.len()
    }

    /// The inner (white) surface.
    pub fn inner(&self) -> &PointCloud {
        &self.inner
    }

    /// The outer (pial) surface.
    pub fn outer(&self) -> &PointCloud {
        &self.outer
    }

    /// The per-vertex labels.
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// The `2V` working cloud: inner vertices first, then outer ones.
    pub fn combined(&self) -> PointCloud {
        self.inner.concat(&self.outer)
    }

    /// Fold an index into the combined cloud back onto a vertex index and
    /// the surface it came from.
    pub fn fold_index(&self, index: usize) -> (usize, Surface) {
        let v = self.vertex_count();
        let surface = if index < v { Surface::Inner } else { Surface::Outer };
        (index % v, surface)
    }
}
