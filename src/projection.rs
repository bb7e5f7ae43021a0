//! Projection of cortical surface labels onto a volume.
//!
//! Each cortex voxel of a hemisphere receives the label of the surface vertex
//! closest to it, searching the white and pial surfaces together. No distance
//! limit applies: every selected voxel is labelled, however far its nearest
//! vertex is. Voxels outside every hemisphere's selection stay 0.
//!
//! # Example
//!
//! ```
//! use nalgebra::Matrix4;
//! use ndarray::Array3;
//! use surfconn::cloud::{HemisphereSurfacePair, PointCloud};
//! use surfconn::projection::{project_labels, HemisphereProjector, HemisphereSelection};
//! # use surfconn::Result;
//!
//! # fn run() -> Result<()> {
//! let surface = PointCloud::from_rows(&[[0., 0., 0.], [10., 0., 0.]])?;
//! let pair = HemisphereSurfacePair::new(surface.clone(), surface, vec![1, 2])?;
//! let projector = HemisphereProjector::new(pair)?;
//!
//! let mut ribbon = Array3::<i32>::zeros((12, 1, 1));
//! ribbon[[1, 0, 0]] = 3;
//! ribbon[[9, 0, 0]] = 3;
//!
//! let selection = [HemisphereSelection::new(&projector, 3)];
//! let labels = project_labels(ribbon.view(), &Matrix4::identity(), &selection)?;
//! assert_eq!(labels[[1, 0, 0]], 1);
//! assert_eq!(labels[[9, 0, 0]], 2);
//! assert_eq!(labels[[5, 0, 0]], 0);
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
use crate::affine::{voxels_to_points, Affine4};
use crate::cloud::{HemisphereSurfacePair, Surface};
use crate::error::{Result, SurfconnError};
use crate::spatial::KdTree;
use crate::tissue::Hemisphere;
use crate::volume::select_code;
use log::{debug, warn};
use nalgebra::Point3;
use ndarray::{Array3, ArrayView3};

/// The surface vertex found closest to a query point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VertexHit {
    /// Vertex index, shared by both surfaces.
    pub vertex: usize,
    /// Surface on which the closest point was found.
    pub surface: Surface,
    /// Distance to that point.
    pub distance: f64,
    /// Region label of the vertex.
    pub label: u32,
}

/// Nearest-vertex lookup for one hemisphere.
///
/// The search structure covers the inner surface followed by the outer one,
/// and is built once so it can serve any number of volumes.
#[derive(Debug, Clone)]
pub struct HemisphereProjector {
    surfaces: HemisphereSurfacePair,
    tree: KdTree,
}

impl HemisphereProjector {
    /// Index the white and pial vertices of a hemisphere.
    ///
    /// # Errors
    ///
    /// - `SurfconnError::InvalidInput` if the surfaces have no vertices.
    pub fn new(surfaces: HemisphereSurfacePair) -> Result<Self> {
        let tree = KdTree::build(surfaces.combined())?;
        Ok(HemisphereProjector { surfaces, tree })
    }

    /// The indexed surfaces.
    pub fn surfaces(&self) -> &HemisphereSurfacePair {
        &self.surfaces
    }

    /// Find the closest vertex for each point, in input order.
    pub fn nearest_vertices(&self, points: &[Point3<f64>]) -> Result<Vec<VertexHit>> {
        let labels = self.surfaces.labels();
        let hits = self
            .tree
            .batch_query(points)?
            .into_iter()
            .map(|n| {
                let (vertex, surface) = self.surfaces.fold_index(n.index);
                VertexHit {
                    vertex,
                    surface,
                    distance: n.distance,
                    label: labels[vertex],
                }
            })
            .collect();
        Ok(hits)
    }
}

/// A hemisphere projector paired with the tissue code of the voxels it
/// labels.
#[derive(Debug, Copy, Clone)]
pub struct HemisphereSelection<'a> {
    /// Lookup structure of the hemisphere.
    pub projector: &'a HemisphereProjector,
    /// Voxels holding this code are labelled from this hemisphere.
    pub cortex_code: i32,
}

impl<'a> HemisphereSelection<'a> {
    /// Pair a projector with a tissue code.
    pub fn new(projector: &'a HemisphereProjector, cortex_code: i32) -> Self {
        HemisphereSelection {
            projector,
            cortex_code,
        }
    }

    /// Pair a projector with the ribbon cortex code of the given hemisphere.
    pub fn ribbon(projector: &'a HemisphereProjector, hemisphere: Hemisphere) -> Self {
        HemisphereSelection::new(projector, hemisphere.cortex().code())
    }
}

/// Label every selected voxel of `tissue` from its hemisphere's surfaces.
///
/// Voxel indices are moved to surface space with `vox2surf` before the
/// lookup. The output has the shape of `tissue`; voxels not selected by any
/// hemisphere hold 0. A hemisphere whose code matches no voxel contributes
/// nothing.
///
/// # Errors
///
/// - `SurfconnError::OverlappingSelection` if two hemispheres use the same
/// tissue code.
pub fn project_labels(
    tissue: ArrayView3<i32>,
    vox2surf: &Affine4,
    hemispheres: &[HemisphereSelection],
) -> Result<Array3<u32>> {
    for (i, a) in hemispheres.iter().enumerate() {
        if hemispheres[i + 1..].iter().any(|b| b.cortex_code == a.cortex_code) {
            return Err(SurfconnError::OverlappingSelection(a.cortex_code));
        }
    }

    let mut out = Array3::<u32>::zeros(tissue.raw_dim());
    for hemi in hemispheres {
        let voxels = select_code(tissue.view(), hemi.cortex_code);
        if voxels.is_empty() {
            warn!("no voxel holds tissue code {}, nothing to label", hemi.cortex_code);
            continue;
        }
        let points = voxels_to_points(vox2surf, &voxels);
        let hits = hemi.projector.nearest_vertices(&points)?;
        debug!(
            "labelling {} voxels of tissue code {} from {} vertices",
            voxels.len(),
            hemi.cortex_code,
            hemi.projector.surfaces().vertex_count()
        );
        for (ijk, hit) in voxels.iter().zip(&hits) {
            out[*ijk] = hit.label;
        }
    }
    Ok(out)
}

/// Label a FreeSurfer ribbon volume from both hemispheres, using the ribbon's
/// left (3) and right (42) cortex codes.
pub fn project_ribbon(
    ribbon: ArrayView3<i32>,
    vox2surf: &Affine4,
    left: &HemisphereProjector,
    right: &HemisphereProjector,
) -> Result<Array3<u32>> {
    let hemispheres = [
        HemisphereSelection::ribbon(left, Hemisphere::Left),
        HemisphereSelection::ribbon(right, Hemisphere::Right),
    ];
    project_labels(ribbon, vox2surf, &hemispheres)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::PointCloud;

    fn line_projector(labels: Vec<u32>, offset: f64) -> HemisphereProjector {
        let inner: Vec<[f64; 3]> = (0..labels.len()).map(|i| [i as f64 + offset, 0., 0.]).collect();
        let outer: Vec<[f64; 3]> = (0..labels.len()).map(|i| [i as f64 + offset, 2., 0.]).collect();
        let pair = HemisphereSurfacePair::new(
            PointCloud::from_rows(&inner).unwrap(),
            PointCloud::from_rows(&outer).unwrap(),
            labels,
        )
        .unwrap();
        HemisphereProjector::new(pair).unwrap()
    }

    #[test]
    fn outer_hits_fold_onto_vertex_labels() {
        let projector = line_projector(vec![7, 8, 9], 0.);
        let hits = projector
            .nearest_vertices(&[Point3::new(2., 1.9, 0.), Point3::new(0., -1., 0.)])
            .unwrap();
        assert_eq!(hits[0].vertex, 2);
        assert_eq!(hits[0].surface, Surface::Outer);
        assert_eq!(hits[0].label, 9);
        assert_eq!(hits[1].vertex, 0);
        assert_eq!(hits[1].surface, Surface::Inner);
        assert_eq!(hits[1].label, 7);
    }

    #[test]
    fn midway_between_surfaces_prefers_inner() {
        // equidistant from inner and outer vertex 1: the inner copy comes first
        let projector = line_projector(vec![7, 8, 9], 0.);
        let hits = projector.nearest_vertices(&[Point3::new(1., 1., 0.)]).unwrap();
        assert_eq!(hits[0].surface, Surface::Inner);
        assert_eq!(hits[0].label, 8);
    }

    #[test]
    fn same_code_twice_is_an_overlap() {
        let projector = line_projector(vec![1], 0.);
        let tissue = Array3::<i32>::zeros((1, 1, 1));
        let hemis = [
            HemisphereSelection::new(&projector, 3),
            HemisphereSelection::new(&projector, 3),
        ];
        match project_labels(tissue.view(), &Affine4::identity(), &hemis) {
            Err(SurfconnError::OverlappingSelection(3)) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn unselected_voxels_stay_zero() {
        let projector = line_projector(vec![4, 5], 0.);
        let mut tissue = Array3::<i32>::zeros((2, 2, 2));
        tissue[[1, 1, 1]] = 3;
        tissue[[0, 0, 0]] = 2;
        let hemis = [HemisphereSelection::new(&projector, 3)];
        let out = project_labels(tissue.view(), &Affine4::identity(), &hemis).unwrap();
        assert_eq!(out.shape(), &[2, 2, 2]);
        assert_eq!(out[[1, 1, 1]], 5);
        assert_eq!(out.iter().filter(|&&v| v != 0).count(), 1);
    }
}
