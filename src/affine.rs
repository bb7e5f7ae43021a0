//! Affine transformations between voxel index space and physical space.
//!
//! Every affine in this crate is a 4x4 homogeneous matrix in double
//! precision, mapping a voxel index `(i, j, k)` to a physical coordinate
//! `(x, y, z)`. Volumes usually come with more than one such matrix (the
//! scanner/world one and FreeSurfer's surface-anchored "tkr" one), and
//! nothing here assumes any two of them are inverses of each other.
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// 3x3 linear part of an affine.
pub type Affine3 = Matrix3<f64>;
/// Full 4x4 homogeneous affine.
pub type Affine4 = Matrix4<f64>;

/// Separate a 4x4 affine into its 3x3 linear part and translation column.
pub fn split_affine(affine: &Affine4) -> (Affine3, Vector3<f64>) {
    let linear = Affine3::from_fn(|r, c| affine[(r, c)]);
    let translation = Vector3::new(affine[(0, 3)], affine[(1, 3)], affine[(2, 3)]);
    (linear, translation)
}

/// Apply an affine to a batch of points.
///
/// The linear part is applied first and the translation column added
/// afterwards; the bottom row is ignored, as with any proper affine. The
/// output has the same length and order as the input.
pub fn apply_affine(affine: &Affine4, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    let (linear, translation) = split_affine(affine);
    points
        .iter()
        .map(|p| Point3::from(linear * p.coords + translation))
        .collect()
}

/// Map a single voxel index to physical space.
pub fn voxel_to_point(affine: &Affine4, ijk: [usize; 3]) -> Point3<f64> {
    let (linear, translation) = split_affine(affine);
    let v = Vector3::new(ijk[0] as f64, ijk[1] as f64, ijk[2] as f64);
    Point3::from(linear * v + translation)
}

/// Map a batch of voxel indices to physical space, preserving order.
pub fn voxels_to_points(affine: &Affine4, voxels: &[[usize; 3]]) -> Vec<Point3<f64>> {
    let (linear, translation) = split_affine(affine);
    voxels
        .iter()
        .map(|ijk| {
            let v = Vector3::new(ijk[0] as f64, ijk[1] as f64, ijk[2] as f64);
            Point3::from(linear * v + translation)
        })
        .collect()
}

/// FreeSurfer's "tkregister" voxel to surface RAS affine.
///
/// Surface vertex coordinates written by FreeSurfer live in this space, which
/// only depends on the volume shape and voxel sizes. It is centered on the
/// middle of the volume with the axes permuted to LIA orientation.
#[rustfmt::skip]
pub fn vox2ras_tkr(shape: [usize; 3], zooms: [f64; 3]) -> Affine4 {
    let half = [
        shape[0] as f64 * zooms[0] / 2.0,
        shape[1] as f64 * zooms[1] / 2.0,
        shape[2] as f64 * zooms[2] / 2.0,
    ];
    Affine4::new(
        -zooms[0], 0.0,       0.0,      half[0],
        0.0,       0.0,       zooms[2], -half[2],
        0.0,       -zooms[1], 0.0,      half[1],
        0.0,       0.0,       0.0,      1.0,
    )
}
