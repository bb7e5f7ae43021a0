//! Voxel selection over 3D grids.
//!
//! Selections are returned as voxel indices in row-major (C) order, the
//! order in which `ndarray` enumerates a standard-layout array. Every
//! positional result downstream follows this order.
use crate::error::{Result, SurfconnError};
use ndarray::{Array3, ArrayView3};
use num_traits::ToPrimitive;

/// Indices of all voxels whose value satisfies `predicate`.
pub fn select_voxels<A, F>(grid: ArrayView3<A>, mut predicate: F) -> Vec<[usize; 3]>
where
    F: FnMut(&A) -> bool,
{
    grid.indexed_iter()
        .filter(|(_, v)| predicate(*v))
        .map(|((i, j, k), _)| [i, j, k])
        .collect()
}

/// Indices of all voxels holding the given tissue-class code.
pub fn select_code(grid: ArrayView3<i32>, code: i32) -> Vec<[usize; 3]> {
    select_voxels(grid, |&v| v == code)
}

/// Indices of all voxels with a region label, paired with that label.
pub fn select_labeled(labels: ArrayView3<u32>) -> (Vec<[usize; 3]>, Vec<u32>) {
    labels
        .indexed_iter()
        .filter(|(_, &v)| v > 0)
        .map(|((i, j, k), &v)| ([i, j, k], v))
        .unzip()
}

/// Largest label in the volume, 0 if it is entirely unlabeled.
pub fn max_label(labels: ArrayView3<u32>) -> u32 {
    labels.iter().copied().max().unwrap_or(0)
}

/// Convert a volume of any numeric type into region labels, truncating
/// fractional values toward zero.
///
/// Atlas volumes are often stored or loaded as floating point data. This
/// accepts them as long as every value is finite and non-negative.
///
/// # Errors
///
/// - `SurfconnError::InvalidInput` if a voxel is negative, not finite, or
/// too large for a `u32` label.
pub fn to_label_volume<A>(volume: ArrayView3<A>) -> Result<Array3<u32>>
where
    A: ToPrimitive + Copy,
{
    let mut out = Array3::zeros(volume.raw_dim());
    for ((i, j, k), v) in volume.indexed_iter() {
        let label = v
            .to_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .and_then(|f| f.trunc().to_u32())
            .ok_or_else(|| {
                SurfconnError::InvalidInput(
                    "label volume",
                    format!("voxel ({}, {}, {}) does not hold a valid label", i, j, k),
                )
            })?;
        out[[i, j, k]] = label;
    }
    Ok(out)
}
