//! Merging of two label volumes into one atlas.
//!
//! Typically a cortical atlas (for instance one produced by
//! [`project_labels`]) is extended with a subcortical one. Labels of the
//! second atlas are shifted past the first atlas' label range so that both
//! sets of regions stay distinct.
//!
//! [`project_labels`]: ../projection/fn.project_labels.html
use crate::error::{Result, SurfconnError};
use log::debug;
use ndarray::{Array3, ArrayView3, Zip};

/// Combine two atlases of the same shape.
///
/// Voxels labelled in `primary` keep their label. Voxels unlabelled in
/// `primary` but labelled in `secondary` get the secondary label plus
/// `shift`. All other voxels stay 0.
///
/// # Errors
///
/// - `SurfconnError::InvalidInput` if the shapes differ, or if a shifted
/// label does not fit in a `u32`.
pub fn combine_atlases(
    primary: ArrayView3<u32>,
    secondary: ArrayView3<u32>,
    shift: u32,
) -> Result<Array3<u32>> {
    if primary.shape() != secondary.shape() {
        return Err(SurfconnError::InvalidInput(
            "secondary atlas",
            format!(
                "shape {:?} does not match primary atlas shape {:?}",
                secondary.shape(),
                primary.shape()
            ),
        ));
    }
    let max_secondary = secondary.iter().copied().max().unwrap_or(0);
    if max_secondary.checked_add(shift).is_none() {
        return Err(SurfconnError::InvalidInput(
            "atlas shift",
            format!("label {} shifted by {} overflows", max_secondary, shift),
        ));
    }

    let mut added = 0usize;
    let combined = Zip::from(&primary)
        .and(&secondary)
        .map_collect(|&p, &s| {
            if p == 0 && s > 0 {
                added += 1;
                s + shift
            } else {
                p
            }
        });
    debug!("added {} voxels from the secondary atlas (shift {})", added, shift);
    Ok(combined)
}
