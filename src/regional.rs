//! Per-region averages of a 4D series, such as a functional MRI run.
use crate::error::{Result, SurfconnError};
use crate::util::write_output;
use log::{debug, warn};
use ndarray::{s, Array1, Array2, ArrayView2, ArrayView3, ArrayView4};
use num_traits::AsPrimitive;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

/// Mean time course of each requested region, one row per region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSeries {
    regions: Vec<u32>,
    means: Array2<f64>,
}

impl RegionSeries {
    /// Region labels, in row order.
    pub fn regions(&self) -> &[u32] {
        &self.regions
    }

    /// The `regions x timepoints` means. Rows of regions without voxels are
    /// NaN.
    pub fn means(&self) -> ArrayView2<f64> {
        self.means.view()
    }

    /// Number of time points.
    pub fn timepoints(&self) -> usize {
        self.means.ncols()
    }

    /// Write a header line `label,timepoint_0,...` followed by one line per
    /// region.
    pub fn write_csv<W: Write>(&self, mut to: W) -> Result<()> {
        let header: Vec<String> = (0..self.timepoints())
            .map(|t| format!("timepoint_{}", t))
            .collect();
        writeln!(to, "label,{}", header.join(","))?;
        for (label, row) in self.regions.iter().zip(self.means.outer_iter()) {
            let values: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(to, "{},{}", label, values.join(","))?;
        }
        Ok(())
    }

    /// Write the table to a file, gzip-compressed if the name ends with
    /// ".gz".
    pub fn to_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_output(path, |w| self.write_csv(w))
    }
}

/// Average a 4D series `(x, y, z, t)` over the voxels of each region.
///
/// `labels` must match the first three dimensions of `series`. Regions that
/// do not occur in the volume get a row of NaN.
///
/// # Errors
///
/// - `SurfconnError::InvalidInput` if the spatial shapes differ.
pub fn regional_mean_series<A>(
    labels: ArrayView3<u32>,
    series: ArrayView4<A>,
    regions: &[u32],
) -> Result<RegionSeries>
where
    A: AsPrimitive<f64>,
{
    if labels.shape() != &series.shape()[..3] {
        return Err(SurfconnError::InvalidInput(
            "series",
            format!(
                "spatial shape {:?} does not match label volume shape {:?}",
                &series.shape()[..3],
                labels.shape()
            ),
        ));
    }
    let rows: HashMap<u32, usize> = regions.iter().enumerate().map(|(i, &r)| (r, i)).collect();
    let timepoints = series.shape()[3];
    let mut sums = Array2::<f64>::zeros((regions.len(), timepoints));
    let mut counts = vec![0usize; regions.len()];

    for ((i, j, k), label) in labels.indexed_iter() {
        if let Some(&row) = rows.get(label) {
            let voxel = series.slice(s![i, j, k, ..]);
            let mut acc = sums.row_mut(row);
            acc.zip_mut_with(&voxel, |a, v| *a += v.as_());
            counts[row] += 1;
        }
    }

    for (row, &count) in counts.iter().enumerate() {
        let mut acc = sums.row_mut(row);
        if count == 0 {
            warn!("region {} has no voxels", regions[row]);
            acc.assign(&Array1::from_elem(timepoints, f64::NAN));
        } else {
            acc /= count as f64;
        }
    }
    debug!(
        "averaged {} regions over {} time points",
        regions.len(),
        timepoints
    );
    Ok(RegionSeries {
        regions: regions.to_vec(),
        means: sums,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, Array4};

    #[test]
    fn means_per_region() {
        let mut labels = Array3::<u32>::zeros((2, 1, 1));
        labels[[0, 0, 0]] = 1;
        labels[[1, 0, 0]] = 1;
        let mut series = Array4::<f32>::zeros((2, 1, 1, 3));
        series.slice_mut(s![0, 0, 0, ..]).assign(&ndarray::arr1(&[1., 2., 3.]));
        series.slice_mut(s![1, 0, 0, ..]).assign(&ndarray::arr1(&[3., 4., 5.]));

        let out = regional_mean_series(labels.view(), series.view(), &[1, 7]).unwrap();
        assert_eq!(out.regions(), &[1, 7]);
        assert_eq!(out.means().row(0).to_vec(), vec![2., 3., 4.]);
        assert!(out.means().row(1).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn shapes_must_agree() {
        let labels = Array3::<u32>::zeros((2, 2, 2));
        let series = Array4::<f64>::zeros((2, 2, 3, 5));
        assert!(regional_mean_series(labels.view(), series.view(), &[1]).is_err());
    }

    #[test]
    fn csv_header_and_rows() {
        let labels = Array3::<u32>::from_elem((1, 1, 1), 4);
        let series = Array4::<f64>::from_elem((1, 1, 1, 2), 0.5);
        let out = regional_mean_series(labels.view(), series.view(), &[4]).unwrap();
        let mut buf = Vec::new();
        out.write_csv(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "label,timepoint_0,timepoint_1\n4,0.5,0.5\n"
        );
    }
}
