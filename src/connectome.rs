//! Region-by-region connectomes from tractography endpoints.
//!
//! Every labelled voxel of an atlas volume is an anchor point in world
//! space. Each streamline endpoint is matched to its closest anchor; a
//! streamline counts as a connection between the two anchors' regions only
//! if *both* endpoints lie strictly within the search radius of their
//! anchor. Unlike surface projection, endpoints far from every anchor are
//! dropped rather than forced onto the closest region.
//!
//! The resulting matrix is symmetric: a streamline from region `a` to region
//! `b` adds one to both `(a, b)` and `(b, a)`, while a streamline starting
//! and ending in region `a` adds one to `(a, a)`.
use crate::affine::{voxels_to_points, Affine4};
use crate::cloud::PointCloud;
use crate::error::{Result, SurfconnError};
use crate::spatial::KdTree;
use crate::util::write_output;
use crate::volume::{max_label, select_labeled};
use log::{debug, warn};
use nalgebra::Point3;
use ndarray::{Array2, ArrayView2, ArrayView3};
use num_traits::AsPrimitive;
use std::io::Write;
use std::path::Path;

/// First and last point of a streamline.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EndpointPair {
    /// Where the streamline starts.
    pub start: Point3<f64>,
    /// Where the streamline ends.
    pub end: Point3<f64>,
}

impl EndpointPair {
    /// Pair two endpoints.
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        EndpointPair { start, end }
    }

    /// Keep only the endpoints of a full streamline.
    ///
    /// # Errors
    ///
    /// - `SurfconnError::InvalidInput` if the streamline has fewer than two
    /// points.
    pub fn from_streamline(points: &[Point3<f64>]) -> Result<Self> {
        match (points.first(), points.last()) {
            (Some(start), Some(end)) if points.len() >= 2 => Ok(EndpointPair::new(*start, *end)),
            _ => Err(SurfconnError::InvalidInput(
                "streamline",
                format!("expected at least 2 points, got {}", points.len()),
            )),
        }
    }
}

/// Read endpoint pairs from an `S x 2 x 3` array (streamline, endpoint,
/// coordinate), such as the endpoint arrays exported from a tractogram.
///
/// # Errors
///
/// - `SurfconnError::InvalidInput` if the array is not shaped `S x 2 x 3`.
pub fn endpoints_from_array<A>(array: ArrayView3<A>) -> Result<Vec<EndpointPair>>
where
    A: AsPrimitive<f64>,
{
    let shape = array.shape();
    if shape[1] != 2 || shape[2] != 3 {
        return Err(SurfconnError::InvalidInput(
            "endpoint array",
            format!("expected shape (S, 2, 3), got {:?}", shape),
        ));
    }
    let point = |s: usize, e: usize| {
        Point3::new(
            array[[s, e, 0]].as_(),
            array[[s, e, 1]].as_(),
            array[[s, e, 2]].as_(),
        )
    };
    Ok((0..shape[0])
        .map(|s| EndpointPair::new(point(s, 0), point(s, 1)))
        .collect())
}

/// A validated, strictly positive search radius.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct SearchRadius(f64);

impl SearchRadius {
    /// Validate a radius.
    ///
    /// # Errors
    ///
    /// - `SurfconnError::InvalidInput` if `radius` is not a finite number
    /// greater than zero.
    pub fn new(radius: f64) -> Result<Self> {
        if radius.is_finite() && radius > 0.0 {
            Ok(SearchRadius(radius))
        } else {
            Err(SurfconnError::InvalidInput(
                "search radius",
                format!("must be a positive finite distance, got {}", radius),
            ))
        }
    }

    /// The radius as a distance.
    pub fn get(self) -> f64 {
        self.0
    }
}

/// Streamline bookkeeping of a connectome build.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ConnectomeStats {
    /// Streamlines considered.
    pub streamlines: usize,
    /// Streamlines with both endpoints within the search radius.
    pub kept: usize,
}

impl ConnectomeStats {
    /// Streamlines discarded by the search radius.
    pub fn dropped(&self) -> usize {
        self.streamlines - self.kept
    }
}

/// A symmetric region-by-region streamline count matrix.
///
/// Row and column `i` stand for region label `i + 1`. Counts are whole
/// numbers stored as `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Connectome {
    matrix: Array2<f64>,
    stats: ConnectomeStats,
}

impl Connectome {
    /// Number of regions (rows and columns).
    pub fn node_count(&self) -> usize {
        self.matrix.nrows()
    }

    /// The adjacency matrix.
    pub fn matrix(&self) -> ArrayView2<f64> {
        self.matrix.view()
    }

    /// Take the adjacency matrix.
    pub fn into_matrix(self) -> Array2<f64> {
        self.matrix
    }

    /// Streamline counts of the build.
    pub fn stats(&self) -> ConnectomeStats {
        self.stats
    }

    /// Connection weight between two region labels, `None` if either label
    /// is 0 or outside the matrix.
    pub fn weight(&self, a: u32, b: u32) -> Option<f64> {
        let n = self.node_count() as u32;
        if a == 0 || b == 0 || a > n || b > n {
            return None;
        }
        Some(self.matrix[[a as usize - 1, b as usize - 1]])
    }

    /// Sum of every entry of the matrix.
    pub fn total_weight(&self) -> f64 {
        self.matrix.sum()
    }

    /// Whether the matrix equals its transpose.
    pub fn is_symmetric(&self) -> bool {
        self.matrix == self.matrix.t()
    }

    /// Write the matrix as comma separated rows.
    pub fn write_csv<W: Write>(&self, mut to: W) -> Result<()> {
        for row in self.matrix.outer_iter() {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(to, "{}", line.join(","))?;
        }
        Ok(())
    }

    /// Write the matrix as comma separated rows to a file. The file is
    /// gzip-compressed if its name ends with ".gz".
    pub fn to_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_output(path, |w| self.write_csv(w))
    }
}

/// Endpoint classifier over the labelled voxels of an atlas volume.
///
/// Building it indexes the world coordinates of every voxel with a label
/// greater than zero; the same builder can then process any number of
/// endpoint sets.
#[derive(Debug, Clone)]
pub struct ConnectomeBuilder {
    tree: KdTree,
    labels: Vec<u32>,
    node_count: usize,
}

impl ConnectomeBuilder {
    /// Index the labelled voxels of `labels`, placed in world space with
    /// `vox2world`.
    ///
    /// # Errors
    ///
    /// - `SurfconnError::InvalidInput` if no voxel has a label greater than
    /// zero.
    pub fn new(labels: ArrayView3<u32>, vox2world: &Affine4) -> Result<Self> {
        let (voxels, voxel_labels) = select_labeled(labels.view());
        if voxels.is_empty() {
            return Err(SurfconnError::InvalidInput(
                "label volume",
                format!("no voxel has a label greater than 0 (shape {:?})", labels.shape()),
            ));
        }
        let cloud = PointCloud::new(voxels_to_points(vox2world, &voxels))?;
        let tree = KdTree::build(cloud)?;
        let node_count = max_label(labels) as usize;
        debug!(
            "connectome anchors: {} labelled voxels, {} regions",
            voxel_labels.len(),
            node_count
        );
        Ok(ConnectomeBuilder {
            tree,
            labels: voxel_labels,
            node_count,
        })
    }

    /// Size of the matrices this builder produces: the largest label of the
    /// volume.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Region labels of each streamline's start and end, or `None` for a
    /// streamline with an endpoint at or beyond `radius` from every
    /// labelled voxel. Output follows input order.
    pub fn assign(
        &self,
        endpoints: &[EndpointPair],
        radius: SearchRadius,
    ) -> Result<Vec<Option<(u32, u32)>>> {
        let starts: Vec<_> = endpoints.iter().map(|e| e.start).collect();
        let ends: Vec<_> = endpoints.iter().map(|e| e.end).collect();
        let start_hits = self.tree.batch_query(&starts)?;
        let end_hits = self.tree.batch_query(&ends)?;

        let r = radius.get();
        Ok(start_hits
            .iter()
            .zip(&end_hits)
            .map(|(s, e)| {
                if s.distance < r && e.distance < r {
                    Some((self.labels[s.index], self.labels[e.index]))
                } else {
                    None
                }
            })
            .collect())
    }

    /// Count the connections between regions.
    ///
    /// An empty result (no streamline within the radius) is an all-zero
    /// matrix of the usual size.
    pub fn build(&self, endpoints: &[EndpointPair], radius: SearchRadius) -> Result<Connectome> {
        let n = self.node_count;
        let mut counts = Array2::<u64>::zeros((n, n));
        let mut stats = ConnectomeStats {
            streamlines: endpoints.len(),
            kept: 0,
        };
        for (a, b) in self.assign(endpoints, radius)?.into_iter().flatten() {
            counts[[a as usize - 1, b as usize - 1]] += 1;
            stats.kept += 1;
        }

        // count both directions, then undo the doubling of self-connections
        let mut adjacency = &counts + &counts.t();
        for i in 0..n {
            adjacency[[i, i]] /= 2;
        }

        if stats.kept == 0 {
            warn!(
                "none of {} streamlines lies within {} of a labelled voxel",
                stats.streamlines,
                radius.get()
            );
        } else {
            debug!(
                "kept {} of {} streamlines (radius {})",
                stats.kept,
                stats.streamlines,
                radius.get()
            );
        }
        Ok(Connectome {
            matrix: adjacency.mapv(|c| c as f64),
            stats,
        })
    }
}

/// Build a connectome in one call.
///
/// # Errors
///
/// - `SurfconnError::InvalidInput` if `radius` is not positive, or if the
/// volume has no labelled voxel.
pub fn build_connectome(
    labels: ArrayView3<u32>,
    vox2world: &Affine4,
    endpoints: &[EndpointPair],
    radius: f64,
) -> Result<Connectome> {
    let radius = SearchRadius::new(radius)?;
    ConnectomeBuilder::new(labels, vox2world)?.build(endpoints, radius)
}
