//! Surface-to-volume label projection and tractography endpoint connectomes.
//!
//! Both procedures rest on exact nearest neighbour search over a static
//! point cloud ([`spatial::KdTree`]):
//!
//! - [`projection`] labels each cortical ribbon voxel with the region of the
//!   closest white or pial surface vertex of its hemisphere;
//! - [`connectome`] matches streamline endpoints to the closest labelled
//!   voxel and counts region-to-region connections, discarding streamlines
//!   whose endpoints are not within a search radius.
//!
//! Inputs are in-memory `ndarray` grids and `nalgebra` affines; reading and
//! writing imaging file formats is left to other crates. Batched queries run
//! on the rayon thread pool when the `parallel` feature is enabled (the
//! default), without changing any result.
//!
//! [`spatial::KdTree`]: ./spatial/struct.KdTree.html
//! [`projection`]: ./projection/index.html
//! [`connectome`]: ./connectome/index.html
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

pub mod affine;
pub mod cloud;
pub mod combine;
pub mod connectome;
pub mod error;
pub mod projection;
pub mod regional;
pub mod spatial;
pub mod tissue;
pub mod volume;
mod util;

pub use crate::affine::{apply_affine, Affine4};
pub use crate::cloud::{HemisphereSurfacePair, LabeledPointCloud, PointCloud, Surface};
pub use crate::combine::combine_atlases;
pub use crate::connectome::{
    build_connectome, endpoints_from_array, Connectome, ConnectomeBuilder, EndpointPair,
    SearchRadius,
};
pub use crate::error::{Result, SurfconnError};
pub use crate::projection::{
    project_labels, project_ribbon, HemisphereProjector, HemisphereSelection, VertexHit,
};
pub use crate::regional::{regional_mean_series, RegionSeries};
pub use crate::spatial::{KdTree, Neighbor};
pub use crate::tissue::{Hemisphere, TissueClass};
