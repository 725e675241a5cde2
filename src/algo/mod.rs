//! Mesh processing algorithms.
//!
//! - **Denoising**: removal of redundant near-coplanar triangles left by
//!   overlapping fragments
//! - **Smoothing**: uniform Laplacian relaxation

pub mod denoise;
pub mod smooth;

pub use denoise::{denoise, DenoiseOptions, DenoiseResult};
pub use smooth::{laplacian_smooth, laplacian_smooth_positions, SmoothOptions, VertexAdjacency};
