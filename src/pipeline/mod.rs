//! Per-cycle reconstruction and the worker that serializes it.
//!
//! [`process_snapshot`] is the whole cycle as a plain function. [`SurfaceState`]
//! adds the session-long ceiling state and cycle numbering, and
//! [`ReconstructionWorker`] runs it on a background thread so the producer
//! never waits on geometry work. Finished [`CycleResult`]s are handed to a
//! [`RenderState`] on the consumer side.
//!
//! ```
//! use scanmesh::config::PipelineConfig;
//! use scanmesh::ingest::{Fragment, Snapshot};
//! use scanmesh::pipeline::{RenderState, ReconstructionWorker};
//! use nalgebra::{Matrix4, Point3};
//!
//! let fragment = Fragment::triangles(
//!     vec![Point3::new(0.0, 2.5, 0.0), Point3::new(3.0, 2.5, 0.0), Point3::new(3.0, 2.5, 3.0)],
//!     vec![0u32, 1, 2],
//!     Matrix4::identity(),
//! );
//!
//! let worker = ReconstructionWorker::spawn(PipelineConfig::default()).unwrap();
//! worker.submit(Snapshot::new(vec![fragment])).unwrap();
//!
//! let mut render = RenderState::new();
//! render.apply(worker.recv().unwrap());
//! assert_eq!(render.ceiling_point_count(), 3);
//! ```

mod cycle;
mod render;
mod state;
mod worker;

pub use cycle::{process_snapshot, CycleResult};
pub use render::RenderState;
pub use state::SurfaceState;
pub use worker::ReconstructionWorker;
