//! Mesh and pose file I/O.
//!
//! Exports are plain Wavefront OBJ files with a JSON pose companion:
//!
//! | File | Module | Contents |
//! |------|--------|----------|
//! | `<name>.obj` | [`obj`] | world-space vertices and 1-based triangles |
//! | `<name>.json` | [`pose`] | 16 floats, column-major 4×4 matrix |
//!
//! [`ExportDirectory`] manages a folder of such pairs.
//!
//! # Usage
//!
//! ```no_run
//! use scanmesh::io::{obj, ExportDirectory};
//!
//! let exports = ExportDirectory::new(".");
//! if let Some(path) = exports.most_recent().unwrap() {
//!     let mesh = obj::load(&path).unwrap();
//!     println!("{}: {} triangles", path.display(), mesh.num_triangles());
//! }
//! ```

mod export;
pub mod obj;
pub mod pose;

pub use export::{ExportDirectory, ExportRecord, EXPORT_FOLDER};
