//! Error types for scanmesh.
//!
//! Geometry problems are reported through [`GeometryError`]; everything that
//! crosses the crate boundary is wrapped in [`ScanError`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`ScanError`].
pub type Result<T> = std::result::Result<T, ScanError>;

/// Degenerate or inconsistent geometry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// The index buffer does not describe whole triangles.
    #[error("index buffer length {len} is not a multiple of 3")]
    IndexCount {
        /// Number of indices in the buffer.
        len: usize,
    },

    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        /// The triangle index.
        triangle: usize,
        /// The offending vertex index.
        index: usize,
        /// Number of vertices available.
        vertex_count: usize,
    },

    /// A fragment's local index points outside that fragment's own vertices.
    #[error("fragment {fragment} references local vertex {index}, but it has {vertex_count} vertices")]
    FragmentIndexOutOfRange {
        /// Position of the fragment in the snapshot.
        fragment: usize,
        /// The offending local index.
        index: usize,
        /// Number of vertices in the fragment.
        vertex_count: usize,
    },

    /// Raw index bytes do not split evenly into indices, or the index width
    /// is not 1, 2 or 4 bytes.
    #[error("{len} bytes cannot be split into {width}-byte indices")]
    InvalidIndexBytes {
        /// Byte length of the buffer.
        len: usize,
        /// Bytes per index.
        width: usize,
    },

    /// A replacement vertex array has a different length than the mesh.
    #[error("expected {expected} vertices, got {actual}")]
    VertexCountMismatch {
        /// Number of vertices in the mesh.
        expected: usize,
        /// Number of vertices supplied.
        actual: usize,
    },
}

/// Errors that can occur in scanmesh operations.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Degenerate or inconsistent geometry.
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialized mesh or pose data that cannot be used.
    #[error("failed to parse {path}: line {line}: {message}")]
    Parse {
        /// The file path (or `<memory>` for in-memory input).
        path: PathBuf,
        /// 1-based line number, 0 when the error is not tied to a line.
        line: usize,
        /// Error message.
        message: String,
    },

    /// Invalid configuration file.
    #[error("invalid configuration in {path}: {message}")]
    Config {
        /// The configuration file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// The background worker has stopped.
    #[error("reconstruction worker is no longer running")]
    WorkerDisconnected,

    /// The worker queue is full and the snapshot was not accepted.
    #[error("reconstruction worker queue is full ({capacity} pending snapshots)")]
    WorkerBusy {
        /// Queue capacity.
        capacity: usize,
    },
}

impl ScanError {
    /// Create a parse error for in-memory input.
    pub fn parse<M: Into<String>>(line: usize, message: M) -> Self {
        ScanError::Parse {
            path: PathBuf::from("<memory>"),
            line,
            message: message.into(),
        }
    }

    /// Attach a file path to a parse error, leaving other errors untouched.
    pub fn with_path<P: Into<PathBuf>>(self, path: P) -> Self {
        match self {
            ScanError::Parse { line, message, .. } => ScanError::Parse {
                path: path.into(),
                line,
                message,
            },
            other => other,
        }
    }
}
