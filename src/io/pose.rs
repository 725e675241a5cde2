//! Pose companion files.
//!
//! A pose is stored next to its mesh export as a JSON array of the 16
//! entries of a 4×4 matrix in column-major order.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use nalgebra::Matrix4;

use crate::error::{Result, ScanError};

/// Write `pose` as a JSON array.
pub fn write<W: Write>(writer: &mut W, pose: &Matrix4<f32>) -> Result<()> {
    // `as_slice` is column-major.
    serde_json::to_writer(&mut *writer, pose.as_slice()).map_err(std::io::Error::from)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Read a pose written by [`write`].
///
/// # Errors
///
/// `Io` when the reader fails, `Parse` for anything that is not an array of
/// 16 numbers.
///
/// # Example
///
/// ```
/// use scanmesh::io::pose;
/// use nalgebra::{Matrix4, Vector3};
///
/// let m = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0));
/// let mut buffer = Vec::new();
/// pose::write(&mut buffer, &m).unwrap();
/// assert_eq!(pose::read(buffer.as_slice()).unwrap(), m);
/// ```
pub fn read<R: Read>(reader: R) -> Result<Matrix4<f32>> {
    let values: Vec<f32> = serde_json::from_reader(reader).map_err(|e| {
        if e.is_io() {
            ScanError::Io(e.into())
        } else {
            ScanError::parse(e.line(), e.to_string())
        }
    })?;
    if values.len() != 16 {
        return Err(ScanError::parse(
            0,
            format!("pose must have 16 values, found {}", values.len()),
        ));
    }
    Ok(Matrix4::from_column_slice(&values))
}

/// Save a pose file.
pub fn save<P: AsRef<Path>>(pose: &Matrix4<f32>, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(&mut writer, pose)
}

/// Load a pose file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Matrix4<f32>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read(BufReader::new(file)).map_err(|e| e.with_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_column_major_layout() {
        let m = Matrix4::new_translation(&Vector3::new(4.0, 5.0, 6.0));
        let mut buffer = Vec::new();
        write(&mut buffer, &m).unwrap();
        let values: Vec<f32> = serde_json::from_slice(&buffer).unwrap();
        // Translation is the last column.
        assert_eq!(&values[12..15], &[4.0, 5.0, 6.0]);
        assert_eq!(values[15], 1.0);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let err = read("[1.0, 2.0, 3.0]".as_bytes()).unwrap_err();
        assert!(matches!(err, ScanError::Parse { .. }));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "device went away"))
        }
    }

    #[test]
    fn test_reader_failure_is_io_error() {
        match read(FailingReader).unwrap_err() {
            ScanError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::Other),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_not_json_rejected() {
        assert!(matches!(
            read("v 1 2 3".as_bytes()),
            Err(ScanError::Parse { .. })
        ));
    }
}
