//! Index buffers for incoming fragments.
//!
//! Depth-sensing subsystems hand out triangle indices as 8, 16 or 32-bit
//! integers. [`IndexBuffer`] keeps the original width and normalizes to `u32`
//! on demand.

use crate::error::GeometryError;

/// Width of a single index in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexWidth {
    /// 8-bit indices.
    U8,
    /// 16-bit indices.
    U16,
    /// 32-bit indices.
    U32,
}

impl IndexWidth {
    /// Number of bytes per index.
    #[inline]
    pub fn bytes(self) -> usize {
        match self {
            IndexWidth::U8 => 1,
            IndexWidth::U16 => 2,
            IndexWidth::U32 => 4,
        }
    }

    /// Width matching a bytes-per-index count, if supported.
    pub fn from_bytes(bytes: usize) -> Option<IndexWidth> {
        match bytes {
            1 => Some(IndexWidth::U8),
            2 => Some(IndexWidth::U16),
            4 => Some(IndexWidth::U32),
            _ => None,
        }
    }
}

/// Triangle indices of one fragment, in their native width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexBuffer {
    /// 8-bit indices.
    U8(Vec<u8>),
    /// 16-bit indices.
    U16(Vec<u16>),
    /// 32-bit indices.
    U32(Vec<u32>),
}

impl IndexBuffer {
    /// Decode little-endian index bytes of the given width.
    ///
    /// # Example
    ///
    /// ```
    /// use scanmesh::mesh::{IndexBuffer, IndexWidth};
    ///
    /// let buffer = IndexBuffer::from_le_bytes(IndexWidth::U16, &[0, 0, 1, 0, 2, 0]).unwrap();
    /// assert_eq!(buffer.to_u32(), vec![0, 1, 2]);
    /// ```
    pub fn from_le_bytes(width: IndexWidth, bytes: &[u8]) -> Result<Self, GeometryError> {
        let w = width.bytes();
        if bytes.len() % w != 0 {
            return Err(GeometryError::InvalidIndexBytes {
                len: bytes.len(),
                width: w,
            });
        }

        let buffer = match width {
            IndexWidth::U8 => IndexBuffer::U8(bytes.to_vec()),
            IndexWidth::U16 => IndexBuffer::U16(
                bytes
                    .chunks_exact(2)
                    .map(|c| u16::from_le_bytes([c[0], c[1]]))
                    .collect(),
            ),
            IndexWidth::U32 => IndexBuffer::U32(
                bytes
                    .chunks_exact(4)
                    .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
        };
        Ok(buffer)
    }

    /// The native index width.
    pub fn width(&self) -> IndexWidth {
        match self {
            IndexBuffer::U8(_) => IndexWidth::U8,
            IndexBuffer::U16(_) => IndexWidth::U16,
            IndexBuffer::U32(_) => IndexWidth::U32,
        }
    }

    /// Number of indices.
    pub fn len(&self) -> usize {
        match self {
            IndexBuffer::U8(v) => v.len(),
            IndexBuffer::U16(v) => v.len(),
            IndexBuffer::U32(v) => v.len(),
        }
    }

    /// Whether the buffer holds no indices.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Indices widened to `u32`.
    pub fn to_u32(&self) -> Vec<u32> {
        match self {
            IndexBuffer::U8(v) => v.iter().map(|&i| u32::from(i)).collect(),
            IndexBuffer::U16(v) => v.iter().map(|&i| u32::from(i)).collect(),
            IndexBuffer::U32(v) => v.clone(),
        }
    }
}

impl From<Vec<u32>> for IndexBuffer {
    fn from(v: Vec<u32>) -> Self {
        IndexBuffer::U32(v)
    }
}

impl From<Vec<u16>> for IndexBuffer {
    fn from(v: Vec<u16>) -> Self {
        IndexBuffer::U16(v)
    }
}

impl From<Vec<u8>> for IndexBuffer {
    fn from(v: Vec<u8>) -> Self {
        IndexBuffer::U8(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths_normalize_to_u32() {
        assert_eq!(IndexBuffer::U8(vec![1, 2, 255]).to_u32(), vec![1, 2, 255]);
        assert_eq!(IndexBuffer::U16(vec![0, 65535]).to_u32(), vec![0, 65535]);
        assert_eq!(IndexBuffer::U32(vec![7]).to_u32(), vec![7]);
    }

    #[test]
    fn test_from_le_bytes_u32() {
        let bytes = [1, 0, 0, 0, 0, 1, 0, 0];
        let buffer = IndexBuffer::from_le_bytes(IndexWidth::U32, &bytes).unwrap();
        assert_eq!(buffer.width(), IndexWidth::U32);
        assert_eq!(buffer.to_u32(), vec![1, 256]);
    }

    #[test]
    fn test_from_le_bytes_rejects_partial_index() {
        let err = IndexBuffer::from_le_bytes(IndexWidth::U16, &[0, 0, 1]).unwrap_err();
        assert_eq!(err, GeometryError::InvalidIndexBytes { len: 3, width: 2 });
    }

    #[test]
    fn test_width_from_bytes() {
        assert_eq!(IndexWidth::from_bytes(2), Some(IndexWidth::U16));
        assert_eq!(IndexWidth::from_bytes(3), None);
    }
}
