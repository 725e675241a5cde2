//! Wavefront OBJ export and import.
//!
//! Only positions and triangles are carried: `v x y z` and `f a b c` lines
//! with 1-based indices. Texture/normal references in face fields are
//! stripped on import and faces with more than three vertices keep only
//! their first three.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{GeometryError, Result, ScanError};
use crate::ingest::{fragment_offsets, IngestedFragment};
use crate::mesh::TriangleMesh;

const HEADER: &str = "# scanmesh OBJ export";

/// Mesh read from OBJ text, plus how many malformed lines were skipped.
#[derive(Debug, Clone)]
pub struct ObjReadResult {
    /// The parsed mesh.
    pub mesh: TriangleMesh,
    /// Number of `v`/`f` lines that could not be parsed.
    pub skipped_lines: usize,
}

/// Write fragments into one OBJ stream.
///
/// Each fragment's vertices are followed by its faces; face indices use the
/// same running vertex offset as [`aggregate`](crate::ingest::aggregate).
pub fn write_fragments<W: Write>(writer: &mut W, fragments: &[IngestedFragment]) -> Result<()> {
    writeln!(writer, "{}", HEADER)?;

    for (k, (fragment, offset)) in fragments
        .iter()
        .zip(fragment_offsets(fragments))
        .enumerate()
    {
        if fragment.indices.len() % 3 != 0 {
            return Err(GeometryError::IndexCount {
                len: fragment.indices.len(),
            }
            .into());
        }
        if let Some(&bad) = fragment
            .indices
            .iter()
            .find(|&&i| i as usize >= fragment.vertices.len())
        {
            return Err(GeometryError::FragmentIndexOutOfRange {
                fragment: k,
                index: bad as usize,
                vertex_count: fragment.vertices.len(),
            }
            .into());
        }

        for v in &fragment.vertices {
            writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
        }
        for f in fragment.indices.chunks_exact(3) {
            writeln!(
                writer,
                "f {} {} {}",
                f[0] + offset + 1,
                f[1] + offset + 1,
                f[2] + offset + 1
            )?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write a single mesh as OBJ.
pub fn write_mesh<W: Write>(writer: &mut W, mesh: &TriangleMesh) -> Result<()> {
    writeln!(writer, "{}", HEADER)?;
    for v in mesh.vertices() {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for [a, b, c] in mesh.triangles() {
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse OBJ text.
///
/// Malformed `v` and `f` lines are skipped and counted. Other directives are
/// ignored.
///
/// # Errors
///
/// I/O errors from the reader, or a face that references a vertex the file
/// does not define. Lines that are not valid UTF-8 are skipped like any
/// other malformed line.
///
/// # Example
///
/// ```
/// use scanmesh::io::obj;
///
/// let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1 2/2 3/3\nf 1 2\n";
/// let result = obj::read(text.as_bytes()).unwrap();
/// assert_eq!(result.mesh.triangle(0), [0, 1, 2]);
/// assert_eq!(result.skipped_lines, 1);
/// ```
pub fn read<R: BufRead>(reader: R) -> Result<ObjReadResult> {
    let mut vertices: Vec<Point3<f32>> = Vec::new();
    let mut faces: Vec<(usize, [usize; 3])> = Vec::new();
    let mut skipped_lines = 0usize;

    for (i, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes?;
        let line_no = i + 1;
        let line = match std::str::from_utf8(&bytes) {
            Ok(line) => line,
            Err(e) => {
                log::debug!("skipping non-UTF-8 OBJ line {}: {}", line_no, e);
                skipped_lines += 1;
                continue;
            }
        };
        let mut fields = line.split_whitespace();

        let parsed = match fields.next() {
            Some("v") => parse_vertex(fields).map(|v| vertices.push(v)),
            Some("f") => parse_face(fields).map(|f| faces.push((line_no, f))),
            _ => continue,
        };
        if parsed.is_none() {
            log::debug!("skipping malformed OBJ line {}: {:?}", line_no, line);
            skipped_lines += 1;
        }
    }

    let mut indices = Vec::with_capacity(faces.len() * 3);
    for (line_no, face) in faces {
        for index in face {
            if index >= vertices.len() {
                return Err(ScanError::parse(
                    line_no,
                    format!(
                        "face references vertex {} but only {} vertices are defined",
                        index + 1,
                        vertices.len()
                    ),
                ));
            }
            indices.push(index as u32);
        }
    }

    Ok(ObjReadResult {
        mesh: TriangleMesh::new(vertices, indices)?,
        skipped_lines,
    })
}

/// Parse OBJ text held in memory.
pub fn parse_str(text: &str) -> Result<ObjReadResult> {
    read(text.as_bytes())
}

fn parse_vertex<'a>(mut fields: impl Iterator<Item = &'a str>) -> Option<Point3<f32>> {
    let x = fields.next()?.parse::<f32>().ok()?;
    let y = fields.next()?.parse::<f32>().ok()?;
    let z = fields.next()?.parse::<f32>().ok()?;
    Some(Point3::new(x, y, z))
}

fn parse_face<'a>(mut fields: impl Iterator<Item = &'a str>) -> Option<[usize; 3]> {
    let mut next_index = || -> Option<usize> {
        let field = fields.next()?;
        let index = field.split('/').next()?.parse::<usize>().ok()?;
        index.checked_sub(1)
    };
    Some([next_index()?, next_index()?, next_index()?])
}

/// Save a mesh to an OBJ file.
pub fn save<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_mesh(&mut writer, mesh)
}

/// Save fragments to one OBJ file.
pub fn save_fragments<P: AsRef<Path>>(fragments: &[IngestedFragment], path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_fragments(&mut writer, fragments)
}

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use scanmesh::io::obj;
///
/// let mesh = obj::load("OBJ_FILES/kitchen.obj").unwrap();
/// println!("{} triangles", mesh.num_triangles());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let result = read(BufReader::new(file)).map_err(|e| e.with_path(path))?;
    if result.skipped_lines > 0 {
        log::debug!(
            "{}: skipped {} malformed lines",
            path.display(),
            result.skipped_lines
        );
    }
    Ok(result.mesh)
}
