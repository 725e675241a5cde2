//! Export directory management.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use nalgebra::Matrix4;

use crate::error::{Result, ScanError};
use crate::ingest::IngestedFragment;
use crate::mesh::TriangleMesh;

use super::{obj, pose};

/// Name of the folder exports are written to, under the export root.
pub const EXPORT_FOLDER: &str = "OBJ_FILES";

/// Files written by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    /// Base name shared by the mesh and pose files.
    pub base_name: String,
    /// The `.obj` file.
    pub mesh_path: PathBuf,
    /// The `.json` pose companion, when a pose was given.
    pub pose_path: Option<PathBuf>,
}

/// A folder of mesh exports and their pose companions.
///
/// # Example
///
/// ```no_run
/// use scanmesh::io::ExportDirectory;
/// use scanmesh::mesh::TriangleMesh;
///
/// let exports = ExportDirectory::new("/tmp/scans");
/// let record = exports.export_mesh(Some("kitchen"), &TriangleMesh::empty(), None).unwrap();
/// assert!(record.mesh_path.ends_with("OBJ_FILES/kitchen.obj"));
/// ```
#[derive(Debug, Clone)]
pub struct ExportDirectory {
    dir: PathBuf,
}

impl ExportDirectory {
    /// Exports under `root/OBJ_FILES`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            dir: root.as_ref().join(EXPORT_FOLDER),
        }
    }

    /// The export folder.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Export fragments into one OBJ file, with an optional pose companion.
    ///
    /// A missing or blank `name` gets a generated identifier. The folder is
    /// created if needed.
    pub fn export(
        &self,
        name: Option<&str>,
        fragments: &[IngestedFragment],
        pose: Option<&Matrix4<f32>>,
    ) -> Result<ExportRecord> {
        self.write_export(name, pose, |path| obj::save_fragments(fragments, path))
    }

    /// Export a single mesh, with an optional pose companion.
    pub fn export_mesh(
        &self,
        name: Option<&str>,
        mesh: &TriangleMesh,
        pose: Option<&Matrix4<f32>>,
    ) -> Result<ExportRecord> {
        self.write_export(name, pose, |path| obj::save(mesh, path))
    }

    fn write_export<F>(
        &self,
        name: Option<&str>,
        pose: Option<&Matrix4<f32>>,
        write_mesh: F,
    ) -> Result<ExportRecord>
    where
        F: FnOnce(&Path) -> Result<()>,
    {
        // Best-effort: if this fails, the write below reports the error.
        if let Err(e) = fs::create_dir_all(&self.dir) {
            log::warn!("could not create {}: {}", self.dir.display(), e);
        }

        let base_name = match name.map(sanitize_name).filter(|n| !n.is_empty()) {
            Some(n) => n,
            None => self.unused_generated_name(),
        };

        let mesh_path = self.mesh_path(&base_name);
        let tmp_path = mesh_path.with_extension("obj.tmp");
        let written = write_mesh(&tmp_path)
            .and_then(|()| fs::rename(&tmp_path, &mesh_path).map_err(ScanError::from));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                log::debug!("could not remove {}: {}", tmp_path.display(), cleanup);
            }
            return Err(e);
        }

        let pose_path = match pose {
            Some(m) => {
                let path = self.pose_path(&base_name);
                pose::save(m, &path)?;
                Some(path)
            }
            None => None,
        };

        log::info!("exported mesh to {}", mesh_path.display());
        Ok(ExportRecord {
            base_name,
            mesh_path,
            pose_path,
        })
    }

    /// Path of the mesh file for `base_name`.
    pub fn mesh_path(&self, base_name: &str) -> PathBuf {
        self.dir.join(format!("{}.obj", base_name))
    }

    /// Path of the pose companion for `base_name`.
    pub fn pose_path(&self, base_name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", base_name))
    }

    /// All `.obj` exports, sorted by file name. Empty if the folder does not exist.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("obj") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// The most recently modified export.
    pub fn most_recent(&self) -> Result<Option<PathBuf>> {
        let mut newest: Option<(SystemTime, PathBuf)> = None;
        for path in self.list()? {
            let modified = fs::metadata(&path)?.modified().unwrap_or(UNIX_EPOCH);
            if newest.as_ref().map_or(true, |(t, _)| modified >= *t) {
                newest = Some((modified, path));
            }
        }
        Ok(newest.map(|(_, path)| path))
    }

    /// Load the mesh exported as `base_name`.
    pub fn load_mesh(&self, base_name: &str) -> Result<TriangleMesh> {
        obj::load(self.mesh_path(base_name))
    }

    /// Load the pose companion of `base_name`, if one was written.
    pub fn load_pose(&self, base_name: &str) -> Result<Option<Matrix4<f32>>> {
        let path = self.pose_path(base_name);
        if !path.exists() {
            return Ok(None);
        }
        pose::load(path).map(Some)
    }

    fn unused_generated_name(&self) -> String {
        let base = generated_name();
        let mut candidate = base.clone();
        let mut n = 1;
        while self.mesh_path(&candidate).exists() {
            candidate = format!("{}-{}", base, n);
            n += 1;
        }
        candidate
    }
}

/// `scan-<unix millis>`.
fn generated_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("scan-{}", millis)
}

/// Trim the name and replace path separators so it stays inside the folder.
fn sanitize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("  kitchen "), "kitchen");
        assert_eq!(sanitize_name("../etc/passwd"), "_etc_passwd");
        assert_eq!(sanitize_name("   "), "");
    }

    #[test]
    fn test_generated_name_prefix() {
        assert!(generated_name().starts_with("scan-"));
    }

    #[test]
    fn test_paths_share_base_name() {
        let exports = ExportDirectory::new("/data");
        assert_eq!(exports.mesh_path("a"), PathBuf::from("/data/OBJ_FILES/a.obj"));
        assert_eq!(exports.pose_path("a"), PathBuf::from("/data/OBJ_FILES/a.json"));
    }

    #[test]
    fn test_failed_write_removes_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let exports = ExportDirectory::new(dir.path());

        let result = exports.write_export(Some("partial"), None, |path| {
            fs::write(path, "v 0 0 0\n")?;
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        });
        assert!(result.is_err());
        assert!(!exports.path().join("partial.obj.tmp").exists());
        assert!(!exports.mesh_path("partial").exists());
    }

    #[test]
    fn test_failed_rename_removes_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let exports = ExportDirectory::new(dir.path());
        // A directory in the way of the final mesh path makes the rename fail.
        fs::create_dir_all(exports.mesh_path("blocked")).unwrap();

        let result = exports.export_mesh(Some("blocked"), &TriangleMesh::empty(), None);
        assert!(result.is_err());
        assert!(!exports.path().join("blocked.obj.tmp").exists());
        assert!(exports.mesh_path("blocked").is_dir());
    }

    #[test]
    fn test_list_missing_folder_is_empty() {
        let exports = ExportDirectory::new("/nonexistent/scanmesh/root");
        assert!(exports.list().unwrap().is_empty());
        assert!(exports.most_recent().unwrap().is_none());
    }
}
