//! Scene archives: open and validate, extract into a scoped working
//! directory, and discover the scene files inside it.

use std::fs::File;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::ZipArchive;

use scenebatch_core::SceneUnit;

use crate::error::{io_err, JobError};

/// Prefix of the working directory created inside the output directory.
pub const WORK_DIR_PREFIX: &str = ".scenebatch-";

/// A zip archive that has passed validation.
pub struct SceneArchive {
    path: PathBuf,
    zip: ZipArchive<File>,
}

impl SceneArchive {
    /// Open `path` and read its central directory.
    ///
    /// Returns [`JobError::NotAZipArchive`] if the file is not a valid zip.
    pub fn open(path: &Path) -> Result<Self, JobError> {
        let file = File::open(path).map_err(|e| io_err(path, e))?;
        let zip = ZipArchive::new(file).map_err(|source| JobError::NotAZipArchive {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            zip,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.zip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zip.is_empty()
    }

    /// Extract every entry into `work_dir`.
    pub fn extract_into(&mut self, work_dir: &WorkDir) -> Result<(), JobError> {
        self.zip
            .extract(work_dir.path())
            .map_err(|source| JobError::Extract {
                path: self.path.clone(),
                source,
            })
    }
}

/// Working directory for one job. Removed when dropped, on every exit path.
pub struct WorkDir {
    dir: TempDir,
}

impl WorkDir {
    /// Create a fresh, uniquely named directory inside `parent`.
    pub fn create_in(parent: &Path) -> Result<Self, JobError> {
        let dir = tempfile::Builder::new()
            .prefix(WORK_DIR_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| io_err(parent, e))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory now, reporting any failure.
    pub fn close(self) -> Result<(), JobError> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|e| io_err(path, e))
    }
}

/// List the scene files at the top level of `work_dir` whose extension is
/// `extension`, sorted by file name, with outputs derived under `out_dir`.
pub fn discover_scenes(
    work_dir: &Path,
    out_dir: &Path,
    extension: &str,
) -> Result<Vec<SceneUnit>, JobError> {
    let entries = std::fs::read_dir(work_dir).map_err(|e| io_err(work_dir, e))?;
    let mut scenes = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(work_dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| io_err(&path, e))?;
        if !file_type.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            scenes.push(path);
        }
    }
    scenes.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(scenes
        .into_iter()
        .map(|path| SceneUnit::new(path, out_dir))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn work_dir_is_removed_on_drop() {
        let parent = TempDir::new().unwrap();
        let path = {
            let work = WorkDir::create_in(parent.path()).unwrap();
            fs::write(work.path().join("a.blend"), b"x").unwrap();
            work.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn work_dir_close_removes_directory() {
        let parent = TempDir::new().unwrap();
        let work = WorkDir::create_in(parent.path()).unwrap();
        let path = work.path().to_path_buf();
        assert!(path.starts_with(parent.path()));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(WORK_DIR_PREFIX));
        work.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn discover_filters_by_extension_and_sorts() {
        let work = TempDir::new().unwrap();
        fs::write(work.path().join("b.blend"), b"").unwrap();
        fs::write(work.path().join("a.blend"), b"").unwrap();
        fs::write(work.path().join("notes.txt"), b"").unwrap();
        fs::write(work.path().join("c.blend1"), b"").unwrap();
        fs::create_dir(work.path().join("dir.blend")).unwrap();

        let scenes = discover_scenes(work.path(), Path::new("/out"), "blend").unwrap();
        let names: Vec<_> = scenes.iter().map(|s| s.file_name()).collect();
        assert_eq!(names, vec!["a.blend", "b.blend"]);
        assert_eq!(scenes[0].log_path, PathBuf::from("/out/a.blend.log"));
    }

    #[test]
    fn opening_plain_text_is_not_a_zip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scenes.zip");
        fs::write(&path, b"definitely not a zip").unwrap();
        let err = SceneArchive::open(&path).err().expect("should fail");
        assert!(matches!(err, JobError::NotAZipArchive { .. }), "got: {err}");
    }
}
