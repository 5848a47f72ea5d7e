//! Writing the rendered page to disk.

use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use lattice_shared::{LatticeError, Result};

/// What was written, for the run summary.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ArtifactMeta {
    pub path: PathBuf,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Write `content` to `target` atomically.
///
/// The bytes go to a hidden temp file next to the target, which is then
/// renamed into place. On any failure the temp file is removed and an
/// existing target is left untouched.
#[instrument(skip_all, fields(target = %target.display(), bytes = content.len()))]
pub fn write_artifact(target: &Path, content: &str) -> Result<ArtifactMeta> {
    let file_name = target.file_name().ok_or_else(|| {
        LatticeError::output_write(
            target,
            io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name"),
        )
    })?;

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| LatticeError::output_write(parent, e))?;
            parent.to_path_buf()
        }
        _ => PathBuf::from("."),
    };

    let temp = dir.join(format!(".{}.tmp", file_name.to_string_lossy()));

    if let Err(e) = std::fs::write(&temp, content) {
        let _ = std::fs::remove_file(&temp);
        return Err(LatticeError::output_write(target, e));
    }
    if let Err(e) = std::fs::rename(&temp, target) {
        let _ = std::fs::remove_file(&temp);
        return Err(LatticeError::output_write(target, e));
    }

    let sha256 = sha256_hex(content.as_bytes());
    debug!(%sha256, "wrote artifact");

    Ok(ArtifactMeta {
        path: target.to_path_buf(),
        sha256,
        size_bytes: content.len(),
    })
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_content_and_hash() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("graph.html");

        let meta = write_artifact(&target, "<html></html>").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "<html></html>");
        assert_eq!(meta.size_bytes, 13);
        assert_eq!(meta.sha256, sha256_hex(b"<html></html>"));
        assert_eq!(meta.sha256.len(), 64);
        assert!(!dir.path().join(".graph.html.tmp").exists());
    }

    #[test]
    fn creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("site").join("out").join("graph.html");
        write_artifact(&target, "x").unwrap();
        assert!(target.exists());
    }

    #[test]
    fn overwrites_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("graph.html");
        std::fs::write(&target, "old").unwrap();
        write_artifact(&target, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should go makes the rename fail.
        let target = dir.path().join("graph.html");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), "").unwrap();

        let err = write_artifact(&target, "content").unwrap_err();
        assert!(matches!(err, LatticeError::OutputWrite { .. }));
        assert!(err.is_fatal());
        assert!(!dir.path().join(".graph.html.tmp").exists());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
