//! Loading the feed and cross-link files from disk.

use std::io;
use std::path::Path;

use tracing::{debug, info};

use lattice_shared::{CrossLinkEntry, CrossLinkFile, LatticeError, Result};

/// Read the feed document. A missing or unreadable file is fatal.
pub fn read_feed_file(path: &Path) -> Result<String> {
    let xml = std::fs::read_to_string(path).map_err(|e| LatticeError::io(path, e))?;
    debug!(path = %path.display(), bytes = xml.len(), "feed file read");
    Ok(xml)
}

/// Load declared cross-links.
///
/// Returns `None` when the file does not exist. Files ending in `.toml` are
/// parsed as TOML, anything else as JSON; both use a top-level `crosslinks`
/// list. A file that exists but cannot be parsed is a configuration error.
pub fn load_crosslinks(path: &Path) -> Result<Option<Vec<CrossLinkEntry>>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no cross-link file");
            return Ok(None);
        }
        Err(e) => return Err(LatticeError::io(path, e)),
    };

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let file: CrossLinkFile = if is_toml {
        toml::from_str(&content).map_err(|e| {
            LatticeError::config(format!("cannot parse cross-link file {}: {e}", path.display()))
        })?
    } else {
        serde_json::from_str(&content).map_err(|e| {
            LatticeError::config(format!("cannot parse cross-link file {}: {e}", path.display()))
        })?
    };

    info!(
        path = %path.display(),
        entries = file.crosslinks.len(),
        "cross-link file loaded"
    );
    Ok(Some(file.crosslinks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_feed_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_feed_file(&dir.path().join("nope.xml")).unwrap_err();
        assert!(matches!(err, LatticeError::Io { .. }));
        assert!(err.to_string().contains("nope.xml"));
    }

    #[test]
    fn missing_crosslinks_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_crosslinks(&dir.path().join("crosslinks.json")).unwrap().is_none());
    }

    #[test]
    fn loads_json_fixture() {
        let entries = load_crosslinks(Path::new("../../../fixtures/crosslinks/crosslinks.json"))
            .unwrap()
            .unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].source, "kelly-criterion");
        assert_eq!(entries[0].target, "bayes-theorem");
        assert!(entries[0].reason.is_some());
    }

    #[test]
    fn loads_toml_fixture() {
        let entries = load_crosslinks(Path::new("../../../fixtures/crosslinks/crosslinks.toml"))
            .unwrap()
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].source, "opportunity-cost");
    }

    #[test]
    fn empty_object_means_no_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crosslinks.json");
        std::fs::write(&path, "{}").unwrap();
        assert_eq!(load_crosslinks(&path).unwrap(), Some(vec![]));
    }

    #[test]
    fn malformed_file_is_config_error_naming_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_crosslinks(&path).unwrap_err();
        assert!(matches!(err, LatticeError::Config { .. }));
        assert!(err.to_string().contains("links.json"));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.toml");
        std::fs::write(&path, "[[crosslinks]]\nsource = ").unwrap();
        assert!(matches!(
            load_crosslinks(&path).unwrap_err(),
            LatticeError::Config { .. }
        ));
    }
}
