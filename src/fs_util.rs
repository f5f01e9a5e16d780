use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::Builder;
use tracing::debug;

use crate::error::VibesError;

/// Files directly inside `dir` with the given extension, sorted by path.
/// A missing directory yields an empty list.
pub fn list_files_with_extension(
    dir: &Utf8Path,
    ext: &str,
) -> Result<Vec<Utf8PathBuf>, VibesError> {
    if !dir.as_std_path().is_dir() {
        debug!(dir = %dir, "input directory not present");
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(dir.as_std_path())
        .map_err(|err| VibesError::Filesystem(format!("list {dir}: {err}")))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| VibesError::Filesystem(err.to_string()))?;
        let path = Utf8PathBuf::from_path_buf(entry.path())
            .map_err(|path| VibesError::Filesystem(format!("non UTF-8 path: {}", path.display())))?;
        if path.is_file() && path.extension() == Some(ext) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn read_text(path: &Utf8Path) -> Result<String, VibesError> {
    fs::read_to_string(path.as_std_path())
        .map_err(|err| VibesError::Filesystem(format!("read {path}: {err}")))
}

/// Writes through a temp file in the destination directory, then renames.
pub fn write_atomic(path: &Utf8Path, content: &[u8]) -> Result<(), VibesError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    fs::create_dir_all(parent.as_std_path())
        .map_err(|err| VibesError::Filesystem(format!("create {parent}: {err}")))?;
    let mut temp = Builder::new()
        .prefix(".vibes-viz")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| VibesError::Filesystem(err.to_string()))?;
    temp.write_all(content)
        .map_err(|err| VibesError::Filesystem(format!("write {path}: {err}")))?;
    temp.persist(path.as_std_path())
        .map_err(|err| VibesError::Filesystem(format!("persist {path}: {}", err.error)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_matching_files_sorted() {
        let temp = tempfile::tempdir().unwrap();
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        for name in ["b.tsv", "a.tsv", "c.gff", "notes.txt"] {
            fs::write(dir.join(name), "").unwrap();
        }
        let found = list_files_with_extension(&dir, "tsv").unwrap();
        let names: Vec<_> = found.iter().filter_map(|p| p.file_name()).collect();
        assert_eq!(names, vec!["a.tsv", "b.tsv"]);
    }

    #[test]
    fn missing_directory_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let dir = Utf8PathBuf::from_path_buf(temp.path().join("absent")).unwrap();
        assert!(list_files_with_extension(&dir, "tsv").unwrap().is_empty());
    }

    #[test]
    fn write_atomic_creates_parents_and_replaces() {
        let temp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp.path().join("viz/g.html")).unwrap();
        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();
        assert_eq!(read_text(&path).unwrap(), "two");
    }
}
