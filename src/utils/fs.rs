//! Atomic artifact writes.
//!
//! Final artifacts are written to a temporary file in the destination
//! directory and renamed into place, so a failing task can never leave a
//! truncated `scripts.js` or `index.html` behind.

use crate::compiler::CompileError;
use std::{fs, io::Write, path::Path};
use tempfile::NamedTempFile;

/// Atomically write `contents` to `dest`, creating parent directories.
pub fn publish(dest: &Path, contents: &[u8]) -> Result<(), CompileError> {
    let parent = dest.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(parent).map_err(|err| CompileError::io(parent, err))?;

    let mut file = NamedTempFile::new_in(parent).map_err(|err| CompileError::io(parent, err))?;
    file.write_all(contents)
        .and_then(|()| file.as_file().sync_all())
        .map_err(|err| CompileError::io(file.path(), err))?;
    file.persist(dest)
        .map_err(|err| CompileError::io(dest, err.error))?;
    Ok(())
}

/// Atomically copy `src` to `dest`.
pub fn publish_copy(src: &Path, dest: &Path) -> Result<(), CompileError> {
    let contents = fs::read(src).map_err(|err| CompileError::io(src, err))?;
    publish(dest, &contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_publish_creates_parents() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("build/fonts/a.woff");
        publish(&dest, b"font").unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"font");
    }

    #[test]
    fn test_publish_replaces_existing() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("styles.css");
        fs::write(&dest, "old contents that are longer").unwrap();

        publish(&dest, b"new").unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn test_publish_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        publish(&dir.path().join("index.html"), b"<html></html>").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("index.html")]);
    }

    #[test]
    fn test_publish_copy_missing_source() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.css");
        let err = publish_copy(&dir.path().join("missing.css"), &dest).unwrap_err();

        assert!(matches!(err, CompileError::Io { .. }));
        assert!(!dest.exists());
    }
}
