use super::{DirEntry, FileMetadata, FileSystem, FileType};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn classify(file_type: fs::FileType) -> FileType {
    if file_type.is_file() {
        FileType::File
    } else if file_type.is_dir() {
        FileType::Directory
    } else {
        FileType::Symlink
    }
}

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn metadata(&self, path: &Path) -> Result<FileMetadata> {
        let meta =
            fs::symlink_metadata(path).context(format!("Failed to get metadata for {:?}", path))?;

        Ok(FileMetadata {
            size: meta.len(),
            file_type: classify(meta.file_type()),
        })
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).context(format!("Failed to read file {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let entries = fs::read_dir(path).context(format!("Failed to read directory {:?}", path))?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let file_type = entry
                .file_type()
                .context(format!("Failed to stat {:?}", entry.path()))?;

            result.push(DirEntry {
                path: entry.path(),
                name: entry.file_name().to_string_lossy().to_string(),
                file_type: classify(file_type),
            });
        }
        result.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        fs::create_dir(base.join("subdir")).unwrap();
        fs::File::create(base.join("test.txt"))
            .unwrap()
            .write_all(b"hello world")
            .unwrap();
        fs::File::create(base.join("subdir/nested.txt"))
            .unwrap()
            .write_all(b"nested content")
            .unwrap();

        dir
    }

    #[test]
    fn test_read_dir_is_sorted() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        let entries = fs.read_dir(temp.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["subdir", "test.txt"]);
        assert_eq!(entries[0].file_type, FileType::Directory);
        assert_eq!(entries[1].file_type, FileType::File);
    }

    #[test]
    fn test_read_and_metadata() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();
        let path = temp.path().join("test.txt");

        assert_eq!(fs.read(&path).unwrap(), b"hello world");
        let meta = fs.metadata(&path).unwrap();
        assert_eq!(meta.file_type, FileType::File);
        assert_eq!(meta.size, 11);
    }

    #[test]
    fn test_missing_file_errors() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        assert!(fs.read(&temp.path().join("nope")).is_err());
        assert!(!fs.exists(&temp.path().join("nope")));
    }
}
