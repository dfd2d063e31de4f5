use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::Loader;
use crate::error::LoadError;
use crate::source::FileDescriptor;

/// Reads query files from a local directory. Subdirectories are ignored.
#[derive(Debug, Clone)]
pub struct LocalLoader {
    dir: PathBuf,
}

impl LocalLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn io_error(path: &Path, source: io::Error) -> LoadError {
        LoadError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

impl Loader for LocalLoader {
    fn fetch_files(&self) -> Result<Vec<FileDescriptor>, LoadError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| Self::io_error(&self.dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Self::io_error(&self.dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            files.push(FileDescriptor {
                download_url: format!("file://{}", path.display()),
                path: name.clone(),
                name,
            });
        }
        // read_dir order is platform dependent
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    fn text_for(&self, file: &FileDescriptor) -> Result<String, LoadError> {
        let path = self.dir.join(&file.path);
        fs::read_to_string(&path).map_err(|e| Self::io_error(&path, e))
    }

    fn raw_repo_uri(&self) -> String {
        format!("file://{}/", self.dir.display())
    }
}
