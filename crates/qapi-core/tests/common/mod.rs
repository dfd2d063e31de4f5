#![allow(dead_code)]

use qapi_core::error::LoadError;
use qapi_core::load::{Loader, RepositoryHost, RepositoryInfo};
use qapi_core::source::FileDescriptor;

pub const BANDS: &str = include_str!("../fixtures/bands_by_genre.rq");
pub const ADD_BAND: &str = include_str!("../fixtures/add_band.sparql");
pub const FRAGMENTS: &str = include_str!("../fixtures/fragments.tpf");
pub const BROKEN: &str = include_str!("../fixtures/broken.rq");

pub const RAW_URI: &str = "https://raw.example/o/r/master/";

/// Loader over in-memory files, listed in the order given.
pub struct MemoryLoader {
    files: Vec<(String, String)>,
    fail_listing: bool,
}

impl MemoryLoader {
    pub fn new(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(n, t)| (n.to_string(), t.to_string()))
                .collect(),
            fail_listing: false,
        }
    }

    /// Lists a `{call_name}.pyql` side file after the existing files.
    pub fn with_projection(mut self, call_name: &str, text: &str) -> Self {
        self.files
            .push((format!("{call_name}.pyql"), text.to_string()));
        self
    }

    pub fn failing() -> Self {
        Self {
            fail_listing: true,
            ..Self::new(&[])
        }
    }
}

impl Loader for MemoryLoader {
    fn fetch_files(&self) -> Result<Vec<FileDescriptor>, LoadError> {
        if self.fail_listing {
            return Err(LoadError::Status {
                url: format!("{RAW_URI}contents"),
                status: 503,
            });
        }
        Ok(self
            .files
            .iter()
            .map(|(name, _)| FileDescriptor {
                name: name.clone(),
                path: name.clone(),
                download_url: format!("{RAW_URI}{name}"),
            })
            .collect())
    }

    fn text_for(&self, file: &FileDescriptor) -> Result<String, LoadError> {
        self.files
            .iter()
            .find(|(name, _)| *name == file.name)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| LoadError::Status {
                url: file.download_url.clone(),
                status: 404,
            })
    }

    fn raw_repo_uri(&self) -> String {
        RAW_URI.to_string()
    }
}

/// Hosting platform with a fixed commit history, newest first.
pub struct FakeHost {
    pub commits: Vec<String>,
    pub unavailable: bool,
}

impl FakeHost {
    pub fn with_history(commits: &[&str]) -> Self {
        Self {
            commits: commits.iter().map(|c| c.to_string()).collect(),
            unavailable: false,
        }
    }
}

impl RepositoryHost for FakeHost {
    fn repository(&self) -> Result<RepositoryInfo, LoadError> {
        if self.unavailable {
            return Err(LoadError::Status {
                url: self.api_repo_uri(),
                status: 404,
            });
        }
        Ok(RepositoryInfo {
            name: "r".to_string(),
            owner_login: "o".to_string(),
            owner_url: "https://github.example/o".to_string(),
        })
    }

    fn commits(&self) -> Result<Vec<String>, LoadError> {
        Ok(self.commits.clone())
    }

    fn api_repo_uri(&self) -> String {
        "https://api.example/repos/o/r".to_string()
    }
}
