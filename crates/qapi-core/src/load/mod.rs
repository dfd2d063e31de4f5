pub mod github;
pub mod local;

use crate::error::LoadError;
use crate::source::FileDescriptor;

pub use github::GithubLoader;
pub use local::LocalLoader;

/// Name of the side file holding a source's default SPARQL endpoint.
pub const ENDPOINT_FILE: &str = "endpoint.txt";

/// Suffix of the side file holding a query's output projection.
pub const PROJECTION_SUFFIX: &str = ".pyql";

/// Lists and reads the files of one source.
pub trait Loader {
    /// Files in the order they are processed.
    fn fetch_files(&self) -> Result<Vec<FileDescriptor>, LoadError>;

    fn text_for(&self, file: &FileDescriptor) -> Result<String, LoadError>;

    /// Base URI against which relative references in queries are resolved.
    fn raw_repo_uri(&self) -> String;

    /// The projection of `call_name`, read only when its side file is among
    /// `files`. Returns the side file with its text.
    fn projection_for<'a>(
        &self,
        files: &'a [FileDescriptor],
        call_name: &str,
    ) -> Result<Option<(&'a FileDescriptor, String)>, LoadError> {
        match find_projection(files, call_name) {
            Some(file) => Ok(Some((file, self.text_for(file)?))),
            None => Ok(None),
        }
    }
}

/// The listed `{call_name}.pyql` file, if any.
pub fn find_projection<'a>(
    files: &'a [FileDescriptor],
    call_name: &str,
) -> Option<&'a FileDescriptor> {
    let wanted = format!("{call_name}{PROJECTION_SUFFIX}");
    files.iter().find(|f| f.name == wanted)
}

/// Repository details shown in the document's info block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub name: String,
    pub owner_login: String,
    pub owner_url: String,
}

/// Hosting platform lookups needed for hosted sources.
pub trait RepositoryHost {
    fn repository(&self) -> Result<RepositoryInfo, LoadError>;

    /// Commit hashes of the default branch, newest first.
    fn commits(&self) -> Result<Vec<String>, LoadError>;

    /// URI of the repository resource, recorded as a provenance entity.
    fn api_repo_uri(&self) -> String;
}
