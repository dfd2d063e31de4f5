pub mod build;
pub mod config;
pub mod error;
pub mod load;
pub mod prov;
pub mod query;
pub mod source;
pub mod swagger;

pub use build::{SpecItem, build_document, build_spec};
pub use config::QapiConfig;
pub use error::BuildError;
pub use load::{GithubLoader, LocalLoader, Loader, RepositoryHost};
pub use prov::{NoProvenance, ProvGraph, ProvenanceRecorder};
pub use source::SourceRef;
pub use swagger::SwaggerDocument;
