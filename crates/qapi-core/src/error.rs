use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query is empty")]
    Empty,

    #[error("unrecognized query form: {0}")]
    UnrecognizedForm(String),

    #[error("unbalanced '{0}' in query")]
    Unbalanced(char),

    #[error("unterminated {0} in query")]
    Unterminated(&'static str),

    #[error("SELECT query projects no variables")]
    EmptyProjection,
}

#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("malformed parameter variable: {0}")]
    Malformed(String),

    #[error("parameter '{name}' declared as both {first} and {second}")]
    ConflictingTypes {
        name: String,
        first: String,
        second: String,
    },
}

/// A failure confined to a single query file. The build logs it and moves on.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("could not parse query {call_name}: {source}")]
    Metadata {
        call_name: String,
        #[source]
        source: QueryError,
    },

    #[error("could not parse parameters of query {call_name}: {source}")]
    Parameters {
        call_name: String,
        #[source]
        source: ParameterError,
    },
}

impl ItemError {
    pub fn call_name(&self) -> &str {
        match self {
            ItemError::Metadata { call_name, .. } | ItemError::Parameters { call_name, .. } => {
                call_name
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected response from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum RevisionError {
    #[error("repository has no commits")]
    NoCommits,

    #[error("revision {0} not found in commit history")]
    UnknownRevision(String),
}

/// A failure that aborts the whole build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    #[error("revision error: {0}")]
    Revision(#[from] RevisionError),

    #[error("call name '{call_name}' is produced by more than one query file")]
    DuplicateCallName { call_name: String },

    #[error("hosted source {0} requires a repository host")]
    MissingHost(String),

    #[error("failed to render description of {call_name}: {reason}")]
    Render { call_name: String, reason: String },
}
