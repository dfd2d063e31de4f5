use serde::{Deserialize, Serialize};

/// Where the query files of one build come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// A hosted repository, optionally pinned to a revision.
    Hosted {
        owner: String,
        name: String,
        revision: Option<String>,
    },
    /// A local directory.
    Local,
}

impl SourceRef {
    pub fn hosted(owner: impl Into<String>, name: impl Into<String>) -> Self {
        SourceRef::Hosted {
            owner: owner.into(),
            name: name.into(),
            revision: None,
        }
    }

    pub fn at_revision(self, revision: impl Into<String>) -> Self {
        match self {
            SourceRef::Hosted { owner, name, .. } => SourceRef::Hosted {
                owner,
                name,
                revision: Some(revision.into()),
            },
            SourceRef::Local => SourceRef::Local,
        }
    }

    /// `owner/name`, or `local/local`.
    pub fn identifier(&self) -> String {
        match self {
            SourceRef::Hosted { owner, name, .. } => format!("{owner}/{name}"),
            SourceRef::Local => "local/local".to_string(),
        }
    }

    /// The explicitly requested revision, if any.
    pub fn revision(&self) -> Option<&str> {
        match self {
            SourceRef::Hosted { revision, .. } => revision.as_deref(),
            SourceRef::Local => None,
        }
    }
}

/// One file listed by a loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    /// Path relative to the source root.
    pub path: String,
    /// Where the raw text can be fetched from.
    pub download_url: String,
}

/// How a file is processed, decided by its name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Sparql,
    Tpf,
}

impl QueryKind {
    /// Classify a file name. `None` means the file is not a query and is skipped.
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.ends_with(".rq") || name.ends_with(".sparql") {
            Some(QueryKind::Sparql)
        } else if name.ends_with(".tpf") {
            Some(QueryKind::Tpf)
        } else {
            None
        }
    }
}

/// The call name of a query file: everything before the first `.`.
pub fn call_name(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}
