use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::operation::PathItem;
use super::schema::ObjectSchema;

pub const SWAGGER_VERSION: &str = "2.0";

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub version: String,
    pub title: String,
    pub contact: Contact,
    pub license: License,
}

/// Contact information. Empty strings for local sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub url: String,
}

/// License information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    pub url: String,
}

impl Info {
    /// Build the info block. `identifier` is `owner/repo` (or `local/local`).
    pub fn new(
        version: impl Into<String>,
        title: impl Into<String>,
        contact_name: impl Into<String>,
        contact_url: impl Into<String>,
        raw_base_url: &str,
        identifier: &str,
    ) -> Self {
        Self {
            version: version.into(),
            title: title.into(),
            contact: Contact {
                name: contact_name.into(),
                url: contact_url.into(),
            },
            license: License {
                name: "License".to_string(),
                url: format!("{raw_base_url}{identifier}/master/LICENSE"),
            },
        }
    }
}

/// Neighbouring revisions in the source's commit history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionContext {
    #[serde(rename = "prev_commit")]
    pub previous: Option<String>,
    #[serde(rename = "next_commit")]
    pub next: Option<String>,
}

/// Top-level Swagger 2.0 document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwaggerDocument {
    #[serde(flatten)]
    pub revision: RevisionContext,

    pub swagger: String,

    pub host: String,

    #[serde(rename = "basePath")]
    pub base_path: String,

    pub schemes: Vec<String>,

    pub info: Info,

    pub paths: IndexMap<String, PathItem>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, ObjectSchema>,

    /// Serialized provenance graph (Turtle).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prov: Option<String>,
}

/// `/api/{identifier}/`, with a `commit/{revision}/` segment when pinned.
pub fn base_path(identifier: &str, revision: Option<&str>) -> String {
    match revision {
        Some(rev) => format!("/api/{identifier}/commit/{rev}/"),
        None => format!("/api/{identifier}/"),
    }
}
