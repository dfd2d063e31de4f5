pub mod decorators;
pub mod lexer;
pub mod pagination;
pub mod parameters;
pub mod sparql;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::QueryError;
use crate::source::QueryKind;

pub use parameters::ExtractedParameter;
pub use sparql::SparqlParser;

/// What a query does when executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QueryType {
    /// Returns variable bindings.
    Select,
    /// Mutates the store.
    Update,
    /// CONSTRUCT, ASK, DESCRIBE, and TPF descriptions.
    Other,
}

/// Everything read from one query file. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMetadata {
    pub tags: Vec<String>,
    pub summary: String,
    pub description: String,
    /// The declared method, as written.
    pub method: Option<String>,
    pub pagination: Option<String>,
    pub endpoint: Option<String>,
    pub endpoint_in_url: bool,
    pub mime: Option<String>,
    pub query_type: QueryType,
    /// Output variables, in projection order. Select only.
    pub variables: Vec<String>,
    /// The query text with decorator lines removed.
    pub query: String,
    /// Allowed values per parameter name.
    pub enumerate: IndexMap<String, Vec<String>>,
    /// Every decorator, recognized or not.
    pub decorators: IndexMap<String, serde_json::Value>,
}

/// Parser selected by file suffix.
#[derive(Debug, Clone)]
pub enum QueryParser {
    Sparql(SparqlParser),
    Tpf,
}

impl QueryParser {
    pub fn for_kind(kind: QueryKind, default_endpoint: &str) -> Self {
        match kind {
            QueryKind::Sparql => QueryParser::Sparql(SparqlParser::new(default_endpoint)),
            QueryKind::Tpf => QueryParser::Tpf,
        }
    }

    /// Read the metadata of a query file. Only SPARQL parsing can fail.
    pub fn parse(&self, text: &str) -> Result<QueryMetadata, QueryError> {
        match self {
            QueryParser::Sparql(parser) => parser.parse_metadata(text),
            QueryParser::Tpf => Ok(decorators::parse_decorators(text)),
        }
    }
}
