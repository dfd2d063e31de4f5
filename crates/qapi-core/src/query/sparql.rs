use indexmap::IndexMap;
use log::debug;

use super::decorators::parse_decorators;
use super::lexer::{Token, check_balanced, tokenize};
use super::parameters::{ExtractedParameter, collect_parameters};
use super::{QueryMetadata, QueryType};
use crate::error::{ParameterError, QueryError};

const READ_FORMS: &[&str] = &["CONSTRUCT", "ASK", "DESCRIBE"];
const UPDATE_FORMS: &[&str] = &[
    "INSERT", "DELETE", "LOAD", "CLEAR", "CREATE", "DROP", "COPY", "MOVE", "ADD", "WITH",
];

/// Reads SPARQL query files: decorators plus a lexical look at the query body.
#[derive(Debug, Clone)]
pub struct SparqlParser {
    default_endpoint: String,
}

impl SparqlParser {
    pub fn new(default_endpoint: impl Into<String>) -> Self {
        Self {
            default_endpoint: default_endpoint.into(),
        }
    }

    pub fn parse_metadata(&self, text: &str) -> Result<QueryMetadata, QueryError> {
        let mut metadata = parse_decorators(text);
        let tokens = tokenize(&metadata.query)?;
        let (query_type, variables) = classify(&tokens)?;
        metadata.query_type = query_type;
        metadata.variables = variables;
        Ok(metadata)
    }

    /// The endpoint a query runs against.
    ///
    /// An `endpoint` decorator wins; relative values are resolved against
    /// `base_uri`. Otherwise the parser's default endpoint is used.
    pub fn guess_endpoint(&self, metadata: &QueryMetadata, base_uri: &str) -> String {
        match metadata.endpoint.as_deref().map(str::trim) {
            Some(endpoint) if endpoint.contains("://") => endpoint.to_string(),
            Some(endpoint) if !endpoint.is_empty() => resolve_relative(base_uri, endpoint),
            _ => self.default_endpoint.clone(),
        }
    }

    /// Derive typed parameters from the `?_name` variables of a query.
    ///
    /// `endpoint` is where enumerations would be looked up; only values
    /// declared through the `enumerate` decorator are used.
    pub fn extract_parameters(
        &self,
        text: &str,
        endpoint: &str,
    ) -> Result<IndexMap<String, ExtractedParameter>, ParameterError> {
        let metadata = parse_decorators(text);
        // Unparseable bodies were rejected by parse_metadata already.
        let tokens = tokenize(&metadata.query).unwrap_or_default();
        debug!("Extracting parameters for endpoint {endpoint}");
        collect_parameters(&tokens, &metadata.enumerate)
    }
}

fn resolve_relative(base_uri: &str, reference: &str) -> String {
    let reference = reference.trim_start_matches("./");
    if base_uri.is_empty() || base_uri.ends_with('/') {
        format!("{base_uri}{reference}")
    } else {
        format!("{base_uri}/{reference}")
    }
}

/// Decide the query form and, for SELECT, the projected variables.
fn classify(tokens: &[Token<'_>]) -> Result<(QueryType, Vec<String>), QueryError> {
    if tokens.is_empty() {
        return Err(QueryError::Empty);
    }
    check_balanced(tokens)?;

    let mut idx = 0;
    loop {
        match tokens.get(idx) {
            Some(t) if t.is_keyword("BASE") => idx += 2,
            Some(t) if t.is_keyword("PREFIX") => idx += 3,
            _ => break,
        }
    }

    let form = match tokens.get(idx) {
        Some(Token::Word(w)) => w.to_ascii_uppercase(),
        Some(other) => return Err(QueryError::UnrecognizedForm(format!("{other:?}"))),
        None => return Err(QueryError::Empty),
    };

    if form == "SELECT" {
        let variables = projection(&tokens[idx + 1..]);
        if variables.is_empty() {
            return Err(QueryError::EmptyProjection);
        }
        Ok((QueryType::Select, variables))
    } else if READ_FORMS.contains(&form.as_str()) {
        Ok((QueryType::Other, Vec::new()))
    } else if UPDATE_FORMS.contains(&form.as_str()) {
        Ok((QueryType::Update, Vec::new()))
    } else {
        Err(QueryError::UnrecognizedForm(form))
    }
}

/// Variables projected by the tokens following `SELECT`.
fn projection(tokens: &[Token<'_>]) -> Vec<String> {
    let mut vars: Vec<String> = Vec::new();
    let mut push = |name: &str| {
        if !vars.iter().any(|v| v == name) {
            vars.push(name.to_string());
        }
    };

    let mut idx = 0;
    while tokens
        .get(idx)
        .is_some_and(|t| t.is_keyword("DISTINCT") || t.is_keyword("REDUCED"))
    {
        idx += 1;
    }

    if tokens.get(idx) == Some(&Token::Punct('*')) {
        for token in &tokens[idx + 1..] {
            if let Token::Var { name, .. } = token {
                push(name);
            }
        }
        return vars;
    }

    let mut depth = 0usize;
    let mut after_as = false;
    for token in &tokens[idx..] {
        match token {
            Token::Punct('(') => depth += 1,
            Token::Punct(')') => depth = depth.saturating_sub(1),
            Token::Punct('{') if depth == 0 => break,
            t if depth == 0 && (t.is_keyword("WHERE") || t.is_keyword("FROM")) => break,
            t if t.is_keyword("AS") => after_as = true,
            Token::Var { name, .. } if depth == 0 || after_as => {
                push(name);
                after_as = false;
            }
            _ => {}
        }
    }
    vars
}
