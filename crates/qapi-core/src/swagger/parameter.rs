use serde::{Deserialize, Serialize};

use crate::query::ExtractedParameter;

/// Parameter location. Every generated parameter travels in the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
}

/// A Swagger 2.0 operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "type")]
    pub param_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    pub description: String,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl Parameter {
    /// A parameter derived from a query variable.
    pub fn from_extracted(p: &ExtractedParameter) -> Self {
        Self {
            name: p.name.clone(),
            param_type: p.param_type.clone(),
            required: Some(p.required),
            location: ParameterLocation::Query,
            description: format!(
                "A value of type {} that will substitute {} in the original query",
                p.param_type, p.original
            ),
            enum_values: p.enum_values.clone(),
            default: None,
        }
    }

    /// The `endpoint` override parameter.
    pub fn endpoint() -> Self {
        Self {
            name: "endpoint".to_string(),
            param_type: "string".to_string(),
            required: None,
            location: ParameterLocation::Query,
            description: "Alternative endpoint for SPARQL query".to_string(),
            enum_values: Vec::new(),
            default: None,
        }
    }
}
