//! Parameter detection by variable naming convention.
//!
//! A variable `?_name` is a required parameter and `?__name` an optional one.
//! An optional suffix selects the value type:
//!
//! | variable | type | extra |
//! |---|---|---|
//! | `?_name` | string | |
//! | `?_name_iri` | string | format `iri` |
//! | `?_name_number` | number | |
//! | `?_name_literal` | string | |
//! | `?_name_integer` | string | datatype `xsd:integer` (any XSD type name) |
//! | `?_name_en` | string | language `en` (any two-letter code) |
//! | `?_name_geo_point` | string | datatype `geo:point` |

use indexmap::IndexMap;
use serde::Serialize;

use super::lexer::Token;
use crate::error::ParameterError;

const XSD_DATATYPES: &[&str] = &[
    "boolean",
    "decimal",
    "integer",
    "double",
    "float",
    "date",
    "time",
    "dateTime",
    "dateTimeStamp",
    "gYear",
    "gMonth",
    "gDay",
    "gYearMonth",
    "gMonthDay",
    "duration",
    "yearMonthDuration",
    "dayTimeDuration",
    "byte",
    "short",
    "int",
    "long",
    "unsignedByte",
    "unsignedShort",
    "unsignedInt",
    "unsignedLong",
    "positiveInteger",
    "nonNegativeInteger",
    "negativeInteger",
    "nonPositiveInteger",
    "hexBinary",
    "base64Binary",
    "anyURI",
    "language",
    "normalizedString",
    "token",
    "NMTOKEN",
    "Name",
    "NCName",
];

/// A parameter found in a query body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub required: bool,
    #[serde(rename = "enum")]
    pub enum_values: Vec<String>,
    /// The variable as written in the query, e.g. `?_year_integer`.
    pub original: String,
    pub format: Option<String>,
    pub lang: Option<String>,
    pub datatype: Option<String>,
}

impl ExtractedParameter {
    fn same_type(&self, other: &Self) -> bool {
        self.param_type == other.param_type
            && self.format == other.format
            && self.lang == other.lang
            && self.datatype == other.datatype
    }
}

/// Collect parameters in first-appearance order, one per name.
pub fn collect_parameters(
    tokens: &[Token<'_>],
    enumerate: &IndexMap<String, Vec<String>>,
) -> Result<IndexMap<String, ExtractedParameter>, ParameterError> {
    let mut params: IndexMap<String, ExtractedParameter> = IndexMap::new();

    for token in tokens {
        let Token::Var { name, token } = token else {
            continue;
        };
        if !name.starts_with('_') {
            continue;
        }
        let mut param = parse_variable(name, token)?;
        if let Some(values) = enumerate.get(&param.name) {
            param.enum_values = values.clone();
        }

        match params.get(&param.name) {
            Some(existing) if !existing.same_type(&param) => {
                return Err(ParameterError::ConflictingTypes {
                    name: param.name,
                    first: existing.original.clone(),
                    second: param.original,
                });
            }
            Some(_) => {}
            None => {
                params.insert(param.name.clone(), param);
            }
        }
    }

    Ok(params)
}

fn parse_variable(name: &str, token: &str) -> Result<ExtractedParameter, ParameterError> {
    let stripped = name.trim_start_matches('_');
    let underscores = name.len() - stripped.len();
    if underscores > 2 || stripped.is_empty() {
        return Err(ParameterError::Malformed(token.to_string()));
    }

    let mut parts = stripped.splitn(3, '_');
    let pname = parts.next().unwrap_or_default();
    let suffix = parts.next().filter(|s| !s.is_empty());
    let user_defined = parts.next().filter(|s| !s.is_empty());

    let mut param = ExtractedParameter {
        name: pname.to_string(),
        param_type: "string".to_string(),
        required: underscores == 1,
        enum_values: Vec::new(),
        original: token.to_string(),
        format: None,
        lang: None,
        datatype: None,
    };

    match suffix {
        None | Some("literal") | Some("string") => {}
        Some("iri") => param.format = Some("iri".to_string()),
        Some("number") => param.param_type = "number".to_string(),
        Some(t) if XSD_DATATYPES.contains(&t) => param.datatype = Some(format!("xsd:{t}")),
        Some(t) if t.chars().count() == 2 => param.lang = Some(t.to_string()),
        Some(prefix) => {
            if let Some(local) = user_defined {
                param.datatype = Some(format!("{prefix}:{local}"));
            }
        }
    }

    Ok(param)
}
