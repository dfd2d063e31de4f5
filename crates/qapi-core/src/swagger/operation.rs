use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::parameter::Parameter;
use super::response::Response;

/// HTTP methods a query may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Head,
    Put,
    Delete,
    Options,
    Connect,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Head => "head",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Connect => "connect",
        }
    }

    /// Parse a declared method, ignoring case. Unknown methods yield `None`.
    pub fn parse(declared: &str) -> Option<Self> {
        match declared.trim().to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "head" => Some(HttpMethod::Head),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "options" => Some(HttpMethod::Options),
            "connect" => Some(HttpMethod::Connect),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One API operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub tags: Vec<String>,

    pub summary: String,

    pub description: String,

    pub produces: Vec<String>,

    /// `null` when the query takes no parameters.
    pub parameters: Option<Vec<Parameter>>,

    pub responses: IndexMap<String, Response>,
}

/// Operations of one path, keyed by method.
pub type PathItem = IndexMap<HttpMethod, Operation>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method() {
        assert_eq!(HttpMethod::parse("GET"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("Post"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::parse(" delete "), Some(HttpMethod::Delete));
        assert_eq!(HttpMethod::parse("connect"), Some(HttpMethod::Connect));
        assert_eq!(HttpMethod::parse("patch"), None);
        assert_eq!(HttpMethod::parse("weird"), None);
        assert_eq!(HttpMethod::parse(""), None);
    }

    #[test]
    fn test_method_as_path_item_key() {
        let mut item = PathItem::new();
        item.insert(
            HttpMethod::Get,
            Operation {
                tags: vec![],
                summary: String::new(),
                description: String::new(),
                produces: vec![],
                parameters: None,
                responses: IndexMap::new(),
            },
        );
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("get").is_some());
        assert_eq!(json["get"]["parameters"], serde_json::Value::Null);
    }
}
