use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A schema with only a `type` keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
}

impl PrimitiveSchema {
    pub fn string() -> Self {
        Self {
            schema_type: "string".to_string(),
        }
    }
}

/// An object schema with named string properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub schema_type: String,

    pub required: Vec<String>,

    pub properties: IndexMap<String, PrimitiveSchema>,
}

impl ObjectSchema {
    /// The shape of one SPARQL JSON result binding for variable `name`.
    pub fn binding(name: &str) -> Self {
        let mut properties = IndexMap::new();
        for key in ["type", "value", "xml:lang", "datatype"] {
            properties.insert(key.to_string(), PrimitiveSchema::string());
        }
        Self {
            name: Some(name.to_string()),
            schema_type: "object".to_string(),
            required: vec!["type".to_string(), "value".to_string()],
            properties,
        }
    }

    /// The shared error payload referenced by every default response.
    pub fn message() -> Self {
        let mut properties = IndexMap::new();
        properties.insert("message".to_string(), PrimitiveSchema::string());
        Self {
            name: None,
            schema_type: "object".to_string(),
            required: vec!["message".to_string()],
            properties,
        }
    }
}

/// Item schema of a result array. `properties` is `null` when a query has no
/// output variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: Option<IndexMap<String, ObjectSchema>>,
}

/// A reference or inline response schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Array {
        #[serde(rename = "type")]
        schema_type: String,
        items: ItemsSchema,
    },
}

impl SchemaOrRef {
    pub fn definition(name: &str) -> Self {
        SchemaOrRef::Ref {
            ref_path: format!("#/definitions/{name}"),
        }
    }

    pub fn array_of_objects(properties: Option<IndexMap<String, ObjectSchema>>) -> Self {
        SchemaOrRef::Array {
            schema_type: "array".to_string(),
            items: ItemsSchema {
                schema_type: "object".to_string(),
                properties,
            },
        }
    }
}
