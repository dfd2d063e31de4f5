pub mod document;
pub mod operation;
pub mod parameter;
pub mod response;
pub mod schema;

pub use document::{
    Contact, Info, License, RevisionContext, SWAGGER_VERSION, SwaggerDocument, base_path,
};
pub use operation::{HttpMethod, Operation, PathItem};
pub use parameter::{Parameter, ParameterLocation};
pub use response::Response;
pub use schema::{ItemsSchema, ObjectSchema, PrimitiveSchema, SchemaOrRef};

/// Serialize a document to pretty JSON.
pub fn to_json(doc: &SwaggerDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

/// Serialize a document to YAML.
pub fn to_yaml(doc: &SwaggerDocument) -> Result<String, serde_yaml_ng::Error> {
    serde_yaml_ng::to_string(doc)
}
