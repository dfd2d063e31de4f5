use crate::swagger::{Parameter, ParameterLocation};

/// The `page` parameter added to paginated queries.
pub fn pagination_parameter(results_per_page: &str) -> Parameter {
    Parameter {
        name: "page".to_string(),
        param_type: "int".to_string(),
        required: None,
        location: ParameterLocation::Query,
        description: format!(
            "The page number for this paginated query ({results_per_page} results per page)"
        ),
        enum_values: Vec::new(),
        default: Some(serde_json::Value::from(1)),
    }
}
