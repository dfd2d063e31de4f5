use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::error::ItemError;
use crate::query::pagination::pagination_parameter;
use crate::query::{QueryMetadata, QueryParser, QueryType, SparqlParser};
use crate::source::{QueryKind, call_name};
use crate::swagger::{HttpMethod, ObjectSchema, Parameter};

/// One API operation built from one query file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecItem {
    /// Position of the source file in loader order.
    pub position: usize,
    pub call_name: String,
    pub kind: QueryKind,
    pub method: HttpMethod,
    pub tags: Vec<String>,
    pub summary: String,
    pub description: String,
    pub query: String,
    /// `None` when the operation takes no parameters; never an empty list.
    pub parameters: Option<Vec<Parameter>>,
    /// Output variable schemas. Present for SELECT queries only.
    pub item_properties: Option<IndexMap<String, ObjectSchema>>,
    pub projection: Option<String>,
    /// Decorators requested through `extra_metadata`, copied verbatim.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// Inputs shared by every item of one build.
#[derive(Debug, Clone, Copy)]
pub struct ItemContext<'a> {
    /// Base URI of the source, used to resolve relative endpoints.
    pub base_uri: &'a str,
    pub extra_keys: &'a [String],
    pub default_endpoint: &'a str,
}

/// Build the item for one file.
///
/// Returns `Ok(None)` for files that are not queries. An `Err` affects only
/// this file; callers log it and continue.
pub fn build_item(
    position: usize,
    file_name: &str,
    raw_text: &str,
    ctx: &ItemContext<'_>,
) -> Result<Option<SpecItem>, ItemError> {
    let Some(kind) = QueryKind::from_file_name(file_name) else {
        return Ok(None);
    };
    let name = call_name(file_name);

    let parser = QueryParser::for_kind(kind, ctx.default_endpoint);
    let metadata = parser.parse(raw_text).map_err(|source| ItemError::Metadata {
        call_name: name.to_string(),
        source,
    })?;

    let mut item = match &parser {
        QueryParser::Sparql(sparql) => sparql_item(sparql, name, raw_text, &metadata, ctx)?,
        QueryParser::Tpf => tpf_item(name, &metadata),
    };
    item.position = position;

    for key in ctx.extra_keys {
        if let Some(value) = metadata.decorators.get(key) {
            item.extra.insert(key.clone(), value.clone());
        }
    }

    Ok(Some(item))
}

fn sparql_item(
    parser: &SparqlParser,
    name: &str,
    raw_text: &str,
    metadata: &QueryMetadata,
    ctx: &ItemContext<'_>,
) -> Result<SpecItem, ItemError> {
    let declared = metadata.method.as_deref().and_then(HttpMethod::parse);

    let endpoint = parser.guess_endpoint(metadata, ctx.base_uri);
    debug!("Read query endpoint: {endpoint}");

    let mut params = Vec::new();
    if metadata.query_type == QueryType::Select {
        let extracted = parser
            .extract_parameters(raw_text, &endpoint)
            .map_err(|source| ItemError::Parameters {
                call_name: name.to_string(),
                source,
            })?;
        params.extend(extracted.values().map(Parameter::from_extracted));
    }
    if let Some(pagination) = &metadata.pagination {
        params.push(pagination_parameter(pagination));
    }
    if metadata.endpoint_in_url {
        params.push(Parameter::endpoint());
    }

    // Only SELECT reads by default; every other form is sent as POST.
    let (method, item_properties) = match metadata.query_type {
        QueryType::Select => {
            let properties: IndexMap<String, ObjectSchema> = metadata
                .variables
                .iter()
                .map(|v| (v.clone(), ObjectSchema::binding(v)))
                .collect();
            (declared.unwrap_or(HttpMethod::Get), Some(properties))
        }
        QueryType::Update | QueryType::Other => (declared.unwrap_or(HttpMethod::Post), None),
    };

    Ok(new_item(name, QueryKind::Sparql, method, metadata, params, item_properties))
}

fn tpf_item(name: &str, metadata: &QueryMetadata) -> SpecItem {
    // Unknown methods fall back to GET here, unlike SPARQL queries.
    let method = metadata
        .method
        .as_deref()
        .and_then(HttpMethod::parse)
        .unwrap_or(HttpMethod::Get);

    let params: Vec<Parameter> = metadata
        .pagination
        .as_deref()
        .map(pagination_parameter)
        .into_iter()
        .collect();

    new_item(name, QueryKind::Tpf, method, metadata, params, None)
}

fn new_item(
    name: &str,
    kind: QueryKind,
    method: HttpMethod,
    metadata: &QueryMetadata,
    params: Vec<Parameter>,
    item_properties: Option<IndexMap<String, ObjectSchema>>,
) -> SpecItem {
    SpecItem {
        position: 0,
        call_name: name.to_string(),
        kind,
        method,
        tags: metadata.tags.clone(),
        summary: metadata.summary.clone(),
        description: metadata.description.clone(),
        query: metadata.query.clone(),
        parameters: (!params.is_empty()).then_some(params),
        item_properties,
        projection: None,
        extra: IndexMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_EXTRA: &[String] = &[];

    fn ctx() -> ItemContext<'static> {
        ItemContext {
            base_uri: "file:///queries/",
            extra_keys: NO_EXTRA,
            default_endpoint: "http://dbpedia.org/sparql",
        }
    }

    fn param_names(item: &SpecItem) -> Vec<&str> {
        item.parameters
            .as_ref()
            .map(|ps| ps.iter().map(|p| p.name.as_str()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_unsupported_file_is_skipped() {
        assert!(build_item(0, "README.md", "# hi", &ctx()).unwrap().is_none());
        assert!(build_item(0, "band.pyql", "x", &ctx()).unwrap().is_none());
    }

    #[test]
    fn test_call_name_uses_first_dot() {
        let item = build_item(3, "bands.by.genre.rq", "SELECT ?b WHERE { ?b ?p ?o }", &ctx())
            .unwrap()
            .unwrap();
        assert_eq!(item.call_name, "bands");
        assert_eq!(item.position, 3);
    }

    #[test]
    fn test_select_parameter_order() {
        let text = "#+ pagination: 20\nSELECT ?band WHERE { ?band ?_genre ?__year }";
        let item = build_item(0, "bands.rq", text, &ctx()).unwrap().unwrap();
        assert_eq!(param_names(&item), vec!["genre", "year", "page", "endpoint"]);
        assert_eq!(item.method, HttpMethod::Get);
        let props = item.item_properties.unwrap();
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["band"]);
    }

    #[test]
    fn test_endpoint_in_url_false() {
        let text = "#+ endpoint_in_url: false\nSELECT ?band WHERE { ?band ?p ?o }";
        let item = build_item(0, "bands.rq", text, &ctx()).unwrap().unwrap();
        assert!(item.parameters.is_none());
        assert!(item.item_properties.is_some());
    }

    #[test]
    fn test_update_defaults_to_post_without_properties() {
        let text = "INSERT DATA { <http://a> <http://b> ?_ignored }";
        let item = build_item(0, "add.sparql", text, &ctx()).unwrap().unwrap();
        assert_eq!(item.method, HttpMethod::Post);
        assert!(item.item_properties.is_none());
        assert_eq!(param_names(&item), vec!["endpoint"]);
    }

    #[test]
    fn test_construct_and_ask_default_to_post() {
        for (file, text) in [
            ("c.rq", "CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }"),
            ("a.rq", "ASK { ?s ?p ?o }"),
            ("d.sparql", "DESCRIBE <http://example.org/band>"),
        ] {
            let item = build_item(0, file, text, &ctx()).unwrap().unwrap();
            assert_eq!(item.method, HttpMethod::Post, "{file}");
            assert!(item.item_properties.is_none());
            assert_eq!(param_names(&item), vec!["endpoint"]);
        }

        let text = "#+ method: get\nCONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }";
        let item = build_item(0, "c.rq", text, &ctx()).unwrap().unwrap();
        assert_eq!(item.method, HttpMethod::Get);
    }

    #[test]
    fn test_invalid_sparql_method_is_unset() {
        let text = "#+ method: weird\nINSERT DATA { <http://a> <http://b> <http://c> }";
        let item = build_item(0, "add.rq", text, &ctx()).unwrap().unwrap();
        // Unset, so the update default applies.
        assert_eq!(item.method, HttpMethod::Post);
    }

    #[test]
    fn test_declared_method_wins() {
        let text = "#+ method: PUT\nSELECT ?s WHERE { ?s ?p ?o }";
        let item = build_item(0, "s.rq", text, &ctx()).unwrap().unwrap();
        assert_eq!(item.method, HttpMethod::Put);
    }

    #[test]
    fn test_tpf_method_fallback() {
        let item = build_item(0, "b.tpf", "#+ method: weird\n", &ctx()).unwrap().unwrap();
        assert_eq!(item.method, HttpMethod::Get);
        assert_eq!(item.kind, QueryKind::Tpf);
        assert!(item.parameters.is_none());
        assert!(item.item_properties.is_none());
    }

    #[test]
    fn test_tpf_pagination_only() {
        let text = "#+ pagination: 10\n#+ method: delete\n?s ?p ?_o";
        let item = build_item(0, "t.tpf", text, &ctx()).unwrap().unwrap();
        assert_eq!(item.method, HttpMethod::Delete);
        assert_eq!(param_names(&item), vec!["page"]);
    }

    #[test]
    fn test_metadata_failure_names_the_call() {
        let err = build_item(0, "broken.rq", "SELECT ?s WHERE {", &ctx()).unwrap_err();
        assert_eq!(err.call_name(), "broken");
        assert!(matches!(err, ItemError::Metadata { .. }));
    }

    #[test]
    fn test_parameter_failure_names_the_call() {
        let text = "SELECT ?s WHERE { ?s ?_a_iri ?_a_number }";
        let err = build_item(0, "clash.rq", text, &ctx()).unwrap_err();
        assert_eq!(err.call_name(), "clash");
        assert!(matches!(err, ItemError::Parameters { .. }));
    }

    #[test]
    fn test_extra_metadata_pass_through() {
        let keys = vec!["transform".to_string(), "absent".to_string()];
        let ctx = ItemContext {
            extra_keys: &keys,
            ..ctx()
        };
        let text = "#+ transform:\n#+   name: $.name.value\nSELECT ?name WHERE { ?s ?p ?name }";
        let item = build_item(0, "n.rq", text, &ctx).unwrap().unwrap();
        assert_eq!(item.extra.len(), 1);
        assert_eq!(item.extra["transform"], serde_json::json!({"name": "$.name.value"}));
    }
}
