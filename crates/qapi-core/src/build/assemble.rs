use indexmap::IndexMap;
use log::warn;

use super::description::DescriptionRenderer;
use super::item::SpecItem;
use crate::config::ConflictPolicy;
use crate::error::BuildError;
use crate::prov::ProvenanceRecorder;
use crate::swagger::{
    Info, ObjectSchema, Operation, PathItem, Response, RevisionContext, SWAGGER_VERSION,
    SchemaOrRef, SwaggerDocument,
};

/// Name of the shared error schema every default response points at.
pub const MESSAGE_DEFINITION: &str = "Message";

/// Document-level values that do not come from the query files.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    pub info: Info,
    pub base_path: String,
    pub host: String,
    pub schemes: Vec<String>,
    pub revision: RevisionContext,
    /// Output MIME types advertised by every operation.
    pub produces: Vec<String>,
    pub on_conflict: ConflictPolicy,
}

/// Fold specification items into a Swagger document.
///
/// Items are placed in `position` order regardless of the order they are
/// passed in. The recorder is finished last; its output becomes `prov`.
pub fn assemble(
    items: &[SpecItem],
    ctx: &DocumentContext,
    recorder: &mut dyn ProvenanceRecorder,
) -> Result<SwaggerDocument, BuildError> {
    let mut ordered: Vec<&SpecItem> = items.iter().collect();
    ordered.sort_by_key(|item| item.position);

    let renderer = DescriptionRenderer::new().map_err(|e| BuildError::Render {
        call_name: String::new(),
        reason: e.to_string(),
    })?;

    let mut paths: IndexMap<String, PathItem> = IndexMap::new();
    for item in ordered {
        if paths.contains_key(&item.call_name) {
            match ctx.on_conflict {
                ConflictPolicy::Error => {
                    return Err(BuildError::DuplicateCallName {
                        call_name: item.call_name.clone(),
                    });
                }
                ConflictPolicy::LastWins => {
                    warn!(
                        "Query {} replaces an earlier query with the same call name",
                        item.call_name
                    );
                }
            }
        }

        let operation = operation_for(item, &renderer, &ctx.produces)?;
        let mut path_item = PathItem::new();
        path_item.insert(item.method, operation);
        paths.insert(item.call_name.clone(), path_item);
    }

    let mut definitions = IndexMap::new();
    definitions.insert(MESSAGE_DEFINITION.to_string(), ObjectSchema::message());

    Ok(SwaggerDocument {
        revision: ctx.revision.clone(),
        swagger: SWAGGER_VERSION.to_string(),
        host: ctx.host.clone(),
        base_path: ctx.base_path.clone(),
        schemes: ctx.schemes.clone(),
        info: ctx.info.clone(),
        paths,
        definitions,
        prov: recorder.finish(),
    })
}

fn operation_for(
    item: &SpecItem,
    renderer: &DescriptionRenderer,
    produces: &[String],
) -> Result<Operation, BuildError> {
    let description = renderer.render(item).map_err(|e| BuildError::Render {
        call_name: item.call_name.clone(),
        reason: e.to_string(),
    })?;

    let mut responses = IndexMap::new();
    responses.insert(
        "200".to_string(),
        Response {
            description: "Query response".to_string(),
            schema: SchemaOrRef::array_of_objects(item.item_properties.clone()),
        },
    );
    responses.insert(
        "default".to_string(),
        Response {
            description: "Unexpected error".to_string(),
            schema: SchemaOrRef::definition(MESSAGE_DEFINITION),
        },
    );

    Ok(Operation {
        tags: item.tags.clone(),
        summary: item.summary.clone(),
        description,
        produces: produces.to_vec(),
        parameters: item.parameters.clone(),
        responses,
    })
}
