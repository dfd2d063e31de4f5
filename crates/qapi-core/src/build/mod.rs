pub mod assemble;
pub mod description;
pub mod item;
pub mod revision;

use log::{error, info};

use crate::config::QapiConfig;
use crate::error::BuildError;
use crate::load::{ENDPOINT_FILE, Loader, RepositoryHost};
use crate::prov::ProvenanceRecorder;
use crate::source::{QueryKind, SourceRef};
use crate::swagger::{Info, RevisionContext, SwaggerDocument, base_path};

pub use assemble::{DocumentContext, MESSAGE_DEFINITION, assemble};
pub use item::{ItemContext, SpecItem, build_item};
pub use revision::{ResolvedRevision, resolve_revision};

/// Build the ordered specification items of a source.
///
/// Files that fail to parse are logged and left out. Loader failures abort.
pub fn build_spec(
    loader: &dyn Loader,
    config: &QapiConfig,
    recorder: &mut dyn ProvenanceRecorder,
) -> Result<Vec<SpecItem>, BuildError> {
    let files = loader.fetch_files()?;
    let base_uri = loader.raw_repo_uri();

    let default_endpoint = match files.iter().find(|f| f.name == ENDPOINT_FILE) {
        Some(file) => {
            let text = loader.text_for(file)?;
            recorder.add_used_entity(&file.download_url);
            let endpoint = text.trim().to_string();
            info!("Using default endpoint {endpoint} from {ENDPOINT_FILE}");
            endpoint
        }
        None => config.default_endpoint.clone(),
    };

    let ctx = ItemContext {
        base_uri: &base_uri,
        extra_keys: &config.extra_metadata,
        default_endpoint: &default_endpoint,
    };

    let mut items = Vec::new();
    for (position, file) in files.iter().enumerate() {
        let Some(kind) = QueryKind::from_file_name(&file.name) else {
            info!("Ignoring unsupported source file: {}", file.name);
            continue;
        };
        info!("Processing {kind:?} query: {}", file.name);

        let text = loader.text_for(file)?;
        recorder.add_used_entity(&file.download_url);

        let mut item = match build_item(position, &file.name, &text, &ctx) {
            Ok(Some(item)) => item,
            Ok(None) => continue,
            Err(e) => {
                error!(
                    "Could not build call {} from {base_uri}: {e}",
                    e.call_name()
                );
                continue;
            }
        };

        if let Some((side_file, projection)) = loader.projection_for(&files, &item.call_name)? {
            recorder.add_used_entity(&side_file.download_url);
            item.projection = Some(projection);
        }
        items.push(item);
    }
    Ok(items)
}

/// Build the complete document for a source.
///
/// Hosted sources need `host` for repository details and commit history.
pub fn build_document(
    source: &SourceRef,
    loader: &dyn Loader,
    host: Option<&dyn RepositoryHost>,
    recorder: &mut dyn ProvenanceRecorder,
    config: &QapiConfig,
) -> Result<SwaggerDocument, BuildError> {
    let identifier = source.identifier();
    let raw_base = &config.github.raw_base_url;

    let (info, revision) = match source {
        SourceRef::Hosted { revision, .. } => {
            let host = host.ok_or_else(|| BuildError::MissingHost(identifier.clone()))?;
            let repo = host.repository()?;
            recorder.add_used_entity(&host.api_repo_uri());
            let commits = host.commits()?;
            let resolved = resolve_revision(&commits, revision.as_deref())?;
            let info = Info::new(
                resolved.version,
                repo.name,
                repo.owner_login,
                repo.owner_url,
                raw_base,
                &identifier,
            );
            (info, resolved.context)
        }
        SourceRef::Local => (
            Info::new("local", "local", "", "", raw_base, &identifier),
            RevisionContext::default(),
        ),
    };

    let items = build_spec(loader, config, recorder)?;

    let ctx = DocumentContext {
        info,
        base_path: base_path(&identifier, source.revision()),
        host: config.server_name.clone(),
        schemes: config.schemes.clone(),
        revision,
        produces: config.produces.clone(),
        on_conflict: config.on_conflict,
    };
    assemble(&items, &ctx, recorder)
}
