mod common;

use indexmap::IndexMap;

use common::{ADD_BAND, BANDS, BROKEN, FRAGMENTS, FakeHost, MemoryLoader};
use qapi_core::build::build_document;
use qapi_core::config::{ConflictPolicy, QapiConfig};
use qapi_core::error::{BuildError, RevisionError};
use qapi_core::prov::{NoProvenance, ProvGraph};
use qapi_core::source::SourceRef;
use qapi_core::swagger::{self, HttpMethod};

fn loader() -> MemoryLoader {
    MemoryLoader::new(&[
        ("bands_by_genre.rq", BANDS),
        ("broken.rq", BROKEN),
        ("README.md", "# queries"),
        ("add_band.sparql", ADD_BAND),
        ("fragments.tpf", FRAGMENTS),
    ])
}

fn local_json() -> serde_json::Value {
    let doc = build_document(
        &SourceRef::Local,
        &loader(),
        None,
        &mut NoProvenance,
        &QapiConfig::default(),
    )
    .unwrap();
    serde_json::to_value(&doc).unwrap()
}

#[test]
fn local_document_top_level() {
    let doc = build_document(
        &SourceRef::Local,
        &loader(),
        None,
        &mut NoProvenance,
        &QapiConfig::default(),
    )
    .unwrap();
    let ordered: IndexMap<String, serde_json::Value> =
        serde_json::from_str(&swagger::to_json(&doc).unwrap()).unwrap();
    let keys: Vec<&str> = ordered.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "prev_commit",
            "next_commit",
            "swagger",
            "host",
            "basePath",
            "schemes",
            "info",
            "paths",
            "definitions"
        ]
    );

    let json = local_json();
    assert_eq!(json["prev_commit"], serde_json::Value::Null);
    assert_eq!(json["swagger"], "2.0");
    assert_eq!(json["host"], "localhost:8088");
    assert_eq!(json["basePath"], "/api/local/local/");
    assert_eq!(json["schemes"], serde_json::json!(["http"]));
    assert_eq!(
        json["info"],
        serde_json::json!({
            "version": "local",
            "title": "local",
            "contact": {"name": "", "url": ""},
            "license": {
                "name": "License",
                "url": "https://raw.githubusercontent.com/local/local/master/LICENSE"
            }
        })
    );
}

#[test]
fn failed_query_is_absent_from_paths() {
    let doc = build_document(
        &SourceRef::Local,
        &loader(),
        None,
        &mut NoProvenance,
        &QapiConfig::default(),
    )
    .unwrap();
    let paths: Vec<&str> = doc.paths.keys().map(String::as_str).collect();
    assert_eq!(paths, vec!["bands_by_genre", "add_band", "fragments"]);
}

#[test]
fn operations_carry_methods_and_schemas() {
    let json = local_json();
    let bands = &json["paths"]["bands_by_genre"]["get"];
    assert_eq!(bands["summary"], "Bands of a genre");
    assert_eq!(
        bands["produces"],
        serde_json::json!(["text/csv", "application/json", "text/html"])
    );
    let description = bands["description"].as_str().unwrap();
    assert!(description.starts_with("Lists bands playing the given genre"));
    assert!(description.contains("\n<pre>\nPREFIX dbo: &lt;http://dbpedia.org/ontology/&gt;"));
    assert!(description.ends_with("</pre>"));
    assert_eq!(
        bands["responses"]["200"]["schema"]["items"]["properties"]["name"]["properties"]["xml:lang"],
        serde_json::json!({"type": "string"})
    );

    let add = &json["paths"]["add_band"]["post"];
    assert_eq!(
        add["responses"]["200"]["schema"]["items"]["properties"],
        serde_json::Value::Null
    );

    let fragments = &json["paths"]["fragments"]["get"];
    assert_eq!(fragments["parameters"][0]["name"], "page");
    assert_eq!(fragments["parameters"][0]["default"], 1);
    assert_eq!(
        fragments["responses"]["default"]["schema"]["$ref"],
        "#/definitions/Message"
    );
    assert_eq!(
        json["definitions"]["Message"]["required"],
        serde_json::json!(["message"])
    );
}

#[test]
fn operation_without_parameters_serializes_null() {
    let loader = MemoryLoader::new(&[("plain.tpf", "?s ?p ?o")]);
    let doc = build_document(
        &SourceRef::Local,
        &loader,
        None,
        &mut NoProvenance,
        &QapiConfig::default(),
    )
    .unwrap();
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(
        json["paths"]["plain"]["get"]["parameters"],
        serde_json::Value::Null
    );
}

#[test]
fn hosted_latest_revision() {
    let host = FakeHost::with_history(&["c3", "c2", "c1"]);
    let mut graph = ProvGraph::new("o/r");
    let doc = build_document(
        &SourceRef::hosted("o", "r"),
        &loader(),
        Some(&host),
        &mut graph,
        &QapiConfig::default(),
    )
    .unwrap();

    assert_eq!(doc.info.version, "c3");
    assert_eq!(doc.info.title, "r");
    assert_eq!(doc.info.contact.name, "o");
    assert_eq!(doc.info.contact.url, "https://github.example/o");
    assert_eq!(
        doc.info.license.url,
        "https://raw.githubusercontent.com/o/r/master/LICENSE"
    );
    assert_eq!(doc.revision.previous.as_deref(), Some("c2"));
    assert_eq!(doc.revision.next, None);
    assert_eq!(doc.base_path, "/api/o/r/");

    let prov = doc.prov.expect("hosted documents carry provenance");
    assert!(prov.contains("prov:used <https://api.example/repos/o/r>"));
    assert!(prov.contains("bands_by_genre.rq"));
}

#[test]
fn hosted_pinned_revision() {
    let host = FakeHost::with_history(&["c3", "c2", "c1"]);
    let doc = build_document(
        &SourceRef::hosted("o", "r").at_revision("c2"),
        &loader(),
        Some(&host),
        &mut NoProvenance,
        &QapiConfig::default(),
    )
    .unwrap();

    assert_eq!(doc.info.version, "c2");
    assert_eq!(doc.revision.previous.as_deref(), Some("c1"));
    assert_eq!(doc.revision.next.as_deref(), Some("c3"));
    assert_eq!(doc.base_path, "/api/o/r/commit/c2/");
}

#[test]
fn hosted_errors_abort_the_build() {
    let source = SourceRef::hosted("o", "r");
    let config = QapiConfig::default();

    let missing = build_document(&source, &loader(), None, &mut NoProvenance, &config);
    assert!(matches!(missing, Err(BuildError::MissingHost(id)) if id == "o/r"));

    let unknown = build_document(
        &source.clone().at_revision("c9"),
        &loader(),
        Some(&FakeHost::with_history(&["c3", "c2", "c1"])),
        &mut NoProvenance,
        &config,
    );
    assert!(matches!(
        unknown,
        Err(BuildError::Revision(RevisionError::UnknownRevision(_)))
    ));

    let unavailable = FakeHost {
        unavailable: true,
        ..FakeHost::with_history(&["c1"])
    };
    let result = build_document(
        &source,
        &loader(),
        Some(&unavailable),
        &mut NoProvenance,
        &config,
    );
    assert!(matches!(result, Err(BuildError::Load(_))));
}

#[test]
fn rebuilding_is_byte_identical() {
    let render = || {
        let doc = build_document(
            &SourceRef::Local,
            &loader(),
            None,
            &mut NoProvenance,
            &QapiConfig::default(),
        )
        .unwrap();
        swagger::to_json(&doc).unwrap()
    };
    assert_eq!(render(), render());
}

#[test]
fn duplicate_call_names() {
    let loader = MemoryLoader::new(&[
        ("people.rq", "SELECT ?p WHERE { ?p ?x ?y }"),
        ("people.tpf", "#+ method: put\n?s ?p ?o"),
    ]);

    let err = build_document(
        &SourceRef::Local,
        &loader,
        None,
        &mut NoProvenance,
        &QapiConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, BuildError::DuplicateCallName { call_name } if call_name == "people"));

    let config = QapiConfig {
        on_conflict: ConflictPolicy::LastWins,
        ..QapiConfig::default()
    };
    let doc = build_document(&SourceRef::Local, &loader, None, &mut NoProvenance, &config)
        .unwrap();
    assert_eq!(doc.paths.len(), 1);
    assert!(doc.paths["people"].contains_key(&HttpMethod::Put));
}

#[test]
fn yaml_output_matches_json_structure() {
    let doc = build_document(
        &SourceRef::Local,
        &loader(),
        None,
        &mut NoProvenance,
        &QapiConfig::default(),
    )
    .unwrap();
    let yaml = swagger::to_yaml(&doc).unwrap();
    let reparsed: serde_json::Value = serde_yaml_ng::from_str(&yaml).unwrap();
    assert_eq!(reparsed, serde_json::to_value(&doc).unwrap());
}
