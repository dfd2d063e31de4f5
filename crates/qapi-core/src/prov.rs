//! Provenance of generated documents.
//!
//! Hosted builds record the repository and every fetched file as entities
//! used by the build activity, and embed the resulting PROV-O graph in the
//! document as Turtle. Local builds record nothing.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::source::SourceRef;

/// Records artifacts used while building one document.
pub trait ProvenanceRecorder {
    fn add_used_entity(&mut self, uri: &str);

    /// Close the graph and serialize it. `None` when nothing is recorded.
    fn finish(&mut self) -> Option<String>;
}

/// Recorder for sources without provenance.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProvenance;

impl ProvenanceRecorder for NoProvenance {
    fn add_used_entity(&mut self, _uri: &str) {}

    fn finish(&mut self) -> Option<String> {
        None
    }
}

const AGENT_IRI: &str = "https://github.com/qapi-dev/qapi";

/// PROV-O graph for one hosted build.
#[derive(Debug, Clone)]
pub struct ProvGraph {
    identifier: String,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    used: Vec<String>,
}

impl ProvGraph {
    /// Start a graph for `owner/repo`, timestamped now.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self::started_at(identifier, Utc::now())
    }

    pub fn started_at(identifier: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            identifier: identifier.into(),
            started_at,
            ended_at: None,
            used: Vec::new(),
        }
    }

    /// Stamp the end time. Later calls keep the first stamp.
    pub fn end_at(&mut self, ended_at: DateTime<Utc>) {
        self.ended_at.get_or_insert(ended_at);
    }

    pub fn used(&self) -> &[String] {
        &self.used
    }

    pub fn to_turtle(&self) -> String {
        let entity = format!("<{AGENT_IRI}/api/{}/spec>", self.identifier);
        let activity = format!("<{AGENT_IRI}/api/{}/build>", self.identifier);

        let mut out = String::new();
        out.push_str("@prefix prov: <http://www.w3.org/ns/prov#> .\n");
        out.push_str("@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n");
        out.push_str("@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .\n\n");

        out.push_str(&format!(
            "<{AGENT_IRI}>\n  a prov:Agent ;\n  rdfs:label {} .\n\n",
            turtle_string(&format!("qapi {}", env!("CARGO_PKG_VERSION")))
        ));

        out.push_str(&format!(
            "{entity}\n  a prov:Entity ;\n  rdfs:label {} ;\n  prov:wasGeneratedBy {activity} ;\n  prov:wasAttributedTo <{AGENT_IRI}> .\n\n",
            turtle_string(&format!("API specification of {}", self.identifier))
        ));

        out.push_str(&format!("{activity}\n  a prov:Activity ;\n"));
        out.push_str(&format!("  prov:wasAssociatedWith <{AGENT_IRI}> ;\n"));
        out.push_str(&format!("  prov:startedAtTime {}", datetime_literal(&self.started_at)));
        if let Some(ended) = &self.ended_at {
            out.push_str(&format!(" ;\n  prov:endedAtTime {}", datetime_literal(ended)));
        }
        for uri in &self.used {
            out.push_str(&format!(" ;\n  prov:used <{uri}>"));
        }
        out.push_str(" .\n");

        for uri in &self.used {
            out.push_str(&format!("\n<{uri}> a prov:Entity .\n"));
        }
        out
    }
}

impl ProvenanceRecorder for ProvGraph {
    fn add_used_entity(&mut self, uri: &str) {
        if !self.used.iter().any(|u| u == uri) {
            self.used.push(uri.to_string());
        }
    }

    fn finish(&mut self) -> Option<String> {
        self.end_at(Utc::now());
        Some(self.to_turtle())
    }
}

/// The recorder matching a source: a graph for hosted sources, nothing for
/// local ones.
pub fn recorder_for(source: &SourceRef) -> Box<dyn ProvenanceRecorder> {
    match source {
        SourceRef::Hosted { .. } => Box::new(ProvGraph::new(source.identifier())),
        SourceRef::Local => Box::new(NoProvenance),
    }
}

fn turtle_string(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn datetime_literal(at: &DateTime<Utc>) -> String {
    format!(
        "\"{}\"^^xsd:dateTime",
        at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}
