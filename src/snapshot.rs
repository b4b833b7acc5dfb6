//! Snapshots serialise an outline to JSON and repair arbitrary JSON back into an outline.
//!
//! Export always writes the envelope `{schema, version, exportedAt, tree}`. Import is lenient:
//! it accepts the envelope, any object with a `tree` array, or a bare node array, and silently
//! fixes every field-level problem it meets. Only a value with no node array at all is rejected.

use crate::node::{Candidates, Depth, NodeId, Section, Title};
use crate::outline::Outline;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::HashSet;
use tracing::{debug, info};

/// Value of the envelope's `schema` field.
pub const SCHEMA: &str = "toc-ideator";
/// Value of the envelope's `version` field.
pub const VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Export envelope around a serialised outline.
pub struct Snapshot {
    /// Always [`SCHEMA`].
    pub schema: String,
    /// Always [`VERSION`].
    pub version: u32,
    /// ISO-8601 UTC time of export.
    pub exported_at: String,
    /// The outline, title first.
    pub tree: Vec<NodeRecord>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
/// Flat JSON shape shared by titles and sections.
pub struct NodeRecord {
    /// Node id.
    pub id: NodeId,
    /// 0 for the title, 1 to 3 for sections.
    pub level: u8,
    /// Candidate titles, never empty.
    pub options: Vec<String>,
    /// Index of the displayed candidate.
    pub selected: usize,
    /// Nested sections.
    pub children: Vec<NodeRecord>,
    /// Editor-only collapse flag.
    pub collapsed: bool,
}

#[derive(Debug, thiserror::Error)]
/// Import failures. Field-level problems are repaired rather than reported.
pub enum ImportError {
    /// The value is neither a node array nor an object holding one under `tree`.
    #[error("expected array or {{tree:[...]}}")]
    Shape,
    /// The text is not JSON at all.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Snapshot {
    #[must_use]
    /// Captures the outline as it is right now, stamped with the current time.
    pub fn capture(outline: &Outline) -> Self {
        Self {
            schema: SCHEMA.to_string(),
            version: VERSION,
            exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            tree: records(outline),
        }
    }

    /// Pretty-printed JSON, as offered for copy and download.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[must_use]
    /// Download file name derived from the export time.
    pub fn file_name(&self) -> String {
        format!("toc-ideator-{}.json", self.exported_at.replace(':', "-"))
    }
}

#[must_use]
/// Serialises the outline as a bare node array, title first.
pub fn records(outline: &Outline) -> Vec<NodeRecord> {
    let mut tree = Vec::with_capacity(outline.sections().len() + 1);
    if let Some(title) = outline.title() {
        tree.push(NodeRecord {
            id: title.id.clone(),
            level: 0,
            options: title.candidates.options().to_vec(),
            selected: title.candidates.selected(),
            children: Vec::new(),
            collapsed: false,
        });
    }
    tree.extend(outline.sections().iter().map(section_record));
    tree
}

fn section_record(section: &Section) -> NodeRecord {
    NodeRecord {
        id: section.id.clone(),
        level: section.depth.level(),
        options: section.candidates.options().to_vec(),
        selected: section.candidates.selected(),
        children: section.children.iter().map(section_record).collect(),
        collapsed: section.collapsed,
    }
}

/// Parses JSON text and normalises it into an outline.
///
/// # Errors
///
/// Returns [`ImportError::Json`] for malformed text and [`ImportError::Shape`] when there is
/// no node array to import.
pub fn parse(text: &str) -> Result<Outline, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    normalize(&value)
}

/// Repairs an arbitrary JSON value into a valid outline.
///
/// Depth is assigned by position: top-level entries are chapters, their children level 2 and
/// so on, whatever `level` the input claims. Children below level 3 are dropped. The one
/// exception is a leading entry with `level` 0, which becomes the title.
///
/// # Errors
///
/// Returns [`ImportError::Shape`] unless `value` is an array or has a `tree` array.
pub fn normalize(value: &Value) -> Result<Outline, ImportError> {
    let nodes = match value {
        Value::Array(nodes) => nodes,
        _ => match value.get("tree") {
            Some(Value::Array(nodes)) => nodes,
            _ => return Err(ImportError::Shape),
        },
    };

    let mut normalizer = Normalizer::default();
    let (title, rest) = match nodes.split_first() {
        Some((first, rest)) if first.get("level").and_then(Value::as_u64) == Some(0) => {
            (Some(normalizer.title(first)), rest)
        }
        _ => (None, nodes.as_slice()),
    };
    let sections: Vec<Section> = rest
        .iter()
        .map(|node| normalizer.section(node, Depth::One))
        .collect();

    let outline = Outline::from_parts(title, sections);
    info!(nodes = outline.len(), "normalized import");
    Ok(outline)
}

#[derive(Default)]
struct Normalizer {
    seen: HashSet<String>,
}

impl Normalizer {
    fn claim_id(&mut self, raw: Option<&Value>) -> NodeId {
        let provided = raw
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty());
        let mut id = match provided {
            Some(id) if !self.seen.contains(id) => id.to_string(),
            _ => {
                debug!(?provided, "assigning fresh id");
                NodeId::fresh().to_string()
            }
        };
        while self.seen.contains(&id) {
            id = NodeId::fresh().to_string();
        }
        self.seen.insert(id.clone());
        NodeId::from(id)
    }

    fn title(&mut self, value: &Value) -> Title {
        Title {
            id: self.claim_id(value.get("id")),
            candidates: candidates(value),
        }
    }

    fn section(&mut self, value: &Value, depth: Depth) -> Section {
        let id = self.claim_id(value.get("id"));
        let children = match (depth.child(), value.get("children")) {
            (Some(child), Some(Value::Array(children))) => children
                .iter()
                .map(|c| self.section(c, child))
                .collect(),
            _ => Vec::new(),
        };
        Section {
            id,
            depth,
            candidates: candidates(value),
            children,
            collapsed: truthy(value.get("collapsed")),
        }
    }
}

fn candidates(value: &Value) -> Candidates {
    let options: Vec<String> = match value.get("options") {
        Some(Value::Array(items)) => items.iter().map(option_text).collect(),
        _ => Vec::new(),
    };
    let len = options.len().max(1);
    Candidates::new(options, selected_index(value.get("selected"), len))
}

/// Loose string conversion: arrays join their items with `,`, objects become
/// `[object Object]`, and integral numbers print without a fraction.
fn option_text(item: &Value) -> String {
    match item {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(option_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f + 0.0),
        _ => n.to_string(),
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn selected_index(raw: Option<&Value>, len: usize) -> usize {
    match raw.and_then(Value::as_f64).filter(|n| n.is_finite()) {
        Some(n) => n.trunc().clamp(0.0, (len - 1) as f64) as usize,
        None => 0,
    }
}

/// Loose truthiness: `null`, `false`, `0`, `NaN` and `""` are false, everything else true.
fn truthy(raw: Option<&Value>) -> bool {
    match raw {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
#[path = "tests/snapshot.rs"]
mod tests;
