//! Evidence references and collection
//!
//! A report is made of sections, and each section may reference evidence.
//! The same evidence can be cited by several sections; it is merged once,
//! at the position where it was first cited.

use crate::decode::EvidencePayload;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Evidence as cited by a report section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "type", alias = "mimeType")]
    pub declared_type: String,
}

/// One section of a generated report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub evidence: Vec<EvidenceRef>,
}

/// Deduplicated evidence reference, ready for retrieval
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceDescriptor {
    pub id: String,
    /// Display name, also used as the attachment file name
    pub name: String,
    /// Declared media type, possibly empty
    pub declared_type: String,
}

impl EvidenceDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        declared_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            declared_type: declared_type.into(),
        }
    }
}

/// A descriptor together with the content the store returned for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedEvidence {
    pub descriptor: EvidenceDescriptor,
    pub payload: EvidencePayload,
}

/// Gather the evidence cited across `sections`.
///
/// References without an id are dropped. The first citation of an id fixes
/// its position and its name; later citations are ignored. A blank name
/// falls back to the id.
pub fn collect_evidence<'a, I>(sections: I) -> Vec<EvidenceDescriptor>
where
    I: IntoIterator<Item = &'a ReportSection>,
{
    let mut seen = HashSet::new();
    let mut collected = Vec::new();

    for reference in sections.into_iter().flat_map(|section| &section.evidence) {
        let Some(id) = reference.id.as_deref().map(str::trim) else {
            continue;
        };
        if id.is_empty() || !seen.insert(id.to_string()) {
            continue;
        }

        let name = match reference.name.trim() {
            "" => id,
            name => name,
        };
        collected.push(EvidenceDescriptor::new(id, name, reference.declared_type.trim()));
    }

    collected
}
