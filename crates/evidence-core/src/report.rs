//! Report orchestration
//!
//! Ties the pipeline together for one requested report: collect evidence,
//! render the primary document, merge, package.

use crate::config::MergeConfig;
use crate::error::EvidenceError;
use crate::evidence::{collect_evidence, ReportSection};
use crate::merge::merge_evidence;
use crate::package::{package, PackagedArtifact};
use crate::store::ContentStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What to build: whose report, which kind, and the sections that may cite
/// evidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    /// Student, class or other entity the report is about
    pub subject_name: String,
    /// Report type, appended to the file name (e.g. `Progress_Report`)
    #[serde(default)]
    pub report_suffix: String,
    #[serde(default)]
    pub sections: Vec<ReportSection>,
}

impl ReportRequest {
    pub fn base_name(&self) -> String {
        report_base_name(&self.subject_name, &self.report_suffix)
    }
}

/// Renders the primary document for a report type
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn render(&self, request: &ReportRequest) -> Result<Vec<u8>, BoxError>;
}

pub struct ReportOrchestrator<'a, G: ?Sized, S: ?Sized> {
    generator: &'a G,
    store: &'a S,
    config: &'a MergeConfig,
}

impl<'a, G, S> ReportOrchestrator<'a, G, S>
where
    G: ReportGenerator + ?Sized,
    S: ContentStore + ?Sized,
{
    pub fn new(generator: &'a G, store: &'a S, config: &'a MergeConfig) -> Self {
        Self {
            generator,
            store,
            config,
        }
    }

    pub async fn build(&self, request: &ReportRequest) -> Result<PackagedArtifact, EvidenceError> {
        let evidence = collect_evidence(&request.sections);
        tracing::info!(
            subject = %request.subject_name,
            report = %request.report_suffix,
            evidence = evidence.len(),
            "Building report"
        );

        let primary = self
            .generator
            .render(request)
            .await
            .map_err(|e| EvidenceError::Generation(e.to_string()))?;

        let result = merge_evidence(&primary, &evidence, self.store, self.config).await?;
        package(result, &request.base_name(), self.config)
    }
}

/// File-system and archive safe base name: `<subject>_<suffix>` with every
/// run of characters outside `[A-Za-z0-9-]` collapsed to one underscore
pub fn report_base_name(subject_name: &str, report_suffix: &str) -> String {
    let joined = format!("{} {}", subject_name, report_suffix);
    let mut name = String::with_capacity(joined.len());
    for c in joined.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            name.push(c);
        } else if !name.is_empty() && !name.ends_with('_') {
            name.push('_');
        }
    }
    let name = name.trim_end_matches('_');
    if name.is_empty() {
        "report".to_string()
    } else {
        name.to_string()
    }
}
