//! Evidence merge
//!
//! Folds a sequence of evidence files into the primary document.
//!
//! The algorithm:
//! 1. Load the primary document (fatal on failure)
//! 2. For each descriptor, in order:
//!    a. Retrieve its content; absent content is skipped
//!    b. Decode text payloads; undecodable ones become unembedded
//!    c. Classify and compose; the composer decides embedded vs. unembedded
//! 3. Serialize the composite once
//!
//! Files are processed strictly one after another: page order must follow
//! evidence order and the composite is mutated in place.

use crate::classify::ClassifiedPayload;
use crate::compose::{Embedded, FileOutcome, PageComposer, UnembedReason, UnembeddedFile};
use crate::composite::CompositeDocument;
use crate::config::MergeConfig;
use crate::decode::decode_payload;
use crate::error::EvidenceError;
use crate::evidence::{EvidenceDescriptor, FetchedEvidence};
use crate::metrics::MergeMetrics;
use crate::store::{retrieve, ContentStore};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    pub composite: Vec<u8>,
    /// Files that could not be embedded, in evidence order
    pub unembedded: Vec<UnembeddedFile>,
    pub metrics: MergeMetrics,
}

/// Merge state for one report. Owns the composite document until
/// [`EvidenceMerger::finish`].
pub struct EvidenceMerger<'a> {
    composer: PageComposer<'a>,
    composite: CompositeDocument,
    unembedded: Vec<UnembeddedFile>,
    metrics: MergeMetrics,
    started: Instant,
}

impl<'a> EvidenceMerger<'a> {
    pub fn new(primary: &[u8], config: &'a MergeConfig) -> Result<Self, EvidenceError> {
        let started = Instant::now();
        config.validate()?;
        let composite = CompositeDocument::load(primary, config.layout())?;
        let metrics = MergeMetrics {
            primary_pages: composite.page_count(),
            ..MergeMetrics::default()
        };
        Ok(Self {
            composer: PageComposer::new(config),
            composite,
            unembedded: Vec::new(),
            metrics,
            started,
        })
    }

    /// Decode, classify and compose one file
    pub fn add(&mut self, evidence: FetchedEvidence) -> FileOutcome {
        let FetchedEvidence {
            descriptor,
            payload,
        } = evidence;

        let outcome = match decode_payload(payload) {
            Ok(decoded) => {
                let declared_type = if descriptor.declared_type.trim().is_empty() {
                    decoded.media_type.as_deref().unwrap_or("")
                } else {
                    descriptor.declared_type.as_str()
                };
                let classified = ClassifiedPayload::new(declared_type, &descriptor.name, decoded.bytes);
                tracing::debug!(
                    id = %descriptor.id,
                    name = %descriptor.name,
                    kind = ?classified.kind,
                    "Composing evidence"
                );
                self.composer
                    .compose(&mut self.composite, &descriptor.name, classified)
            }
            Err(undecodable) => {
                let reason = UnembedReason::Undecodable(undecodable.error.to_string());
                Err(self.composer.unembed(
                    &mut self.composite,
                    &descriptor.name,
                    undecodable.text.into_bytes(),
                    reason,
                ))
            }
        };

        match &outcome {
            Ok(Embedded { pages }) => {
                tracing::debug!(id = %descriptor.id, pages, "Evidence embedded");
                self.metrics.embedded_files += 1;
            }
            Err(unembedded) => {
                tracing::warn!(
                    id = %descriptor.id,
                    name = %descriptor.name,
                    "Evidence not embedded: {}",
                    unembedded.reason
                );
                self.metrics.unembedded_files += 1;
                self.unembedded.push(unembedded.file.clone());
            }
        }
        outcome
    }

    /// Count a descriptor whose content was not available
    pub fn skip(&mut self, descriptor: &EvidenceDescriptor) {
        tracing::debug!(id = %descriptor.id, "Evidence skipped");
        self.metrics.skipped_files += 1;
    }

    pub fn finish(self) -> Result<MergeResult, EvidenceError> {
        let mut metrics = self.metrics;
        metrics.page_count = self.composite.page_count();
        let composite = self.composite.finish()?;
        metrics.output_size_bytes = composite.len();
        metrics.processing_time_ms = self.started.elapsed().as_millis() as u64;

        tracing::info!(
            primary_pages = metrics.primary_pages,
            page_count = metrics.page_count,
            embedded = metrics.embedded_files,
            unembedded = metrics.unembedded_files,
            skipped = metrics.skipped_files,
            elapsed_ms = metrics.processing_time_ms,
            "Evidence merge complete"
        );

        Ok(MergeResult {
            composite,
            unembedded: self.unembedded,
            metrics,
        })
    }
}

/// Merge evidence whose content is fetched from `store`, one descriptor at a
/// time
pub async fn merge_evidence<S>(
    primary: &[u8],
    evidence: &[EvidenceDescriptor],
    store: &S,
    config: &MergeConfig,
) -> Result<MergeResult, EvidenceError>
where
    S: ContentStore + ?Sized,
{
    let mut merger = EvidenceMerger::new(primary, config)?;
    for descriptor in evidence {
        match retrieve(store, descriptor).await {
            Some(payload) => {
                merger.add(FetchedEvidence {
                    descriptor: descriptor.clone(),
                    payload,
                });
            }
            None => merger.skip(descriptor),
        }
    }
    merger.finish()
}

/// Merge evidence whose content is already in hand
pub fn merge_fetched<I>(
    primary: &[u8],
    evidence: I,
    config: &MergeConfig,
) -> Result<MergeResult, EvidenceError>
where
    I: IntoIterator<Item = FetchedEvidence>,
{
    let mut merger = EvidenceMerger::new(primary, config)?;
    for fetched in evidence {
        merger.add(fetched);
    }
    merger.finish()
}
