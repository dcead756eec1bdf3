//! Evidence merge and packaging
//!
//! Folds the evidence attached to a report into the report's own PDF.
//!
//! - PDF evidence is appended page by page
//! - PNG and JPEG evidence gets one captioned page each
//! - Anything else, or anything that fails to embed, gets a placeholder page
//!   and travels next to the document in a ZIP package
//!
//! Entry points: [`ReportOrchestrator::build`] for the whole pipeline,
//! [`merge_evidence`] and [`package`] for the individual stages.

pub mod classify;
pub mod compose;
pub mod composite;
pub mod config;
pub mod decode;
pub mod error;
pub mod evidence;
pub mod layout;
pub mod merge;
pub mod metrics;
pub mod package;
pub mod raster;
pub mod report;
pub mod store;

pub use classify::{classify, EvidenceKind, ImageKind};
pub use compose::{UnembedReason, UnembeddedFile};
pub use config::MergeConfig;
pub use decode::{decode_payload, EvidencePayload};
pub use error::EvidenceError;
pub use evidence::{collect_evidence, EvidenceDescriptor, EvidenceRef, FetchedEvidence, ReportSection};
pub use merge::{merge_evidence, merge_fetched, EvidenceMerger, MergeResult};
pub use metrics::MergeMetrics;
pub use package::{package, PackagedArtifact};
pub use report::{report_base_name, ReportGenerator, ReportOrchestrator, ReportRequest};
pub use store::{ContentStore, DirContentStore, MemoryContentStore};
