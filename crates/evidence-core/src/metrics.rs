use serde::Serialize;

/// Counters collected while merging one report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeMetrics {
    /// Pages in the primary document before any evidence was appended
    pub primary_pages: usize,
    /// Pages in the serialized composite document
    pub page_count: usize,
    pub embedded_files: usize,
    pub unembedded_files: usize,
    /// Evidence whose content the store did not return
    pub skipped_files: usize,
    pub output_size_bytes: usize,
    pub processing_time_ms: u64,
}
