//! Packaging decision
//!
//! A merge with nothing left over ships as the composite PDF alone. Anything
//! unembedded turns the deliverable into a ZIP holding the composite plus an
//! attachments folder.

use crate::config::MergeConfig;
use crate::compose::UnembeddedFile;
use crate::error::EvidenceError;
use crate::merge::MergeResult;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub use crate::classify::PDF_MEDIA_TYPE;
pub const ZIP_MEDIA_TYPE: &str = "application/zip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackagedArtifact {
    SingleDocument { bytes: Vec<u8>, file_name: String },
    Archive { bytes: Vec<u8>, file_name: String },
}

impl PackagedArtifact {
    pub fn file_name(&self) -> &str {
        match self {
            PackagedArtifact::SingleDocument { file_name, .. }
            | PackagedArtifact::Archive { file_name, .. } => file_name,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            PackagedArtifact::SingleDocument { bytes, .. }
            | PackagedArtifact::Archive { bytes, .. } => bytes,
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            PackagedArtifact::SingleDocument { .. } => PDF_MEDIA_TYPE,
            PackagedArtifact::Archive { .. } => ZIP_MEDIA_TYPE,
        }
    }

    pub fn is_archive(&self) -> bool {
        matches!(self, PackagedArtifact::Archive { .. })
    }

    /// Write the artifact into `dir` under its file name, creating `dir` if
    /// needed. Returns the written path.
    pub async fn write_to_dir(&self, dir: &Path) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(self.file_name());
        tokio::fs::write(&path, self.bytes()).await?;
        Ok(path)
    }
}

/// Turn a merge result into the deliverable for `base_name`
pub fn package(
    result: MergeResult,
    base_name: &str,
    config: &MergeConfig,
) -> Result<PackagedArtifact, EvidenceError> {
    config.validate()?;
    let document_name = config.document_file_name(base_name);

    if result.unembedded.is_empty() {
        tracing::info!(file_name = %document_name, "Packaged single document");
        return Ok(PackagedArtifact::SingleDocument {
            bytes: result.composite,
            file_name: document_name,
        });
    }

    let entries = attachment_entries(&result.unembedded, &config.attachments_folder);
    let bytes = build_archive(&document_name, &result.composite, &entries)
        .map_err(|e| EvidenceError::Archive(e.to_string()))?;
    let file_name = config.archive_file_name(base_name);

    tracing::info!(
        file_name = %file_name,
        attachments = entries.len(),
        "Packaged archive"
    );
    Ok(PackagedArtifact::Archive { bytes, file_name })
}

/// Archive paths for unembedded files. A repeated path keeps its first
/// position and the data of its last occurrence.
fn attachment_entries<'a>(files: &'a [UnembeddedFile], folder: &str) -> Vec<(String, &'a [u8])> {
    let mut entries: Vec<(String, &'a [u8])> = Vec::with_capacity(files.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for (position, file) in files.iter().enumerate() {
        let path = format!("{}/{}", folder, attachment_file_name(&file.name, position));
        match index.get(&path) {
            Some(&slot) => entries[slot].1 = &file.data,
            None => {
                index.insert(path.clone(), entries.len());
                entries.push((path, &file.data));
            }
        }
    }
    entries
}

/// Keep the original name but never let it leave the attachments folder
fn attachment_file_name(name: &str, position: usize) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => format!("attachment-{}", position + 1),
        _ => cleaned,
    }
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

fn build_archive(
    document_name: &str,
    composite: &[u8],
    attachments: &[(String, &[u8])],
) -> zip::result::ZipResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    writer.start_file(document_name, entry_options())?;
    writer.write_all(composite)?;

    for (path, data) in attachments {
        writer.start_file(path.as_str(), entry_options())?;
        writer.write_all(data)?;
    }

    Ok(writer.finish()?.into_inner())
}
