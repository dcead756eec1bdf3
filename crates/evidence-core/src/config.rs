//! Merge and packaging configuration
//!
//! Every field has a default, so a TOML file only needs to name the values it
//! changes:
//!
//! ```toml
//! page_width = 595.0
//! page_height = 842.0
//! attachments_folder = "Evidence"
//! ```

use crate::error::EvidenceError;
use crate::layout::PageLayout;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// US Letter at 72 DPI
pub const DEFAULT_PAGE_WIDTH: f32 = 612.0;
pub const DEFAULT_PAGE_HEIGHT: f32 = 792.0;
pub const DEFAULT_MARGIN: f32 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Width of generated evidence pages, in points
    pub page_width: f32,
    /// Height of generated evidence pages, in points
    pub page_height: f32,
    /// Blank border kept on every side of an embedded image
    pub margin: f32,
    pub caption_font_size: f32,
    pub title_font_size: f32,
    pub body_font_size: f32,
    /// Folder inside the package that holds unembedded files
    pub attachments_folder: String,
    pub document_extension: String,
    pub archive_extension: String,
    /// Appended to the report base name when a package is produced
    pub package_suffix: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            page_width: DEFAULT_PAGE_WIDTH,
            page_height: DEFAULT_PAGE_HEIGHT,
            margin: DEFAULT_MARGIN,
            caption_font_size: 12.0,
            title_font_size: 16.0,
            body_font_size: 11.0,
            attachments_folder: "Attachments".to_string(),
            document_extension: "pdf".to_string(),
            archive_extension: "zip".to_string(),
            package_suffix: "_Package".to_string(),
        }
    }
}

impl MergeConfig {
    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(input: &str) -> Result<Self, EvidenceError> {
        let config: MergeConfig =
            toml::from_str(input).map_err(|e| EvidenceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EvidenceError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            EvidenceError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject geometry that leaves no printable area and names that would
    /// escape the package layout
    pub fn validate(&self) -> Result<(), EvidenceError> {
        if !(self.page_width > 0.0 && self.page_height > 0.0) {
            return Err(EvidenceError::Config(format!(
                "page size must be positive, got {}x{}",
                self.page_width, self.page_height
            )));
        }
        if !(self.margin >= 0.0)
            || self.margin * 2.0 >= self.page_width
            || self.margin * 2.0 >= self.page_height
        {
            return Err(EvidenceError::Config(format!(
                "margin {} leaves no printable area on a {}x{} page",
                self.margin, self.page_width, self.page_height
            )));
        }
        for (field, size) in [
            ("caption_font_size", self.caption_font_size),
            ("title_font_size", self.title_font_size),
            ("body_font_size", self.body_font_size),
        ] {
            if !(size > 0.0) {
                return Err(EvidenceError::Config(format!(
                    "{} must be positive, got {}",
                    field, size
                )));
            }
        }
        let folder = self.attachments_folder.trim();
        if folder.is_empty() || folder.contains(&['/', '\\'][..]) || folder == ".." {
            return Err(EvidenceError::Config(format!(
                "invalid attachments folder: {:?}",
                self.attachments_folder
            )));
        }
        if self.package_suffix.contains(&['/', '\\', '\0'][..]) {
            return Err(EvidenceError::Config(format!(
                "package suffix must not contain path separators, got {:?}",
                self.package_suffix
            )));
        }
        for (field, ext) in [
            ("document_extension", &self.document_extension),
            ("archive_extension", &self.archive_extension),
        ] {
            if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(EvidenceError::Config(format!(
                    "{} must be alphanumeric, got {:?}",
                    field, ext
                )));
            }
        }
        Ok(())
    }

    pub fn layout(&self) -> PageLayout {
        PageLayout {
            width: self.page_width,
            height: self.page_height,
            margin: self.margin,
            caption_font_size: self.caption_font_size,
        }
    }

    /// `<base>.<document_extension>`
    pub fn document_file_name(&self, base_name: &str) -> String {
        format!("{}.{}", base_name, self.document_extension)
    }

    /// `<base><package_suffix>.<archive_extension>`
    pub fn archive_file_name(&self, base_name: &str) -> String {
        format!(
            "{}{}.{}",
            base_name, self.package_suffix, self.archive_extension
        )
    }
}
