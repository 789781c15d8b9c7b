//! Report bundles and the output writer

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::ReportKind;
use crate::error::{ReportError, Result};
use crate::format;
use crate::sections::ReportSection;

/// All sections of one report kind, in ticker order
#[derive(Debug, Clone, PartialEq)]
pub struct ReportBundle {
    pub kind: ReportKind,
    pub as_of: NaiveDate,
    pub sections: Vec<ReportSection>,
}

impl ReportBundle {
    pub fn new(kind: ReportKind, as_of: NaiveDate) -> Self {
        Self {
            kind,
            as_of,
            sections: Vec::new(),
        }
    }

    /// Sections that had to be replaced by the unavailable marker
    pub fn unavailable_count(&self) -> usize {
        self.sections.iter().filter(|s| !s.is_available()).count()
    }

    /// The whole document
    pub fn to_markdown(&self) -> String {
        let mut out = format!(
            "# {} (as of {})\n\n",
            self.kind.title(),
            format::date(self.as_of)
        );
        for section in &self.sections {
            out.push_str(&section.to_markdown());
        }
        out
    }
}

/// One bundle per report kind
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSet {
    bundles: Vec<ReportBundle>,
}

impl ReportSet {
    /// Empty bundles for every kind
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            bundles: ReportKind::ALL
                .iter()
                .map(|kind| ReportBundle::new(*kind, as_of))
                .collect(),
        }
    }

    /// Append a section to the bundle of its kind
    pub fn push(&mut self, section: ReportSection) {
        if let Some(bundle) = self.bundles.iter_mut().find(|b| b.kind == section.kind) {
            bundle.sections.push(section);
        }
    }

    pub fn bundle(&self, kind: ReportKind) -> Option<&ReportBundle> {
        self.bundles.iter().find(|b| b.kind == kind)
    }

    pub fn bundles(&self) -> &[ReportBundle] {
        &self.bundles
    }

    /// Sections across all bundles that are unavailable
    pub fn unavailable_count(&self) -> usize {
        self.bundles.iter().map(ReportBundle::unavailable_count).sum()
    }

    /// Write one Markdown file per bundle into `dir`
    ///
    /// Creates the directory when needed and returns the written paths in
    /// bundle order.
    pub async fn write_all(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| ReportError::Io {
                path: dir.to_path_buf(),
                source,
            })?;

        let mut written = Vec::with_capacity(self.bundles.len());
        for bundle in &self.bundles {
            let path = dir.join(bundle.kind.file_name());
            tokio::fs::write(&path, bundle.to_markdown())
                .await
                .map_err(|source| ReportError::Io {
                    path: path.clone(),
                    source,
                })?;
            info!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}
