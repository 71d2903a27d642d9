//! Corpus directory scanning

use crate::Result;
use quick_xml::name::{Namespace, ResolveResult};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A document that was skipped during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of scanning a corpus directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorpusScan {
    /// Matching files found in the directory
    pub files_found: usize,
    /// Files parsed successfully
    pub parsed: usize,
    pub skipped: Vec<SkippedDocument>,
}

impl CorpusScan {
    /// No matching files were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files_found == 0
    }
}

/// Whether a resolved element or attribute name is bound to `namespace`.
pub(crate) fn is_bound_to(resolved: &ResolveResult<'_>, namespace: &[u8]) -> bool {
    matches!(resolved, ResolveResult::Bound(Namespace(bound)) if *bound == namespace)
}

/// Files in `dir` with the given extension, sorted by path. A missing or
/// unreadable directory yields no files.
#[must_use]
pub fn corpus_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Corpus directory {} not readable: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .collect();
    files.sort();
    files
}

/// Parse every matching file with `parse`, skipping failures.
///
/// `parse` receives the file's text and its file name.
pub(crate) fn scan_files<T>(
    dir: &Path,
    extension: &str,
    mut parse: impl FnMut(&str, &str) -> Result<T>,
) -> (Vec<T>, CorpusScan) {
    let files = corpus_files(dir, extension);
    let mut scan = CorpusScan {
        files_found: files.len(),
        ..Default::default()
    };
    if files.is_empty() {
        warn!("No *.{} files found in {}", extension, dir.display());
        return (Vec::new(), scan);
    }

    let mut documents = Vec::with_capacity(files.len());
    for path in files {
        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("Parsing {}", path.display());

        let outcome = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|text| parse(&text, &source_name).map_err(|e| e.to_string()));
        match outcome {
            Ok(document) => {
                scan.parsed += 1;
                documents.push(document);
            }
            Err(reason) => {
                warn!("Skipping {}: {}", path.display(), reason);
                scan.skipped.push(SkippedDocument { path, reason });
            }
        }
    }

    info!(
        "Scanned {}: {} parsed, {} skipped",
        dir.display(),
        scan.parsed,
        scan.skipped.len()
    );
    (documents, scan)
}
