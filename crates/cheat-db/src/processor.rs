//! Walks an extracted source tree and writes one canonical document per
//! title, merging with whatever a previous run left in the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::merge::merge_documents;
use crate::sheet::{read_sheet, read_text_lossy};
use crate::storage::{DocumentReader, DocumentWriter};
use crate::types::{BuildId, CheatDbResult, Section, TitleDocument, TitleId};

/// Whether a title's document was merged into a prior one or written anew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleOutcome {
    Fresh,
    Merged,
}

/// Result of processing a single title folder.
#[derive(Debug, Clone, Serialize)]
pub struct TitleReport {
    pub title: TitleId,
    pub outcome: TitleOutcome,
    pub builds: usize,
    pub cheats: usize,
    pub path: PathBuf,
}

/// Totals for one parser run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessReport {
    pub titles: usize,
    pub fresh: usize,
    pub merged: usize,
    pub builds: usize,
    pub cheats: usize,
}

impl ProcessReport {
    fn record(&mut self, title: &TitleReport) {
        self.titles += 1;
        match title.outcome {
            TitleOutcome::Fresh => self.fresh += 1,
            TitleOutcome::Merged => self.merged += 1,
        }
        self.builds += title.builds;
        self.cheats += title.cheats;
    }
}

/// Parse every title folder under `input` into `output`.
pub fn process_cheats(input: &Path, output: &Path) -> CheatDbResult<ProcessReport> {
    make_writable(input);
    fs::create_dir_all(output)?;

    let mut report = ProcessReport::default();
    for entry in fs::read_dir(input)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Ok(title) = TitleId::parse(name) else {
            tracing::debug!("Skipping non-title folder {}", path.display());
            continue;
        };

        let title_report = process_title(&title, &path, output)?;
        report.record(&title_report);
    }

    tracing::info!(
        "Processed {} titles from {} ({} merged, {} fresh, {} cheats)",
        report.titles,
        input.display(),
        report.merged,
        report.fresh,
        report.cheats
    );
    Ok(report)
}

/// Parse one title folder and write or update its document.
pub fn process_title(title: &TitleId, dir: &Path, output: &Path) -> CheatDbResult<TitleReport> {
    let parsed = parse_title(dir)?;
    let target = output.join(title.document_file_name());

    let (doc, outcome) = match DocumentReader::load_prior(&target)? {
        Some(recorded) => (merge_documents(recorded, parsed), TitleOutcome::Merged),
        None => (parsed, TitleOutcome::Fresh),
    };

    DocumentWriter::write_to_file(&doc, &target)?;
    tracing::debug!("Wrote {} ({:?})", target.display(), outcome);

    Ok(TitleReport {
        title: title.clone(),
        outcome,
        builds: doc.build_count(),
        cheats: doc.cheat_count(),
        path: target,
    })
}

/// Build a title's document from its folder alone.
pub fn parse_title(dir: &Path) -> CheatDbResult<TitleDocument> {
    let mut doc = TitleDocument::new();

    match find_cheats_dir(dir)? {
        Some(cheats) => {
            for entry in fs::read_dir(&cheats)? {
                let path = entry?.path();
                if !path.is_file() {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                let Ok(build) = BuildId::parse(stem) else {
                    tracing::debug!("Skipping sheet {}", path.display());
                    continue;
                };
                doc.insert_build(&build, read_sheet(&path)?);
            }
        }
        None => tracing::debug!("No cheats folder in {}", dir.display()),
    }

    let attribution = read_attribution(dir)?;
    if !attribution.is_empty() {
        doc.set_attribution(attribution);
    }
    Ok(doc)
}

/// First child directory named `cheats`, compared case-insensitively.
pub fn find_cheats_dir(dir: &Path) -> CheatDbResult<Option<PathBuf>> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_cheats = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.eq_ignore_ascii_case("cheats"));
        if is_cheats && path.is_dir() {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// Top-level `.txt` files of a title folder, keyed by file name.
pub fn read_attribution(dir: &Path) -> CheatDbResult<Section> {
    let mut attribution = Section::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_txt = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
        if !is_txt || !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        attribution.insert(name, read_text_lossy(&path)?);
    }
    Ok(attribution)
}

/// Give the owner read/write access to every file under `root`.
/// Failures are ignored.
pub fn make_writable(root: &Path) {
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        if let Err(e) = set_owner_rw(entry.path()) {
            tracing::debug!("chmod {} failed: {e}", entry.path().display());
        }
    }
}

#[cfg(unix)]
fn set_owner_rw(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o600);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn set_owner_rw(path: &Path) -> std::io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_readonly(false);
    fs::set_permissions(path, perms)
}
