//! Renders canonical documents into the distribution folder layout:
//! `titles/<TID>/cheats/<BID>.txt` plus one file per attribution entry.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::storage::DocumentReader;
use crate::types::{CheatDbError, CheatDbResult, TitleDocument};

/// Name of the folder that holds per-title directories.
pub const TITLES_DIR: &str = "titles";

#[derive(Debug, Clone, Default, Serialize)]
pub struct LayoutReport {
    pub titles: usize,
    pub sheets: usize,
    pub attributions: usize,
}

/// Render every `*.json` document in `json_dir` under `<dist>/titles`.
pub fn render_layout(json_dir: &Path, dist: &Path) -> CheatDbResult<LayoutReport> {
    let titles_root = dist.join(TITLES_DIR);
    fs::create_dir_all(&titles_root)?;

    let mut report = LayoutReport::default();
    for path in json_documents(json_dir)? {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let doc = DocumentReader::read_from_file(&path)?;
        let title_dir = titles_root.join(stem);
        render_title(&doc, &title_dir, &mut report)?;
        report.titles += 1;
    }

    tracing::info!(
        "Rendered {} titles ({} sheets) into {}",
        report.titles,
        report.sheets,
        titles_root.display()
    );
    Ok(report)
}

fn render_title(doc: &TitleDocument, dir: &Path, report: &mut LayoutReport) -> CheatDbResult<()> {
    fs::create_dir_all(dir)?;

    if let Some(attribution) = doc.attribution() {
        for (name, text) in attribution.iter() {
            let path = dir.join(safe_file_name(name)?);
            fs::write(path, text)?;
            report.attributions += 1;
        }
    }

    let mut builds = doc.builds().peekable();
    if builds.peek().is_none() {
        return Ok(());
    }

    let cheats_dir = dir.join("cheats");
    fs::create_dir_all(&cheats_dir)?;
    for (build, blocks) in builds {
        let sheet: String = blocks.values().map(String::as_str).collect();
        if sheet.is_empty() {
            continue;
        }
        safe_file_name(build)?;
        fs::write(cheats_dir.join(format!("{build}.txt")), sheet)?;
        report.sheets += 1;
    }
    Ok(())
}

/// Reject names that would escape the title folder.
fn safe_file_name(name: &str) -> CheatDbResult<PathBuf> {
    let path = PathBuf::from(name);
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(path),
        _ => Err(CheatDbError::Layout(format!("unsafe file name {name:?}"))),
    }
}

/// `*.json` files directly inside `dir`, sorted by name.
pub fn json_documents(dir: &Path) -> CheatDbResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
