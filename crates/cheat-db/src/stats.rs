//! Database statistics.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::layout::json_documents;
use crate::storage::DocumentReader;
use crate::types::CheatDbResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheatStats {
    pub titles: usize,
    pub builds: usize,
    pub cheats: usize,
}

impl fmt::Display for CheatStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cheats in {} titles/{} updates",
            self.cheats, self.titles, self.builds
        )
    }
}

/// Count titles, builds, and cheats over every document in `dir`.
pub fn count_cheats(dir: &Path) -> CheatDbResult<CheatStats> {
    let mut stats = CheatStats::default();
    for path in json_documents(dir)? {
        let doc = DocumentReader::read_from_file(&path)?;
        stats.titles += 1;
        stats.builds += doc.build_count();
        stats.cheats += doc.cheat_count();
    }
    Ok(stats)
}

/// Replace the last line of a README with the summary line.
pub fn update_readme(readme: &Path, stats: &CheatStats) -> CheatDbResult<()> {
    let text = match std::fs::read(readme) {
        Ok(bytes) => crate::sheet::decode_lossy(&bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let summary = stats.to_string();
    let mut lines: Vec<&str> = text.split_inclusive('\n').collect();
    lines.pop();
    lines.push(&summary);

    std::fs::write(readme, lines.concat())?;
    Ok(())
}
