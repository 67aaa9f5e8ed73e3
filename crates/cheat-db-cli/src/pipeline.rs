//! The full database build over already extracted sources.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use cheat_db::layout::LayoutReport;
use cheat_db::{count_cheats, process_cheats, render_layout, write_version_file};
use cheat_db::{CheatStats, ProcessReport};

use crate::config::{BuildConfig, Source};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    Missing { titles_dir: PathBuf },
    Processed { report: ProcessReport },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub name: String,
    #[serde(flatten)]
    pub status: SourceStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub sources: Vec<SourceReport>,
    pub layout: LayoutReport,
    pub version: NaiveDate,
    pub stats: CheatStats,
}

/// Process every available source, render the layout and stamp the version.
pub fn run_build(config: &BuildConfig, version: NaiveDate) -> Result<BuildReport> {
    std::fs::create_dir_all(&config.out)
        .with_context(|| format!("creating {}", config.out.display()))?;

    let sources = config
        .sources
        .iter()
        .map(|source| SourceReport {
            name: source.name.to_string(),
            status: process_source(config, source),
        })
        .collect();

    let layout = render_layout(&config.out, &config.dist)
        .with_context(|| format!("rendering layout into {}", config.dist.display()))?;
    write_version_file(&config.dist, version).context("writing version marker")?;
    let stats = count_cheats(&config.out).context("counting cheats")?;
    tracing::info!("{stats}");

    Ok(BuildReport {
        sources,
        layout,
        version,
        stats,
    })
}

fn process_source(config: &BuildConfig, source: &Source) -> SourceStatus {
    let titles = config.titles_path(source);
    if !titles.is_dir() {
        tracing::warn!("{}: titles directory not found at {}", source.name, titles.display());
        return SourceStatus::Missing { titles_dir: titles };
    }

    tracing::info!("Processing {} cheats", source.name);
    let result = process_cheats(&titles, &config.source_output(source))
        .and_then(|_| process_cheats(&titles, &config.out));

    match result {
        Ok(report) => SourceStatus::Processed { report },
        Err(e) => {
            tracing::error!("Error processing {} cheats: {e}", source.name);
            SourceStatus::Failed {
                error: e.to_string(),
            }
        }
    }
}
