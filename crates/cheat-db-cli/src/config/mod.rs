//! Configuration loading and resolution.

use std::path::{Path, PathBuf};

/// Env var overriding the combined output directory.
pub const OUT_ENV: &str = "CHEAT_DB_OUT";
/// Env var overriding the distribution directory.
pub const DIST_ENV: &str = "CHEAT_DB_DIST";
/// Env var overriding the directory sources were extracted into.
pub const ROOT_ENV: &str = "CHEAT_DB_ROOT";

const DEFAULT_OUT: &str = "cheats";
const DEFAULT_DIST: &str = ".";
const DEFAULT_ROOT: &str = ".";

/// An already extracted cheat source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: &'static str,
    /// Title folders, relative to the root.
    pub titles_dir: &'static str,
    /// Per-source document directory, relative to the working directory.
    pub output_dir: &'static str,
}

/// Sources in processing order.
pub const SOURCES: &[Source] = &[
    Source {
        name: "gbatemp",
        titles_dir: "gbatemp/titles",
        output_dir: "cheats_gbatemp",
    },
    Source {
        name: "highfps",
        titles_dir: "NX-60FPS-RES-GFX-Cheats-main/titles",
        output_dir: "cheats_gfx",
    },
];

/// Resolved paths for one pipeline run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub root: PathBuf,
    pub out: PathBuf,
    pub dist: PathBuf,
    pub sources: Vec<Source>,
}

impl BuildConfig {
    pub fn resolve(root: Option<&Path>, out: Option<&Path>, dist: Option<&Path>) -> Self {
        Self {
            root: resolve_path(root, ROOT_ENV, DEFAULT_ROOT),
            out: resolve_path(out, OUT_ENV, DEFAULT_OUT),
            dist: resolve_path(dist, DIST_ENV, DEFAULT_DIST),
            sources: SOURCES.to_vec(),
        }
    }

    pub fn titles_path(&self, source: &Source) -> PathBuf {
        self.root.join(source.titles_dir)
    }

    /// Per-source outputs live next to the combined output.
    pub fn source_output(&self, source: &Source) -> PathBuf {
        match self.out.parent() {
            Some(parent) => parent.join(source.output_dir),
            None => PathBuf::from(source.output_dir),
        }
    }
}

/// Explicit value, then environment, then default.
pub fn resolve_path(explicit: Option<&Path>, env: &str, default: &str) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Ok(env_path) = std::env::var(env) {
        if !env_path.trim().is_empty() {
            return PathBuf::from(env_path);
        }
    }

    PathBuf::from(default)
}
