//! cheat-db — entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use cheat_db::version::{read_version_file, today};
use cheat_db::{count_cheats, has_new_cheats, parse_source_version, process_cheats};
use cheat_db::{render_layout, update_readme, write_version_file};
use cheat_db_cli::{run_build, BuildConfig};

#[derive(Parser)]
#[command(
    name = "cheat-db",
    about = "cheat-db — build a per-title cheat database from extracted community sources",
    version
)]
struct Cli {
    /// Print reports as JSON (machine-readable).
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an extracted titles tree into per-title JSON documents.
    Process {
        /// Directory holding one folder per title id.
        input: PathBuf,
        /// Directory receiving <TITLE_ID>.json documents.
        output: PathBuf,
    },

    /// Render documents into the titles/<TID>/cheats/<BID>.txt layout.
    Layout {
        /// Directory of <TITLE_ID>.json documents.
        json_dir: PathBuf,
        /// Distribution directory; `titles/` is created inside it.
        dist: PathBuf,
    },

    /// Count titles, builds, and cheats.
    Count {
        /// Directory of <TITLE_ID>.json documents.
        json_dir: PathBuf,
        /// Replace the last line of this README with the summary.
        #[arg(long)]
        readme: Option<PathBuf>,
    },

    /// Write the VERSION marker.
    Version {
        /// Directory to write VERSION into.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Date to record (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Report whether a source version is newer than the database.
    Fresh {
        /// Source version as MMDDYYYY.
        #[arg(long)]
        source: String,
        /// Database version (YYYY-MM-DD).
        #[arg(long, conflicts_with = "dir")]
        db_version: Option<NaiveDate>,
        /// Read the database version from VERSION in this directory.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Process every configured source, render the layout, and stamp VERSION.
    Build {
        /// Directory the sources were extracted into.
        #[arg(long)]
        root: Option<PathBuf>,
        /// Combined document directory.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Distribution directory.
        #[arg(long)]
        dist: Option<PathBuf>,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   cheat-db completions bash > ~/.local/share/bash-completion/completions/cheat-db
    ///   cheat-db completions zsh > ~/.zfunc/_cheat-db
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Process { input, output } => {
            let report = process_cheats(&input, &output)
                .with_context(|| format!("processing {}", input.display()))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Processed {} titles ({} merged, {} fresh): {} builds, {} cheats",
                    report.titles, report.merged, report.fresh, report.builds, report.cheats
                );
            }
        }

        Commands::Layout { json_dir, dist } => {
            let report = render_layout(&json_dir, &dist)
                .with_context(|| format!("rendering {}", json_dir.display()))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Rendered {} titles: {} sheets, {} attribution files",
                    report.titles, report.sheets, report.attributions
                );
            }
        }

        Commands::Count { json_dir, readme } => {
            let stats = count_cheats(&json_dir)
                .with_context(|| format!("counting {}", json_dir.display()))?;
            if let Some(readme) = readme {
                update_readme(&readme, &stats)
                    .with_context(|| format!("updating {}", readme.display()))?;
            }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{stats}");
            }
        }

        Commands::Version { dir, date } => {
            let date = date.unwrap_or_else(today);
            write_version_file(&dir, date)?;
            println!("{date}");
        }

        Commands::Fresh {
            source,
            db_version,
            dir,
        } => {
            let source = parse_source_version(&source)?;
            let database = match db_version {
                Some(date) => date,
                None => read_version_file(&dir)?,
            };
            let fresh = has_new_cheats(source, database);
            if cli.json {
                let info = serde_json::json!({
                    "source": source,
                    "database": database,
                    "has_new_cheats": fresh,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{fresh}");
            }
        }

        Commands::Build { root, out, dist } => {
            let config = BuildConfig::resolve(root.as_deref(), out.as_deref(), dist.as_deref());
            let report = run_build(&config, today())?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.stats);
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "cheat-db", &mut std::io::stdout());
        }
    }

    Ok(())
}
