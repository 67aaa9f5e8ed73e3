//! cheat-db command-line builder — runs the parser over extracted sources and
//! assembles the distribution tree.

pub mod config;
pub mod pipeline;

pub use config::BuildConfig;
pub use pipeline::{run_build, BuildReport};
