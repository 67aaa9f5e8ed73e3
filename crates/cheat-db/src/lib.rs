//! cheat-db — parses community cheat sheets into canonical per-title JSON
//! documents and renders them back into a distribution layout.

pub mod layout;
pub mod merge;
pub mod processor;
pub mod sheet;
pub mod stats;
pub mod storage;
pub mod types;
pub mod version;

pub use layout::render_layout;
pub use merge::{merge_documents, Merge};
pub use processor::{process_cheats, process_title, ProcessReport, TitleOutcome, TitleReport};
pub use sheet::{parse_sheet, read_sheet};
pub use stats::{count_cheats, update_readme, CheatStats};
pub use storage::{DocumentReader, DocumentWriter};
pub use types::*;
pub use version::{has_new_cheats, parse_source_version, read_version_file, write_version_file};
