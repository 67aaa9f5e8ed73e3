//! Cheat sheet parsing.
//!
//! A sheet is a loosely structured text file: every line containing a
//! `[...]` or `{...}` span opens a block that runs until the next such line.
//! Blocks that are a lone header, or that carry no 8-digit hex word, are
//! dropped.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::{CheatDbResult, Section};

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[.+\]|\{.+\}").expect("header pattern is valid")
});

static HEX_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}").expect("hex pattern is valid")
});

/// Decode bytes as UTF-8, dropping invalid sequences and folding `\r\n`
/// and lone `\r` line endings into `\n`.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    if text.contains('\r') {
        text = text.replace("\r\n", "\n").replace('\r', "\n");
    }
    text
}

/// Read a text file with [`decode_lossy`].
pub fn read_text_lossy(path: &Path) -> CheatDbResult<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode_lossy(&bytes))
}

/// True when `line` opens a cheat block.
pub fn is_header(line: &str) -> bool {
    HEADER.is_match(line)
}

/// Parse sheet text into label → code blocks in first-seen order.
pub fn parse_sheet(text: &str) -> Section {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let headers: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_header(line))
        .map(|(i, _)| i)
        .collect();

    let mut blocks = Section::new();
    for (n, &start) in headers.iter().enumerate() {
        let end = headers.get(n + 1).copied().unwrap_or(lines.len());
        let body = &lines[start..end];
        if body.len() <= 1 {
            continue;
        }

        let code = body.concat();
        if !HEX_WORD.is_match(&code) {
            continue;
        }

        let label = lines[start].trim();
        let text = format!("{}\n\n", code.trim_matches(|c: char| c == '\n' || c == ' '));
        blocks.insert(label, text);
    }
    blocks
}

/// Read and parse one sheet file.
pub fn read_sheet(path: &Path) -> CheatDbResult<Section> {
    let text = read_text_lossy(path)?;
    Ok(parse_sheet(&text))
}
