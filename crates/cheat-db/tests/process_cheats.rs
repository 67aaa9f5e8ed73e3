//! End-to-end tests for the title processor against real directory trees.

use std::fs;
use std::path::Path;

use cheat_db::{process_cheats, DocumentReader, TitleOutcome};

// ─────────────────────── helpers ───────────────────────

const TITLE: &str = "01006A800016E000";
const BUILD_A: &str = "4A0A6CB5E4B1B8E2";
const BUILD_B: &str = "7C1D2E3F40516273";

fn write(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn sheet(input: &Path, title: &str, build: &str, text: &str) {
    write(
        &input.join(title).join("cheats").join(format!("{build}.txt")),
        text,
    );
}

fn output_text(output: &Path, title: &str) -> String {
    fs::read_to_string(output.join(format!("{}.json", title.to_uppercase()))).unwrap()
}

const SHEET_A: &str = "\
[Infinite Health]
04000000 0054E1A0 00000064

[Max Money]
04000000 0054E1B0 05F5E0FF
";

// ═══════════════════════════════════════════════════════
// PARSING
// ═══════════════════════════════════════════════════════

#[test]
fn test_two_headers_two_blocks() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    sheet(
        input.path(),
        TITLE,
        BUILD_A,
        "[Cheat A]\n04000000 11111111\n\n{Cheat B}\n04000000 22222222\n",
    );

    process_cheats(input.path(), output.path()).unwrap();
    let doc = DocumentReader::read_from_file(&output.path().join(format!("{TITLE}.json"))).unwrap();
    let blocks = doc.build(BUILD_A).unwrap();
    assert_eq!(blocks.keys().collect::<Vec<_>>(), vec!["[Cheat A]", "{Cheat B}"]);
}

#[test]
fn test_lowercase_ids_are_uppercased() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    sheet(input.path(), &TITLE.to_lowercase(), &BUILD_A.to_lowercase(), SHEET_A);

    process_cheats(input.path(), output.path()).unwrap();
    let text = output_text(output.path(), TITLE);
    assert!(text.contains(&format!("\"{BUILD_A}\"")));
}

#[test]
fn test_exact_output_format() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    sheet(input.path(), TITLE, BUILD_A, "[Vie infinie é]\n04000000 0054E1A0 00000064\n");
    write(&input.path().join(TITLE).join("credits.txt"), "merci");

    process_cheats(input.path(), output.path()).unwrap();
    let expected = format!(
        "{{\n    \"{BUILD_A}\": {{\n        \"[Vie infinie é]\": \"[Vie infinie é]\\n04000000 0054E1A0 00000064\\n\\n\"\n    }},\n    \"attribution\": {{\n        \"credits.txt\": \"merci\"\n    }}\n}}"
    );
    assert_eq!(output_text(output.path(), TITLE), expected);
}

// ═══════════════════════════════════════════════════════
// MERGE SEMANTICS
// ═══════════════════════════════════════════════════════

#[test]
fn test_rerun_is_idempotent() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    sheet(input.path(), TITLE, BUILD_A, SHEET_A);
    write(&input.path().join(TITLE).join("author.txt"), "someone");

    let first = process_cheats(input.path(), output.path()).unwrap();
    let first_text = output_text(output.path(), TITLE);
    let second = process_cheats(input.path(), output.path()).unwrap();
    let second_text = output_text(output.path(), TITLE);

    assert_eq!(first_text, second_text);
    assert_eq!(first.fresh, 1);
    assert_eq!(second.merged, 1);
    assert_eq!(first.cheats, second.cheats);
}

#[test]
fn test_new_build_is_added_to_existing_title() {
    let output = tempfile::tempdir().unwrap();

    let first = tempfile::tempdir().unwrap();
    sheet(first.path(), TITLE, BUILD_A, SHEET_A);
    process_cheats(first.path(), output.path()).unwrap();

    let second = tempfile::tempdir().unwrap();
    sheet(second.path(), TITLE, BUILD_B, "[60 FPS]\n04000000 01234567 3C000000\n");
    let report = process_cheats(second.path(), output.path()).unwrap();

    let doc = DocumentReader::read_from_file(&output.path().join(format!("{TITLE}.json"))).unwrap();
    assert!(doc.build(BUILD_A).is_some());
    assert!(doc.build(BUILD_B).is_some());
    assert_eq!(report.merged, 1);
    assert_eq!(report.builds, 2);
}

#[test]
fn test_recorded_text_wins_on_collision() {
    let output = tempfile::tempdir().unwrap();

    let first = tempfile::tempdir().unwrap();
    sheet(first.path(), TITLE, BUILD_A, "[Speed]\n04000000 AAAAAAAA\n");
    process_cheats(first.path(), output.path()).unwrap();

    let second = tempfile::tempdir().unwrap();
    sheet(
        second.path(),
        TITLE,
        BUILD_A,
        "[Speed]\n04000000 BBBBBBBB\n[Jump]\n04000000 CCCCCCCC\n",
    );
    process_cheats(second.path(), output.path()).unwrap();

    let doc = DocumentReader::read_from_file(&output.path().join(format!("{TITLE}.json"))).unwrap();
    let blocks = doc.build(BUILD_A).unwrap();
    assert_eq!(blocks.get("[Speed]").unwrap(), "[Speed]\n04000000 AAAAAAAA\n\n");
    assert!(blocks.contains_key("[Jump]"));
}

#[test]
fn test_corrupt_prior_document_is_replaced() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    sheet(input.path(), TITLE, BUILD_A, SHEET_A);
    write(&output.path().join(format!("{TITLE}.json")), "{ truncated");

    let report = process_cheats(input.path(), output.path()).unwrap();
    assert_eq!(report.fresh, 1);
    let doc = DocumentReader::read_from_file(&output.path().join(format!("{TITLE}.json"))).unwrap();
    assert_eq!(doc.cheat_count(), 2);
}

#[test]
fn test_stale_titles_are_kept() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write(&output.path().join("0100000000000000.json"), "{}");
    sheet(input.path(), TITLE, BUILD_A, SHEET_A);

    process_cheats(input.path(), output.path()).unwrap();
    assert!(output.path().join("0100000000000000.json").exists());
}

// ═══════════════════════════════════════════════════════
// ORDERING AND EDGE CASES
// ═══════════════════════════════════════════════════════

#[test]
fn test_top_level_keys_sorted() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    for build in ["FFFF000000000000", "0000FFFF00000000", "8888888888888888"] {
        sheet(input.path(), TITLE, build, SHEET_A);
    }
    write(&input.path().join(TITLE).join("zz_credits.txt"), "x");

    process_cheats(input.path(), output.path()).unwrap();
    let doc = DocumentReader::read_from_file(&output.path().join(format!("{TITLE}.json"))).unwrap();
    let keys: Vec<_> = doc.keys().collect();
    assert_eq!(
        keys,
        vec!["0000FFFF00000000", "8888888888888888", "FFFF000000000000", "attribution"]
    );

    let text = output_text(output.path(), TITLE);
    let first = text.find("0000FFFF00000000").unwrap();
    let last = text.find("FFFF000000000000").unwrap();
    assert!(first < last);
}

#[test]
fn test_title_without_cheats_folder_still_written() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::create_dir_all(input.path().join(TITLE)).unwrap();

    let report = process_cheats(input.path(), output.path()).unwrap();
    assert_eq!(report.titles, 1);
    assert_eq!(output_text(output.path(), TITLE), "{}");
}

#[test]
fn test_sheet_with_only_invalid_blocks_yields_empty_build() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    sheet(input.path(), TITLE, BUILD_A, "[Header only]\n[Notes]\nno codes here\n");

    process_cheats(input.path(), output.path()).unwrap();
    let doc = DocumentReader::read_from_file(&output.path().join(format!("{TITLE}.json"))).unwrap();
    assert!(doc.build(BUILD_A).unwrap().is_empty());
}

#[test]
fn test_title_with_bad_last_character_is_skipped() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    sheet(input.path(), "01006A800016E00Z", BUILD_A, SHEET_A);

    let report = process_cheats(input.path(), output.path()).unwrap();
    assert_eq!(report.titles, 0);
}

#[test]
fn test_outcome_tags_per_title() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    sheet(input.path(), TITLE, BUILD_A, SHEET_A);
    let title = cheat_db::TitleId::parse(TITLE).unwrap();
    let dir = input.path().join(TITLE);

    let first = cheat_db::process_title(&title, &dir, output.path()).unwrap();
    let second = cheat_db::process_title(&title, &dir, output.path()).unwrap();
    assert_eq!(first.outcome, TitleOutcome::Fresh);
    assert_eq!(second.outcome, TitleOutcome::Merged);
}
