//! Boundary Tests for tabzero
//!
//! Edge-case coverage: empty inputs, blank lines, unicode content,
//! quoted fields, nested JSON and sheet-name limits.

use std::fs;
use std::path::PathBuf;

use tabzero::{convert, ConvertError, ConverterBuilder, MergeMode, SheetSelector};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_header_only_csv_converts_to_header_only_output() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "empty.csv", "a,b,c\n");
    let output = dir.path().join("out.csv");

    convert(&input, &output, &[]).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "a,b,c\n");
}

#[test]
fn test_header_only_csv_to_jsonl_is_empty() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "empty.csv", "a,b\n");
    let output = dir.path().join("out.jsonl");

    convert(&input, &output, &[]).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}

#[test]
fn test_empty_jsonl_produces_empty_table() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "empty.jsonl", "");
    let output = dir.path().join("out.csv");

    convert(&input, &output, &[]).unwrap();

    // No objects means no columns and no rows
    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}

#[test]
fn test_blank_lines_in_jsonl_are_ignored() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "gaps.jsonl", "{\"a\": 1}\n\n\n{\"a\": 2}\n");
    let output = dir.path().join("out.csv");

    convert(&input, &output, &[]).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn test_nested_json_objects_are_flattened_with_dotted_names() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "nested.jsonl",
        "{\"user\": {\"name\": \"alice\", \"age\": 30}, \"ok\": true}\n",
    );
    let output = dir.path().join("out.csv");

    convert(&input, &output, &[]).unwrap();

    // serde_json parses objects into sorted maps, so column discovery
    // order is alphabetical within each line
    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "ok,user.age,user.name");
    assert_eq!(lines[1], "true,30,alice");
}

#[test]
fn test_unicode_content_survives_round_trip() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "unicode.csv", "名前,値\nこんにちは,1\némile,2\n");
    let xlsx = dir.path().join("unicode.xlsx");
    let restored = dir.path().join("restored.csv");

    convert(&input, &xlsx, &[]).unwrap();
    convert(&xlsx, &restored, &[]).unwrap();

    assert_eq!(
        fs::read_to_string(&input).unwrap(),
        fs::read_to_string(&restored).unwrap()
    );
}

#[test]
fn test_quoted_fields_with_embedded_delimiters_and_newlines() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "quoted.csv",
        "a,b\n\"one, two\",\"line1\nline2\"\n",
    );
    let output = dir.path().join("out.jsonl");

    convert(&input, &output, &[]).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(
        content.lines().next().unwrap(),
        "{\"a\":\"one, two\",\"b\":\"line1\\nline2\"}"
    );
}

#[test]
fn test_ragged_csv_rows_are_padded_or_skipped_consistently() {
    // The csv crate rejects rows with the wrong field count; the tolerant
    // reader skips them and keeps the rest.
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "ragged.csv", "a,b\n1,2\n3\n4,5\n");
    let output = dir.path().join("out.csv");

    convert(&input, &output, &[]).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines, ["a,b", "1,2", "4,5"]);
}

#[test]
fn test_sheet_index_out_of_range_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "one.csv", "a\n1\n");
    let xlsx = dir.path().join("one.xlsx");
    convert(&input, &xlsx, &[]).unwrap();

    let converter = ConverterBuilder::new()
        .with_sheet_selector(SheetSelector::Index(5))
        .build()
        .unwrap();
    let result = converter.convert(&xlsx, dir.path().join("out.csv"));

    assert!(matches!(result, Err(ConvertError::Config(_))));
}

#[test]
fn test_sheet_name_not_found_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "one.csv", "a\n1\n");
    let xlsx = dir.path().join("one.xlsx");
    convert(&input, &xlsx, &[]).unwrap();

    let converter = ConverterBuilder::new()
        .with_sheet_selector(SheetSelector::Name("Missing".to_string()))
        .build()
        .unwrap();
    let result = converter.convert(&xlsx, dir.path().join("out.csv"));

    assert!(matches!(result, Err(ConvertError::Config(_))));
}

#[test]
fn test_missing_input_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = convert(
        dir.path().join("nope.csv"),
        dir.path().join("out.csv"),
        &[],
    );

    assert!(matches!(
        result,
        Err(ConvertError::Csv(_)) | Err(ConvertError::Io(_))
    ));
}

#[test]
fn test_forbidden_sheet_name_characters_are_sanitized_on_merge() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "report[1].csv", "x\n1\n");
    let b = write_file(&dir, "data?set.csv", "x\n2\n");
    let output = dir.path().join("out.xlsx");

    tabzero::merge(&[a, b], &output, MergeMode::SheetPerFile).unwrap();

    // Sheets are readable back by their sanitized names
    let converter = ConverterBuilder::new()
        .with_sheet_selector(SheetSelector::Name("report_1_".to_string()))
        .build()
        .unwrap();
    let csv_out = dir.path().join("check.csv");
    converter.convert(&output, &csv_out).unwrap();

    let content = fs::read_to_string(&csv_out).unwrap();
    assert_eq!(content.lines().nth(1).unwrap(), "1");
}

#[test]
fn test_long_file_stems_truncate_to_valid_sheet_names() {
    let dir = TempDir::new().unwrap();
    let long_name = format!("{}.csv", "x".repeat(60));
    let input = write_file(&dir, &long_name, "a\n1\n");
    let output = dir.path().join("out.xlsx");

    // Writing must not fail on the 31-character sheet name limit
    tabzero::merge(&[input], &output, MergeMode::SheetPerFile).unwrap();
    assert!(output.exists());
}

#[test]
fn test_large_integers_keep_exact_text_form() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "big.csv", "n\n900719925474099\n");
    let output = dir.path().join("out.csv");

    convert(&input, &output, &[]).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().nth(1).unwrap(), "900719925474099");
}

#[test]
fn test_null_heavy_jsonl_keeps_column_union() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "sparse.jsonl",
        "{\"a\": 1}\n{\"b\": 2}\n{\"c\": 3}\n",
    );
    let output = dir.path().join("out.csv");

    convert(&input, &output, &[]).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "a,b,c");
    assert_eq!(lines[1], "1,,");
    assert_eq!(lines[2], ",2,");
    assert_eq!(lines[3], ",,3");
}

#[test]
fn test_fragment_single_row_file_never_loses_the_row() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "tiny.csv", "a,b\n1,2\n");

    // A limit far below one row still yields a single complete part
    let parts = tabzero::fragment(&input, 0.000001).unwrap();

    let mut total_rows = 0;
    for part in &parts {
        total_rows += fs::read_to_string(part).unwrap().lines().count() - 1;
    }
    assert_eq!(total_rows, 1);
}
