use bcs_extractor::bcs::format::{format_file, reflow_text, FormatOptions};
use bcs_extractor::Outcome;
use encoding_rs::SHIFT_JIS;
use std::fs;
use std::path::Path;

fn write_sjis(path: &Path, text: &str) {
    let (encoded, _, _) = SHIFT_JIS.encode(text);
    fs::write(path, encoded).expect("write fixture");
}

fn read_sjis(path: &Path) -> String {
    let data = fs::read(path).expect("read output");
    let (text, _, _) = SHIFT_JIS.decode(&data);
    text.into_owned()
}

#[test]
fn reflow_wraps_at_the_threshold() {
    // Joining space counts one, each word its characters: "aaa bbb" fills
    // a 7-wide line exactly, "ccc" starts the next.
    assert_eq!(reflow_text("aaa bbb ccc ddd", 7, false), "aaa bbb\\nccc ddd");
}

#[test]
fn reflow_collapses_markers_unless_kept() {
    assert_eq!(reflow_text("aa\\nbb cc", 50, false), "aa bb cc");
    assert_eq!(reflow_text("aa\\nbb cc", 50, true), "aa\\nbb cc");
}

#[test]
fn reflow_counts_characters_not_bytes() {
    // Multibyte Shift-JIS text still wraps by character count.
    assert_eq!(reflow_text("ああああ いいいい", 5, false), "ああああ\\nいいいい");
}

#[test]
fn format_rewraps_only_the_text_column() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("script.csv");
    write_sjis(&input, "%id%,%text%\r\n1,aaa bbb ccc ddd\r\n");

    let opts = FormatOptions {
        wrap_length: 7,
        ..FormatOptions::default()
    };
    let outcome = format_file(&input, out.path(), &opts).expect("format");
    let dest = out.path().join("script.csv");
    assert_eq!(outcome, Outcome::Written(dest.clone()));
    assert_eq!(read_sjis(&dest), "%id%,%text%\r\n1,aaa bbb\\nccc ddd\r\n");
}

#[test]
fn format_accepts_the_short_text_marker() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("script.csv");
    write_sjis(&input, "%text\r\nsome words here\r\n");

    let opts = FormatOptions {
        wrap_length: 10,
        ..FormatOptions::default()
    };
    format_file(&input, out.path(), &opts).expect("format");
    assert_eq!(
        read_sjis(&out.path().join("script.csv")),
        "%text\r\nsome words\\nhere\r\n"
    );
}

#[test]
fn format_preserves_quoted_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("script.csv");
    write_sjis(&input, "%id%,%name%,%text%\r\n1,\"a,b\",hello\r\n");

    format_file(&input, out.path(), &FormatOptions::default()).expect("format");
    assert_eq!(
        read_sjis(&out.path().join("script.csv")),
        "%id%,%name%,%text%\r\n1,\"a,b\",hello\r\n"
    );
}

#[test]
fn format_skips_comment_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("script.csv");
    write_sjis(&input, "# generated\r\n%text%\r\nhi there\r\n");

    format_file(&input, out.path(), &FormatOptions::default()).expect("format");
    assert_eq!(read_sjis(&out.path().join("script.csv")), "%text%\r\nhi there\r\n");
}

#[test]
fn format_skips_files_without_a_text_column() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("script.csv");
    write_sjis(&input, "%id%,%name%\r\n1,foo\r\n");

    let outcome = format_file(&input, out.path(), &FormatOptions::default()).expect("format");
    assert_eq!(outcome, Outcome::NoTextColumn);
    assert!(!out.path().join("script.csv").exists());
}

#[test]
fn format_skips_non_csv_inputs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("container.bcs");
    fs::write(&input, b"TSV").expect("write fixture");

    let outcome =
        format_file(&input, dir.path(), &FormatOptions::default()).expect("format");
    assert_eq!(outcome, Outcome::NotRecognized);
}

#[test]
fn format_respects_overwrite() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("script.csv");
    write_sjis(&input, "%text%\r\nwords\r\n");

    // Output directory is the input directory, so the destination exists.
    let outcome = format_file(&input, dir.path(), &FormatOptions::default()).expect("format");
    assert_eq!(outcome, Outcome::AlreadyExists(input.clone()));

    let opts = FormatOptions {
        overwrite: true,
        ..FormatOptions::default()
    };
    let outcome = format_file(&input, dir.path(), &opts).expect("format");
    assert_eq!(outcome, Outcome::Written(input));
}
