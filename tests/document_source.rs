use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use material_table::source::{parse_document, parse_document_bytes, read_document, DocumentSource};
use material_table::ConversionError;

const FIXTURES: &str = "tests/fixtures/materials";

fn tmp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("material-table-source-{tag}-{nanos}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn file_names(source: DocumentSource) -> Vec<String> {
    source
        .map(|doc| doc.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn yields_parseable_json_files_in_name_order() {
    let source = DocumentSource::open(FIXTURES, "*.json").unwrap();
    // broken.json fails to parse, notes.txt does not match, nested/ is not descended into.
    assert_eq!(file_names(source), vec!["metals.json", "number.json", "wood.json"]);
}

#[test]
fn counts_seen_and_skipped_files() {
    let mut source = DocumentSource::open(FIXTURES, "*.json").unwrap();
    let docs: Vec<_> = source.by_ref().collect();
    assert_eq!(docs.len(), 3);
    assert_eq!(source.seen(), 4);
    assert_eq!(source.skipped(), 1);
}

#[test]
fn pattern_is_configurable() {
    let source = DocumentSource::open(FIXTURES, "w*.json").unwrap();
    assert_eq!(file_names(source), vec!["wood.json"]);
}

#[test]
fn extension_match_is_case_sensitive() {
    let dir = tmp_dir("case");
    std::fs::write(dir.join("upper.JSON"), "{}").unwrap();
    std::fs::write(dir.join("lower.json"), "{}").unwrap();

    let source = DocumentSource::open(&dir, "*.json").unwrap();
    assert_eq!(file_names(source), vec!["lower.json"]);
}

#[test]
fn empty_directory_yields_nothing() {
    let dir = tmp_dir("empty");
    let mut source = DocumentSource::open(&dir, "*.json").unwrap();
    assert!(source.next().is_none());
    assert_eq!(source.seen(), 0);
}

#[test]
fn missing_directory_is_rejected_up_front() {
    let err = DocumentSource::open("tests/fixtures/does_not_exist", "*.json")
        .err()
        .unwrap();
    assert!(matches!(err, ConversionError::InputDirectory { .. }));

    let err = DocumentSource::open("tests/fixtures/materials/wood.json", "*.json")
        .err()
        .unwrap();
    assert!(err.to_string().contains("not a directory"));
}

#[test]
fn invalid_pattern_is_rejected() {
    let err = DocumentSource::open(FIXTURES, "[*.json").err().unwrap();
    assert!(matches!(err, ConversionError::Pattern(_)));
}

#[test]
fn parse_errors_name_the_file() {
    let err = read_document("tests/fixtures/materials/broken.json").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("failed to parse"));
    assert!(msg.contains("broken.json"));

    let tree = parse_document("inline.json", r#"[{"a": 1}]"#).unwrap();
    assert!(tree.is_array());
}

#[cfg(unix)]
#[test]
fn broken_links_only_count_when_their_name_matches() {
    let dir = tmp_dir("links");
    std::fs::write(dir.join("a.json"), r#"{"name": {"translate": "a"}}"#).unwrap();
    std::os::unix::fs::symlink(dir.join("missing.txt"), dir.join("readme.txt")).unwrap();

    let mut source = DocumentSource::open(&dir, "*.json").unwrap();
    let docs: Vec<_> = source.by_ref().collect();
    assert_eq!(docs.len(), 1);
    assert_eq!(source.seen(), 1);
    assert_eq!(source.skipped(), 0);

    std::os::unix::fs::symlink(dir.join("missing.json"), dir.join("gone.json")).unwrap();
    let mut source = DocumentSource::open(&dir, "*.json").unwrap();
    let docs: Vec<_> = source.by_ref().collect();
    assert_eq!(docs.len(), 1);
    assert_eq!(source.seen(), 2);
    assert_eq!(source.skipped(), 1);
}

#[cfg(unix)]
#[test]
fn only_non_matching_broken_link_leaves_nothing_seen() {
    let dir = tmp_dir("readme-link");
    std::os::unix::fs::symlink(dir.join("missing.txt"), dir.join("readme.txt")).unwrap();

    let mut source = DocumentSource::open(&dir, "*.json").unwrap();
    assert!(source.next().is_none());
    assert_eq!(source.seen(), 0);
    assert_eq!(source.skipped(), 0);
}

#[test]
fn invalid_utf8_is_a_parse_error_of_that_file() {
    let dir = tmp_dir("encoding");
    std::fs::write(dir.join("a.json"), r#"{"name": {"translate": "a"}}"#).unwrap();
    std::fs::write(dir.join("bad.json"), b"{\"name\": \"\xff\"}").unwrap();

    let err = read_document(dir.join("bad.json")).unwrap_err();
    assert!(matches!(err, ConversionError::Json { .. }), "{err:?}");
    assert!(err.to_string().contains("bad.json"));

    let mut source = DocumentSource::open(&dir, "*.json").unwrap();
    let docs: Vec<_> = source.by_ref().collect();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].path.file_name().unwrap(), "a.json");
    assert_eq!(source.seen(), 2);
    assert_eq!(source.skipped(), 1);

    let tree = parse_document_bytes("inline.json", b"{\"n\": 1}").unwrap();
    assert_eq!(tree["n"], 1);
}
