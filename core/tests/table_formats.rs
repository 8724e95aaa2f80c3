//! Integration tests for the table loaders and the compiled artifact.

use libmabiao_core::{CodeTable, Entry};

const DEMO_TSV: &str = "\
# 示例码表
a\t甲
ab\t乙
abc\t丙
b\t丁
";

#[test]
fn test_tsv_and_json_agree() {
    let from_tsv = CodeTable::from_tsv_str(DEMO_TSV).unwrap();
    let json = r#"[
        {"code": "b",   "text": "丁"},
        {"code": "a",   "text": "甲"},
        {"code": "abc", "text": "丙"},
        {"code": "ab",  "text": "乙"}
    ]"#;
    let from_json = CodeTable::from_json_str(json).unwrap();
    assert_eq!(from_tsv.entries(), from_json.entries());
}

#[test]
fn test_compiled_artifact_roundtrip_through_file() {
    let table = CodeTable::from_tsv_str(DEMO_TSV).unwrap();

    let path = std::env::temp_dir().join(format!("mabiao_test_{}.bin", std::process::id()));
    table.save(&path).unwrap();
    let loaded = CodeTable::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.entries(), table.entries());
    assert_eq!(loaded.range_of("ab"), Some(1..3));
}

#[test]
fn test_loaded_table_answers_lookups() {
    let table = CodeTable::from_tsv_str(DEMO_TSV).unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(table.first_match("ab"), Some(1));
    assert_eq!(table.range_of("z"), None);
    assert_eq!(table.matches("a").len(), 3);
}

#[test]
fn test_invalid_rows_are_skipped_not_fatal() {
    let tsv = "a\t甲\nBAD\t大写\nx1\t混\nok\t好\n";
    let table = CodeTable::from_tsv_str(tsv).unwrap();
    let codes: Vec<&str> = table.entries().iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["a", "ok"]);
}

#[test]
fn test_entry_construction() {
    let e = Entry::new("ab", "乙");
    assert_eq!(e.code, "ab");
    assert_eq!(e.text, "乙");
}
