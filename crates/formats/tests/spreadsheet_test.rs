#[path = "support/workbook.rs"]
mod workbook;

use dbfixture_core::{Error, FormatError, Value};
use dbfixture_formats::{Format, load, load_spreadsheet};

use workbook::{Sheet, write_workbook};

#[test]
fn each_sheet_becomes_a_table_with_header_row_columns() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("seed.xlsx");
    write_workbook(
        &path,
        &[
            Sheet {
                name: "users",
                rows_xml: r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="C1" t="s"><v>2</v></c></row><row r="2"><c r="A2"><v>1</v></c><c r="B2" t="s"><v>3</v></c><c r="C2" t="b"><v>1</v></c></row><row r="4"><c r="A4"><v>2.5</v></c><c r="C4" t="inlineStr"><is><t>inline &amp; text</t></is></c></row>"#,
            },
            Sheet {
                name: "orders",
                rows_xml: r#"<row r="1"><c r="A1" t="inlineStr"><is><t>id</t></is></c></row>"#,
            },
        ],
        &["id", "name", "active", "Alice"],
    );

    let data_set = load_spreadsheet(&path).expect("workbook should load");

    assert_eq!(data_set.table_names(), vec!["users", "orders"]);
    let users = data_set.table("users").expect("users sheet should exist");
    assert_eq!(
        users.metadata().column_names(),
        vec!["id".to_string(), "name".to_string(), "active".to_string()]
    );
    assert_eq!(users.row_count(), 2);
    assert_eq!(users.value(0, "name"), Ok(&Value::from("Alice")));
    assert_eq!(users.value(0, "active"), Ok(&Value::from("true")));
    assert_eq!(users.value(1, "id"), Ok(&Value::from("2.5")));
    assert_eq!(users.value(1, "name"), Ok(&Value::Null));
    assert_eq!(users.value(1, "active"), Ok(&Value::from("inline & text")));

    let orders = data_set.table("orders").expect("orders sheet should exist");
    assert!(orders.is_empty());
}

#[test]
fn empty_sheet_loads_as_empty_table() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("empty.xlsx");
    write_workbook(&path, &[Sheet { name: "blank", rows_xml: "" }], &[]);

    let data_set = load(Format::Spreadsheet, &path).expect("workbook should load");

    let blank = data_set.table("blank").expect("blank sheet should exist");
    assert!(blank.is_empty());
    assert!(blank.columns().is_empty());
}

#[test]
fn non_archive_file_is_a_format_error() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, "not a zip archive").expect("file should be written");

    let error = load_spreadsheet(&path).expect_err("garbage must fail");

    assert!(matches!(error, Error::Format(_)), "unexpected error: {error:?}");
}

#[test]
fn cell_beyond_last_worksheet_column_is_a_format_error() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("wide.xlsx");
    write_workbook(
        &path,
        &[Sheet {
            name: "users",
            rows_xml: r#"<row r="1"><c r="A1" t="inlineStr"><is><t>id</t></is></c><c r="ZZZZZZZZZZZZZ1" t="inlineStr"><is><t>far</t></is></c></row>"#,
        }],
        &[],
    );

    let error = load_spreadsheet(&path).expect_err("out-of-range cell must fail");

    let Error::Format(FormatError::Malformed { message, .. }) = error else {
        panic!("expected malformed format error, got {error:?}");
    };
    assert!(message.contains("ZZZZZZZZZZZZZ1"), "unexpected message: {message}");
}
