use flat2sql_core::{
    generate_ddl, generate_import, scan_file, scan_with_cleaned, Dialect, Flat2SqlError, SqlType,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_fixture(content: &str) -> NamedTempFile {
    let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    tmp.write_all(content.as_bytes()).unwrap();
    tmp.flush().unwrap();
    tmp
}

#[test]
fn profiles_name_age_scenario() {
    let tmp = write_fixture("name,age\nAlice,30\nBob,\n");
    let profile = scan_file(tmp.path(), b',').unwrap();
    assert_eq!(profile.total_rows, 2);
    assert_eq!(profile.columns.len(), 2);

    let name = &profile.columns[0];
    assert_eq!(name.name, "name");
    assert_eq!(name.sql_type, SqlType::Text);
    assert_eq!(name.populated, 2);
    assert_eq!(name.empty, 0);
    assert_eq!(name.min_length, 3);
    assert_eq!(name.max_length, 5);

    let age = &profile.columns[1];
    assert_eq!(age.name, "age");
    assert_eq!(age.sql_type, SqlType::Integer);
    assert_eq!(age.populated, 1);
    assert_eq!(age.empty, 1);
    assert_eq!(age.min_value.as_deref(), Some("30"));
    assert_eq!(age.max_value.as_deref(), Some("30"));
}

#[test]
fn counts_always_sum_to_total_rows() {
    let tmp = write_fixture("a,b,c\n1,,x\n,,\n2,y,\n");
    let profile = scan_file(tmp.path(), b',').unwrap();
    for col in &profile.columns {
        assert_eq!(col.populated + col.empty, profile.total_rows);
    }
}

#[test]
fn one_bad_value_demotes_whole_column() {
    let tmp = write_fixture("n\n1\n2\n3\nx\n5\n");
    let profile = scan_file(tmp.path(), b',').unwrap();
    assert_eq!(profile.columns[0].sql_type, SqlType::Text);
}

#[test]
fn full_demotion_cascade() {
    let tmp = write_fixture("n\n1\n2.5\nx\n");
    let profile = scan_file(tmp.path(), b',').unwrap();
    assert_eq!(profile.columns[0].sql_type, SqlType::Text);
}

#[test]
fn integer_then_float_stays_float() {
    let tmp = write_fixture("n\n1\n2.5\n3\n");
    let profile = scan_file(tmp.path(), b',').unwrap();
    let col = &profile.columns[0];
    assert_eq!(col.sql_type, SqlType::Float);
    assert_eq!(col.min_value.as_deref(), Some("1"));
    assert_eq!(col.max_value.as_deref(), Some("3"));
}

#[test]
fn iso_dates_infer_date() {
    let tmp = write_fixture("d\n2024-01-31\n2023-12-01\n");
    let profile = scan_file(tmp.path(), b',').unwrap();
    let col = &profile.columns[0];
    assert_eq!(col.sql_type, SqlType::Date);
    assert_eq!(col.min_value.as_deref(), Some("2023-12-01"));
    assert_eq!(col.max_value.as_deref(), Some("2024-01-31"));
}

#[test]
fn tab_delimited_input() {
    let tmp = write_fixture("name\tage\nAlice\t30\n");
    let profile = scan_file(tmp.path(), b'\t').unwrap();
    assert_eq!(profile.columns.len(), 2);
    assert_eq!(profile.columns[1].sql_type, SqlType::Integer);
}

#[test]
fn field_count_mismatch_aborts() {
    let tmp = write_fixture("a,b\n1,2\n1,2,3\n");
    match scan_file(tmp.path(), b',') {
        Err(Flat2SqlError::Format {
            row,
            expected,
            found,
        }) => {
            assert_eq!(row, 3);
            assert_eq!(expected, 2);
            assert_eq!(found, 3);
        }
        other => panic!("expected Format error, got {other:?}"),
    }
}

#[test]
fn missing_input_is_io_error() {
    let err = scan_file(std::path::Path::new("/no/such/file.csv"), b',').unwrap_err();
    assert!(matches!(err, Flat2SqlError::Io(_)));
}

#[test]
fn cleaned_file_substitutes_mysql_sentinel() {
    let tmp = write_fixture("name,age\nAlice,30\nBob,\n");
    let out = tempfile::Builder::new().suffix(".dat").tempfile().unwrap();
    scan_with_cleaned(tmp.path(), b',', out.path(), "\\N").unwrap();
    let cleaned = std::fs::read_to_string(out.path()).unwrap();
    assert_eq!(cleaned, "name,age\nAlice,30\nBob,\\N\n");
}

#[test]
fn cleaned_file_roundtrips_with_sqlite_sentinel() {
    let original = "name,age\nAlice,30\nBob,\n";
    let tmp = write_fixture(original);
    let out = tempfile::Builder::new().suffix(".dat").tempfile().unwrap();
    scan_with_cleaned(tmp.path(), b',', out.path(), Dialect::Sqlite.null_sentinel()).unwrap();
    // sqlite sentinel is the empty string, so the cleaned copy is identical
    let cleaned = std::fs::read_to_string(out.path()).unwrap();
    assert_eq!(cleaned, original);
}

#[test]
fn cleaned_file_roundtrip_restores_original() {
    let original = "a,b\nx,\n,y\nq,r\n";
    let tmp = write_fixture(original);
    let out = tempfile::Builder::new().suffix(".dat").tempfile().unwrap();
    scan_with_cleaned(tmp.path(), b',', out.path(), "\\N").unwrap();
    let cleaned = std::fs::read_to_string(out.path()).unwrap();
    let restored: String = cleaned
        .lines()
        .map(|line| {
            let fields: Vec<&str> = line
                .split(',')
                .map(|f| if f == "\\N" { "" } else { f })
                .collect();
            fields.join(",") + "\n"
        })
        .collect();
    assert_eq!(restored, original);
}

#[test]
fn ddl_and_import_share_column_order() {
    let tmp = write_fixture("name,age\nAlice,30\nBob,\n");
    let profile = scan_file(tmp.path(), b',').unwrap();
    let ddl = generate_ddl(Dialect::MySql, "people", &profile.columns).unwrap();
    let import = generate_import(
        Dialect::MySql,
        "people",
        &profile.columns,
        std::path::Path::new("people.dat"),
        b',',
    )
    .unwrap();
    let ddl_name = ddl.find("`name`").unwrap();
    let ddl_age = ddl.find("`age`").unwrap();
    assert!(ddl_name < ddl_age);
    let imp_name = import.find("`name`").unwrap();
    let imp_age = import.find("`age`").unwrap();
    assert!(imp_name < imp_age);
}

#[test]
fn sqlite_ddl_for_name_age_scenario() {
    let tmp = write_fixture("name,age\nAlice,30\nBob,\n");
    let profile = scan_file(tmp.path(), b',').unwrap();
    let ddl = generate_ddl(Dialect::Sqlite, "people", &profile.columns).unwrap();
    assert!(ddl.starts_with("CREATE TABLE \"people\" ("));
    assert!(ddl.contains("\"name\" TEXT NOT NULL,"));
    // age saw one empty field, so no NOT NULL
    assert!(ddl.contains("\"age\" INTEGER\n"));
    assert!(ddl.ends_with(");"));
}

#[test]
fn mysql_ddl_widens_big_integers() {
    let tmp = write_fixture("id\n1\n9999999999\n");
    let profile = scan_file(tmp.path(), b',').unwrap();
    let ddl = generate_ddl(Dialect::MySql, "t", &profile.columns).unwrap();
    assert!(ddl.contains("`id` BIGINT NOT NULL"));
}
