//! Loading data files from disk.

use std::fs;

use campinfo_ingest::{BomStatus, IngestError, UTF8_BOM, ensure_utf8_bom, read_csv_table};
use tempfile::TempDir;

#[test]
fn bom_fix_then_read_keeps_headers_clean() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plaetze.csv");
    fs::write(&path, "Name;Pfad\nSeeblick;seeblick\n").unwrap();

    assert_eq!(ensure_utf8_bom(&path).unwrap(), BomStatus::Added);
    assert_eq!(ensure_utf8_bom(&path).unwrap(), BomStatus::Present);
    assert!(fs::read(&path).unwrap().starts_with(&UTF8_BOM));

    let table = read_csv_table(&path, b';').unwrap();
    assert_eq!(table.headers, ["Name", "Pfad"]);
    let record = table.record(0).unwrap();
    assert_eq!(record.value("Name"), "Seeblick");
    assert_eq!(record.get("Premium"), None);
}

#[test]
fn missing_file_is_reported_as_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fehlt.csv");
    assert!(matches!(
        ensure_utf8_bom(&path),
        Err(IngestError::FileNotFound { .. })
    ));
    assert!(matches!(
        read_csv_table(&path, b';'),
        Err(IngestError::FileNotFound { .. })
    ));
}
