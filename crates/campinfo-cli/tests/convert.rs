//! Integration tests for the conversion pipeline.

use std::fs;
use std::path::Path;

use campinfo_cli::pipeline::{ConvertRequest, PipelineError, run_conversion};
use campinfo_ingest::{BomStatus, UTF8_BOM};
use campinfo_model::{ConverterOptions, ImagesRoot, RuleSet, Strictness};
use campinfo_transform::{NoopObserver, RuleKind, TransformError};
use insta::assert_snapshot;
use tempfile::TempDir;

const TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Root>
  <cell>
    <Name />
    <Street /><StreetNo />
    <ZipCode /><Town />
    <Imbiss>
      Imbiss am Platz
      <Imbiss href="file://Bilder/Yes.ai" />
    </Imbiss>
    <RatingAvgSanitary>
      <RatingAvgSanitaryGraphic href="file://Bilder/Balken_50.ai" />
      5,0
    </RatingAvgSanitary>
  </cell>
</Root>
"#;

const DATA: &str = "Name;Street;StreetNo;ZipCode;Town;Imbiss;ImbissValue;RatingAvgSanitary;Pfad;Premium\n\
                    Seeblick;Am See;4;12345;Seedorf;Imbiss am Platz;Yes.ai;balken_43.ai;seeblick;ja\n\
                    Waldrand;Forstweg;;54321;Waldheim;Imbiss am Platz;No.ai;balken_50.ai;;nein\n";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(data: &[u8]) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("cp_vorlage.xml"), TEMPLATE).unwrap();
        fs::write(dir.path().join("plaetze 2024.csv"), data).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    fn request(&self) -> ConvertRequest {
        let root: ImagesRoot = "file:///C:/Bilder/".parse().unwrap();
        let options = ConverterOptions::new(
            self.path("cp_vorlage.xml"),
            self.path("plaetze 2024.csv"),
            root,
        );
        let mut request = ConvertRequest::new(options);
        request.output_root = self.dir.path().to_path_buf();
        request
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn converts_every_row_into_numbered_files() {
    let fixture = Fixture::new(DATA.as_bytes());
    let result = run_conversion(&fixture.request(), &NoopObserver).unwrap();

    let destination = fixture.path("xml_cp-vorlage_plaetze-2024");
    assert_eq!(result.destination, destination);
    assert_eq!(result.rows, 2);
    assert_eq!(
        result.written,
        [destination.join("1.xml"), destination.join("2.xml")]
    );
    assert_eq!(result.bom, Some(BomStatus::Added));
    assert_eq!(result.rule_counts.get(&RuleKind::Rating), Some(&2));
    assert_eq!(result.rule_counts.get(&RuleKind::Nested), Some(&2));
    assert!(result.unrecognized_columns.is_empty());

    assert_snapshot!(read(&destination.join("1.xml")), @r#"
    <?xml version="1.0" encoding="UTF-8" standalone="yes"?>
    <Root><cell><Name>Seeblick</Name><Street>Am See</Street> <StreetNo>4</StreetNo><ZipCode>12345</ZipCode> <Town>Seedorf</Town><Imbiss>Imbiss am Platz&#x9;<Imbiss href="file:///C:/Bilder/seeblick/Yes.ai"/></Imbiss><RatingAvgSanitary><RatingAvgSanitaryGraphic href="file:///C:/Bilder/seeblick/balken_43.ai"/>&#x9;4,3</RatingAvgSanitary></cell></Root>
    "#);
    assert_snapshot!(read(&destination.join("2.xml")), @r#"
    <?xml version="1.0" encoding="UTF-8" standalone="yes"?>
    <Root><cell><Name>Waldrand</Name><Street>Forstweg</Street> <StreetNo></StreetNo><ZipCode>54321</ZipCode> <Town>Waldheim</Town><Imbiss>Imbiss am Platz&#x9;<Imbiss href="file:///C:/Bilder/No.ai"/></Imbiss><RatingAvgSanitary><RatingAvgSanitaryGraphic href="file:///C:/Bilder/balken_50.ai"/>&#x9;5,0</RatingAvgSanitary></cell></Root>
    "#);
}

#[test]
fn data_file_gains_a_bom() {
    let fixture = Fixture::new(DATA.as_bytes());
    run_conversion(&fixture.request(), &NoopObserver).unwrap();
    let bytes = fs::read(fixture.path("plaetze 2024.csv")).unwrap();
    assert!(bytes.starts_with(&UTF8_BOM));

    let again = run_conversion(&fixture.request(), &NoopObserver).unwrap();
    assert_eq!(again.bom, Some(BomStatus::Present));
}

#[test]
fn dry_run_writes_nothing() {
    let fixture = Fixture::new(DATA.as_bytes());
    let mut request = fixture.request();
    request.dry_run = true;
    let result = run_conversion(&request, &NoopObserver).unwrap();

    assert_eq!(result.rows, 2);
    assert!(result.written.is_empty());
    assert!(!result.destination.exists());
    assert_eq!(result.bom, None);
    let bytes = fs::read(fixture.path("plaetze 2024.csv")).unwrap();
    assert!(!bytes.starts_with(&UTF8_BOM));
}

#[test]
fn unknown_columns_are_reported_or_fatal() {
    let fixture = Fixture::new(b"Name;Stellplaetze\nSeeblick;120\n");
    let result = run_conversion(&fixture.request(), &NoopObserver).unwrap();
    assert_eq!(
        result.unrecognized_columns.iter().collect::<Vec<_>>(),
        ["Stellplaetze"]
    );
    assert_eq!(result.warning_count(), 1);

    let mut strict = fixture.request();
    strict.rules = RuleSet::default().with_strictness(Strictness::Error);
    let err = run_conversion(&strict, &NoopObserver).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Transform(TransformError::UnrecognizedColumn { .. })
    ));
}

#[test]
fn malformed_template_fails_before_touching_data() {
    let fixture = Fixture::new(DATA.as_bytes());
    fs::write(fixture.path("cp_vorlage.xml"), "<Root><cell></Root>").unwrap();
    let err = run_conversion(&fixture.request(), &NoopObserver).unwrap_err();
    assert!(matches!(err, PipelineError::Template { .. }));
    let bytes = fs::read(fixture.path("plaetze 2024.csv")).unwrap();
    assert!(!bytes.starts_with(&UTF8_BOM));
}

#[test]
fn windows_1252_data_is_transcoded() {
    let fixture = Fixture::new(b"Name;Town\nSeeblick;M\xFCnchen\n");
    let result = run_conversion(&fixture.request(), &NoopObserver).unwrap();
    assert_eq!(
        result.bom,
        Some(BomStatus::Transcoded {
            encoding: "windows-1252"
        })
    );
    let first = read(&result.written[0]);
    assert!(first.contains("<Town>München</Town>"));
}
