//! End-to-end conversion of tables against templates.

use std::cell::RefCell;
use std::time::Duration;

use campinfo_ingest::{CsvTable, parse_csv_str};
use campinfo_model::{ConverterOptions, ImagesRoot, RuleSet};
use campinfo_transform::{
    Companion, ConversionObserver, Converter, ConverterSettings, RuleKind, SkipReason,
};
use campinfo_xml::{Element, Template, to_xml_string};
use insta::assert_snapshot;

const IMAGES_ROOT: &str = "file:///C:/Bilder/";

fn template(markup: &str) -> Template {
    markup.parse().unwrap()
}

fn table(csv: &str) -> CsvTable {
    parse_csv_str(csv, b';').unwrap()
}

fn convert_first(markup: &str, csv: &str, settings: ConverterSettings) -> String {
    let table = table(csv);
    let converter = Converter::new(template(markup), settings);
    let document = converter.documents(&table).next().unwrap().unwrap();
    to_xml_string(&document).unwrap()
}

#[test]
fn text_column_fills_element() {
    let xml = convert_first(
        "<Root>\n<cell><Spalte /></cell>\n</Root>",
        "Spalte\nWert",
        ConverterSettings::default(),
    );
    assert_snapshot!(xml, @"<Root><cell><Spalte>Wert</Spalte></cell></Root>");
}

#[test]
fn text_and_image_columns_side_by_side() {
    let xml = convert_first(
        "<Root><cell><Spalte /><NochEine /></cell></Root>",
        "Spalte;NochEine\nWert;bild.ai",
        ConverterSettings::default(),
    );
    assert_snapshot!(xml, @r#"<Root><cell><Spalte>Wert</Spalte><NochEine href="bild.ai"/></cell></Root>"#);
}

#[test]
fn nested_companion_value_adds_tab_and_child() {
    let markup = r#"<Root>
  <cell>
    <Lebensmittelversorgung>
      Lebensmittel am Platz
      <Lebensmittelversorgung href="file://Bilder/Yes.ai" />
    </Lebensmittelversorgung>
  </cell>
</Root>"#;
    let xml = convert_first(
        markup,
        "Lebensmittelversorgung;LebensmittelversorgungValue\nLebensmittel am Platz;Yes.ai",
        ConverterSettings::default().with_images_root(IMAGES_ROOT),
    );
    assert_snapshot!(xml, @r#"<Root><cell><Lebensmittelversorgung>Lebensmittel am Platz&#x9;<Lebensmittelversorgung href="file:///C:/Bilder/Yes.ai"/></Lebensmittelversorgung></cell></Root>"#);
}

#[test]
fn href_companion_is_ignored() {
    let xml = convert_first(
        "<Root><Imbiss/></Root>",
        "Imbiss;ImbissValue;ImbissHref\nImbiss am Platz;16 A;x.ai",
        ConverterSettings::default().with_images_root(IMAGES_ROOT),
    );
    assert_snapshot!(xml, @"<Root><Imbiss>Imbiss am Platz&#x9;16 A</Imbiss></Root>");
}

#[test]
fn images_root_with_spaces_is_written_unescaped() {
    let root: ImagesRoot = "file:///C:/Meine Bilder/Plätze/".parse().unwrap();
    let options = ConverterOptions::new("vorlage.xml", "daten.csv", root);
    let xml = convert_first(
        "<Root><Hund/></Root>",
        "Hund;HundValue;Pfad\nHunde erlaubt;hund.png;Seeblick",
        ConverterSettings::from_options(&options, RuleSet::default()),
    );
    assert_snapshot!(xml, @r#"<Root><Hund>Hunde erlaubt<Hund href="file:///C:/Meine Bilder/Plätze/Seeblick/hund.png"/></Hund></Root>"#);
}

#[test]
fn non_sentinel_nested_image_gets_no_tab() {
    let xml = convert_first(
        "<Root><Hund/></Root>",
        "Hund;HundValue;Pfad\nHunde erlaubt;hund.png;platz-7",
        ConverterSettings::default().with_images_root(IMAGES_ROOT),
    );
    assert_snapshot!(xml, @r#"<Root><Hund>Hunde erlaubt<Hund href="file:///C:/Bilder/platz-7/hund.png"/></Hund></Root>"#);
}

#[test]
fn rating_column_with_folder() {
    let xml = convert_first(
        "<Root><RatingAvgSth/><RatingAvgOverall/></Root>",
        "RatingAvgSth;RatingAvgOverall;Pfad\nbalken_43.ai;gesamt_50.ai;platz-7",
        ConverterSettings::default().with_images_root(IMAGES_ROOT),
    );
    assert_snapshot!(xml, @r#"<Root><RatingAvgSth><RatingAvgSthGraphic href="file:///C:/Bilder/platz-7/balken_43.ai"/>&#x9;4,3</RatingAvgSth><RatingAvgOverall href="file:///C:/Bilder/platz-7/gesamt_50.ai"/></Root>"#);
}

#[test]
fn empty_value_cell_adds_no_tab_suffix() {
    let xml = convert_first(
        "<Root><Strom/></Root>",
        "Strom;StromValue\nStrom am Platz;",
        ConverterSettings::default(),
    );
    assert_snapshot!(xml, @"<Root><Strom>Strom am Platz</Strom></Root>");

    let xml = convert_first(
        "<Root><Strom/></Root>",
        "Strom;StromValue\nStrom am Platz;16 A",
        ConverterSettings::default(),
    );
    assert_snapshot!(xml, @"<Root><Strom>Strom am Platz&#x9;16 A</Strom></Root>");
}

#[test]
fn template_content_is_replaced_not_accumulated() {
    let markup = r#"<Root><Ski class="x">Beispiel<Ski href="Yes.ai"/></Ski></Root>"#;
    let xml = convert_first(
        markup,
        "Ski;SkiValue\nSki alpin;Yes.ai/No.ai",
        ConverterSettings::default(),
    );
    assert_snapshot!(xml, @r#"<Root><Ski>Ski alpin&#x9;<Ski href="Yes.ai"/> / <Ski href="No.ai"/></Ski></Root>"#);
}

#[test]
fn documents_are_independent_of_each_other_and_the_template() {
    let table = table("Name\nErster\nZweiter");
    let converter = Converter::new(template("<Root><Name/></Root>"), ConverterSettings::default());
    let before = to_xml_string(converter.template().document()).unwrap();

    let mut documents: Vec<_> = converter
        .documents(&table)
        .collect::<Result<_, _>>()
        .unwrap();
    documents[0]
        .find_mut("Name")
        .unwrap()
        .append_child(Element::new("Extra"));

    assert_eq!(to_xml_string(&documents[1]).unwrap(), "<Root><Name>Zweiter</Name></Root>");
    assert_eq!(to_xml_string(converter.template().document()).unwrap(), before);
}

#[test]
fn reconverting_a_record_is_byte_identical() {
    let table = table(
        "Name;Ski;SkiValue;RatingAvgSth;Pfad\nPlatz;Ski;Yes.ai / Loipe;balken_39.ai;p",
    );
    let converter = Converter::new(
        template("<Root><Name/><Ski/><RatingAvgSth/></Root>"),
        ConverterSettings::default().with_images_root(IMAGES_ROOT),
    );
    let record = table.record(0).unwrap();
    let first = to_xml_string(&converter.convert_record(record).unwrap()).unwrap();
    let second = to_xml_string(&converter.convert_record(record).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[derive(Default)]
struct Recorder {
    events: RefCell<Vec<String>>,
}

impl ConversionObserver for Recorder {
    fn row_started(&self, row: usize, label: Option<&str>) {
        self.events
            .borrow_mut()
            .push(format!("start {row} {}", label.unwrap_or("-")));
    }

    fn column_applied(&self, row: usize, column: &str, rule: RuleKind) {
        self.events
            .borrow_mut()
            .push(format!("apply {row} {column} {rule}"));
    }

    fn column_skipped(&self, row: usize, column: &str, reason: SkipReason) {
        self.events
            .borrow_mut()
            .push(format!("skip {row} {column} {reason}"));
    }

    fn missing_companion(&self, row: usize, column: &str, companion: Companion) {
        self.events
            .borrow_mut()
            .push(format!("missing {row} {column} {}", companion.as_str()));
    }

    fn conversion_finished(&self, rows: usize, _elapsed: Duration) {
        self.events.borrow_mut().push(format!("finished {rows}"));
    }
}

#[test]
fn observer_sees_rows_lazily_and_in_order() {
    let table = table("Name;Restaurant;Unbekannt;Pfad\nA;Essen;x;p\nB;Essen;y;p");
    let recorder = Recorder::default();
    let converter = Converter::new(
        template("<Root><Name/><Restaurant/></Root>"),
        ConverterSettings::default(),
    )
    .with_observer(&recorder);

    let mut documents = converter.documents(&table);
    assert_eq!(documents.len(), 2);
    documents.next().unwrap().unwrap();
    assert_eq!(
        recorder.events.borrow().as_slice(),
        [
            "start 1 A",
            "apply 1 Name text",
            "missing 1 Restaurant value",
            "apply 1 Restaurant multi-choice",
            "skip 1 Unbekannt not found in template",
            "skip 1 Pfad folder column",
        ]
    );

    documents.next().unwrap().unwrap();
    assert!(documents.next().is_none());
    assert!(documents.next().is_none());
    assert_eq!(
        recorder.events.borrow().last().map(String::as_str),
        Some("finished 2")
    );
    assert_eq!(
        recorder
            .events
            .borrow()
            .iter()
            .filter(|event| event.starts_with("finished"))
            .count(),
        1
    );
}
