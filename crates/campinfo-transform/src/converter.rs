//! Row-to-document conversion.

use std::iter::FusedIterator;
use std::time::Instant;

use campinfo_ingest::{CsvTable, Record};
use campinfo_model::{ConverterOptions, DEFAULT_FOLDER_COLUMN, RuleSet, Strictness};
use campinfo_xml::{Document, Element, Template};
use tracing::{debug_span, trace};

use crate::classify::{Classifier, Companion, Disposition, SkipReason};
use crate::error::{RatingIssue, Result, TransformError};
use crate::observer::{ConversionObserver, NoopObserver};
use crate::paths::PathResolver;
use crate::rating::format_rating;

/// Separator between a label and the value that follows it in mixed text.
///
/// Serialized as `&#x9;`.
pub const TAB_MARKER: char = '\t';

/// Text placed between choices of a multi-choice column.
pub const CHOICE_SEPARATOR: &str = " / ";

/// Suffix of the child element that carries a rating bar image.
pub const GRAPHIC_SUFFIX: &str = "Graphic";

const HREF_ATTRIBUTE: &str = "href";

/// Settings shared by every row of a conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterSettings {
    /// Prefix for image references, usually a `file://` URL.
    pub images_root: String,
    /// Column holding a per-row image subfolder.
    pub folder_column: String,
    pub rules: RuleSet,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            images_root: String::new(),
            folder_column: DEFAULT_FOLDER_COLUMN.to_string(),
            rules: RuleSet::default(),
        }
    }
}

impl ConverterSettings {
    pub fn from_options(options: &ConverterOptions, rules: RuleSet) -> Self {
        Self {
            images_root: options.images_root.as_str().to_string(),
            folder_column: options.folder_column.clone(),
            rules,
        }
    }

    #[must_use]
    pub fn with_images_root(mut self, root: impl Into<String>) -> Self {
        self.images_root = root.into();
        self
    }

    #[must_use]
    pub fn with_folder_column(mut self, column: impl Into<String>) -> Self {
        self.folder_column = column.into();
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }
}

/// Fills a fresh template copy per record.
///
/// The template is never mutated; every document handed out is an
/// independent deep copy.
#[derive(Debug)]
pub struct Converter<O = NoopObserver> {
    template: Template,
    classifier: Classifier,
    resolver: PathResolver,
    observer: O,
}

impl Converter {
    pub fn new(template: Template, settings: ConverterSettings) -> Self {
        let ConverterSettings {
            images_root,
            folder_column,
            rules,
        } = settings;
        Self {
            template,
            classifier: Classifier::new(rules, folder_column),
            resolver: PathResolver::new(images_root),
            observer: NoopObserver,
        }
    }
}

impl<O> Converter<O> {
    pub fn with_observer<P>(self, observer: P) -> Converter<P> {
        Converter {
            template: self.template,
            classifier: self.classifier,
            resolver: self.resolver,
            observer,
        }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }
}

impl<O: ConversionObserver> Converter<O> {
    /// Lazily convert every record of `table`, in row order.
    pub fn documents<'a>(&'a self, table: &'a CsvTable) -> Documents<'a, O> {
        self.observer.conversion_started(table.len());
        Documents {
            converter: self,
            table,
            next: 0,
            started: Instant::now(),
            finished: false,
        }
    }

    /// Convert a single record into a populated template copy.
    pub fn convert_record(&self, record: Record<'_>) -> Result<Document> {
        let row = record.number();
        let _span = debug_span!("row", row).entered();
        let started = Instant::now();
        let rules = self.classifier.rules();

        self.observer
            .row_started(row, record.get(&rules.label_column));
        let folder = record.get(self.classifier.folder_column());
        let mut document = self.template.fresh_copy();

        for column in record.columns() {
            let Some(element) = document.find_mut(column) else {
                let reason = self.classifier.skip_reason(column);
                if reason == SkipReason::Unrecognized && rules.strictness == Strictness::Error {
                    return Err(TransformError::UnrecognizedColumn {
                        row,
                        column: column.clone(),
                    });
                }
                self.observer.column_skipped(row, column, reason);
                continue;
            };

            let disposition = self.classifier.classify(column, record);
            trace!(column = %column, rule = %disposition.kind(), "applying column");
            if let Disposition::MultiChoice { choices: None, .. } = disposition {
                self.observer.missing_companion(row, column, Companion::Value);
            }
            self.apply(element, column, disposition, folder)
                .map_err(|issue| rating_error(row, column, disposition, issue))?;
            self.observer.column_applied(row, column, disposition.kind());
        }

        self.observer.row_finished(row, started.elapsed());
        Ok(document)
    }

    fn apply(
        &self,
        element: &mut Element,
        column: &str,
        disposition: Disposition<'_>,
        folder: Option<&str>,
    ) -> std::result::Result<(), RatingIssue> {
        let rules = self.classifier.rules();
        element.clear();
        match disposition {
            Disposition::Rating { image } => {
                let rating = format_rating(&rules.rating_code, image)?;
                let mut text = String::with_capacity(rating.len() + 1);
                if rules.rating_tab_prefix {
                    text.push(TAB_MARKER);
                }
                text.push_str(&rating);
                element.set_text(text);
                element.prepend_child(
                    Element::new(format!("{column}{GRAPHIC_SUFFIX}"))
                        .with_attribute(HREF_ATTRIBUTE, self.resolver.resolve(image, folder)),
                );
            }
            Disposition::MultiChoice { text, choices } => {
                element.set_text(format!("{text}{TAB_MARKER}"));
                let choices = choices.unwrap_or_default().split('/').map(str::trim);
                for (index, choice) in choices.enumerate() {
                    if index > 0 {
                        element.append_text(CHOICE_SEPARATOR);
                    }
                    if self.classifier.images().is_image(choice) {
                        element.append_child(
                            Element::new(column).with_attribute(
                                HREF_ATTRIBUTE,
                                self.resolver.resolve(choice, folder),
                            ),
                        );
                    } else {
                        element.append_text(choice);
                    }
                }
            }
            Disposition::Nested { text, href } => {
                let mut label = text.to_string();
                if rules.is_sentinel_image(href) {
                    label.push(TAB_MARKER);
                }
                element.set_text(label);
                element.append_child(
                    Element::new(column)
                        .with_attribute(HREF_ATTRIBUTE, self.resolver.resolve(href, folder)),
                );
            }
            Disposition::DirectImage { image } => {
                element.set_attribute(HREF_ATTRIBUTE, self.resolver.resolve(image, folder));
            }
            Disposition::TextWithValue { text, value } => {
                element.set_text(format!("{text}{TAB_MARKER}{value}"));
            }
            Disposition::Text { text } => element.set_text(text),
        }
        Ok(())
    }
}

fn rating_error(
    row: usize,
    column: &str,
    disposition: Disposition<'_>,
    issue: RatingIssue,
) -> TransformError {
    let value = match disposition {
        Disposition::Rating { image } => image,
        _ => "",
    };
    TransformError::RatingFormat {
        row,
        column: column.to_string(),
        value: value.to_string(),
        issue,
    }
}

/// Lazy iterator over the documents of a table, one per record.
///
/// Nothing is converted until the caller pulls the next item; dropping the
/// iterator stops the scan.
#[derive(Debug)]
pub struct Documents<'a, O> {
    converter: &'a Converter<O>,
    table: &'a CsvTable,
    next: usize,
    started: Instant,
    finished: bool,
}

impl<O: ConversionObserver> Iterator for Documents<'_, O> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(record) = self.table.record(self.next) {
            self.next += 1;
            return Some(self.converter.convert_record(record));
        }
        if !self.finished {
            self.finished = true;
            self.converter
                .observer
                .conversion_finished(self.next, self.started.elapsed());
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.table.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<O: ConversionObserver> ExactSizeIterator for Documents<'_, O> {}

impl<O: ConversionObserver> FusedIterator for Documents<'_, O> {}

#[cfg(test)]
mod tests {
    use super::*;
    use campinfo_model::RatingCodeRule;
    use campinfo_xml::to_xml_string;

    fn convert(template: &str, headers: &[&str], row: &[&str]) -> Result<String> {
        convert_with(template, headers, row, ConverterSettings::default())
    }

    fn convert_with(
        template: &str,
        headers: &[&str],
        row: &[&str],
        settings: ConverterSettings,
    ) -> Result<String> {
        let table = CsvTable::new(
            headers.iter().map(|h| (*h).to_string()).collect(),
            vec![row.iter().map(|c| (*c).to_string()).collect()],
        );
        let converter = Converter::new(template.parse().unwrap(), settings);
        let record = table.record(0).unwrap();
        converter
            .convert_record(record)
            .map(|document| to_xml_string(&document).unwrap())
    }

    #[test]
    fn plain_text_column() {
        let xml = convert("<Root><cell><Spalte/></cell></Root>", &["Spalte"], &["Wert"]);
        assert!(xml.unwrap().contains("<Spalte>Wert</Spalte>"));
    }

    #[test]
    fn image_cell_becomes_href_attribute() {
        let xml = convert("<Root><cell><Spalte/></cell></Root>", &["Spalte"], &["Wert.ai"]);
        assert!(xml.unwrap().contains(r#"<Spalte href="Wert.ai"/>"#));
    }

    #[test]
    fn rating_prepends_graphic_and_formats_score() {
        let settings = ConverterSettings::default().with_images_root("file:///Bilder/");
        let xml = convert_with(
            "<Root><RatingAvgSth>5,0</RatingAvgSth></Root>",
            &["RatingAvgSth", "Pfad"],
            &["balken_43.ai", "p1"],
            settings,
        )
        .unwrap();
        assert_eq!(
            xml,
            "<Root><RatingAvgSth><RatingAvgSthGraphic href=\"file:///Bilder/p1/balken_43.ai\"/>\
             &#x9;4,3</RatingAvgSth></Root>"
        );
    }

    #[test]
    fn rating_without_tab_prefix() {
        let mut rules = RuleSet::default().with_rating_tab_prefix(false);
        rules.rating_code = RatingCodeRule::Offset { offset: 7 };
        let settings = ConverterSettings::default().with_rules(rules);
        let xml = convert_with(
            "<Root><RatingAvgSth/></Root>",
            &["RatingAvgSth"],
            &["balken_43.ai"],
            settings,
        )
        .unwrap();
        assert_eq!(
            xml,
            "<Root><RatingAvgSth><RatingAvgSthGraphic href=\"balken_43.ai\"/>4,3</RatingAvgSth></Root>"
        );
    }

    #[test]
    fn malformed_rating_fails_the_row() {
        let err = convert("<Root><RatingAvgSth/></Root>", &["RatingAvgSth"], &["balken_4.ai"])
            .unwrap_err();
        match err {
            TransformError::RatingFormat {
                row, column, value, ..
            } => {
                assert_eq!(row, 1);
                assert_eq!(column, "RatingAvgSth");
                assert_eq!(value, "balken_4.ai");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn multi_choice_mixes_images_and_text() {
        let xml = convert(
            "<Root><SwimmingPoolOutdoor/></Root>",
            &["SwimmingPoolOutdoor", "SwimmingPoolOutdoorValue"],
            &["Pool / Hallenbad", "No.ai / beheizt"],
        )
        .unwrap();
        assert_eq!(
            xml,
            "<Root><SwimmingPoolOutdoor>Pool / Hallenbad&#x9;\
             <SwimmingPoolOutdoor href=\"No.ai\"/> / beheizt</SwimmingPoolOutdoor></Root>"
        );
    }

    #[test]
    fn unrecognized_column_is_skipped_unless_strict() {
        let template = "<Root><Name/></Root>";
        let xml = convert(template, &["Name", "Tippfehler"], &["A", "B"]).unwrap();
        assert_eq!(xml, "<Root><Name>A</Name></Root>");

        let strict = ConverterSettings::default()
            .with_rules(RuleSet::default().with_strictness(Strictness::Error));
        let err = convert_with(template, &["Name", "Tippfehler"], &["A", "B"], strict).unwrap_err();
        assert!(matches!(
            err,
            TransformError::UnrecognizedColumn { row: 1, ref column } if column == "Tippfehler"
        ));
    }

    #[test]
    fn companion_columns_are_never_strict_errors() {
        let strict = ConverterSettings::default()
            .with_rules(RuleSet::default().with_strictness(Strictness::Error));
        let xml = convert_with(
            "<Root><Imbiss/></Root>",
            &["Imbiss", "ImbissValue", "ImbissHref", "Pfad", "Premium"],
            &["Imbiss", "", "", "", "ja"],
            strict,
        )
        .unwrap();
        assert_eq!(xml, "<Root><Imbiss>Imbiss</Imbiss></Root>");
    }
}
