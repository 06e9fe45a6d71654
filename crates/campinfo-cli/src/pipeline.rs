//! Conversion pipeline: ingest, template, convert, write.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, info_span};

use campinfo_ingest::{BomStatus, CsvTable, IngestError, ensure_utf8_bom, read_csv_table};
use campinfo_model::{ConverterOptions, RuleSet};
use campinfo_output::{OutputError, OutputWriter, destination_dir};
use campinfo_transform::{
    Companion, ConversionObserver, Converter, ConverterSettings, RuleKind, SkipReason,
    TransformError,
};
use campinfo_xml::{Template, TemplateSource, XmlError};

/// Errors that abort a conversion run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("failed to load template {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: XmlError,
    },

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Everything one `convert` run needs.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub options: ConverterOptions,
    pub rules: RuleSet,
    /// Parent of the `xml_<template>_<data>` directory.
    pub output_root: PathBuf,
    /// Convert but do not touch the filesystem.
    pub dry_run: bool,
    /// Rewrite the data file with a UTF-8 BOM when it lacks one.
    pub fix_bom: bool,
}

impl ConvertRequest {
    pub fn new(options: ConverterOptions) -> Self {
        Self {
            options,
            rules: RuleSet::default(),
            output_root: PathBuf::from("."),
            dry_run: false,
            fix_bom: true,
        }
    }

    pub fn destination(&self) -> PathBuf {
        destination_dir(
            &self.output_root,
            &self.options.template_file,
            &self.options.data_file,
        )
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    pub template_file: PathBuf,
    pub data_file: PathBuf,
    pub destination: PathBuf,
    pub dry_run: bool,
    pub bom: Option<BomStatus>,
    pub rows: usize,
    pub columns: usize,
    pub written: Vec<PathBuf>,
    /// How often each rule was applied across all rows.
    pub rule_counts: BTreeMap<RuleKind, usize>,
    /// Columns without a template element that are not known companions.
    pub unrecognized_columns: BTreeSet<String>,
    /// Columns whose rule needed a companion column the table lacks.
    pub missing_companions: BTreeSet<String>,
    pub elapsed: Duration,
}

impl ConvertResult {
    pub fn warning_count(&self) -> usize {
        self.unrecognized_columns.len() + self.missing_companions.len()
    }
}

/// Normalize the data file's encoding (unless disabled) and load the table.
pub fn ingest(request: &ConvertRequest) -> Result<(CsvTable, Option<BomStatus>), PipelineError> {
    let path = &request.options.data_file;
    let bom = if request.fix_bom && !request.dry_run {
        Some(ensure_utf8_bom(path)?)
    } else {
        None
    };
    let started = Instant::now();
    let table = read_csv_table(path, request.options.delimiter)?;
    info!(
        rows = table.len(),
        columns = table.headers.len(),
        elapsed_ms = started.elapsed().as_millis(),
        "imported CSV data"
    );
    Ok((table, bom))
}

pub fn load_template(path: &Path) -> Result<Template, PipelineError> {
    Template::load(TemplateSource::from(path)).map_err(|source| PipelineError::Template {
        path: path.to_path_buf(),
        source,
    })
}

/// Run the whole conversion, reporting progress to `observer`.
pub fn run_conversion<O: ConversionObserver>(
    request: &ConvertRequest,
    observer: &O,
) -> Result<ConvertResult, PipelineError> {
    let options = &request.options;
    let span = info_span!(
        "convert",
        template = %options.template_file.display(),
        data = %options.data_file.display()
    );
    let _guard = span.enter();
    let started = Instant::now();

    let template = load_template(&options.template_file)?;
    let (table, bom) = ingest(request)?;

    let destination = request.destination();
    let mut writer = if request.dry_run {
        info!(destination = %destination.display(), "dry run, no files are written");
        None
    } else {
        Some(OutputWriter::create(&destination)?)
    };

    let tally = Tally::new(observer);
    let settings = ConverterSettings::from_options(options, request.rules.clone());
    let converter = Converter::new(template, settings).with_observer(&tally);
    for document in converter.documents(&table) {
        let document = document?;
        if let Some(writer) = writer.as_mut() {
            writer.write(&document)?;
        }
    }
    debug!(rows = tally.rows.get(), "conversion finished");

    Ok(ConvertResult {
        template_file: options.template_file.clone(),
        data_file: options.data_file.clone(),
        destination,
        dry_run: request.dry_run,
        bom,
        rows: tally.rows.get(),
        columns: table.headers.len(),
        written: writer.map(OutputWriter::into_written).unwrap_or_default(),
        rule_counts: tally.rule_counts.take(),
        unrecognized_columns: tally.unrecognized.take(),
        missing_companions: tally.missing.take(),
        elapsed: started.elapsed(),
    })
}

/// Counts observer events for the summary and forwards them.
struct Tally<'a, O> {
    inner: &'a O,
    rows: Cell<usize>,
    rule_counts: RefCell<BTreeMap<RuleKind, usize>>,
    unrecognized: RefCell<BTreeSet<String>>,
    missing: RefCell<BTreeSet<String>>,
}

impl<'a, O> Tally<'a, O> {
    fn new(inner: &'a O) -> Self {
        Self {
            inner,
            rows: Cell::new(0),
            rule_counts: RefCell::default(),
            unrecognized: RefCell::default(),
            missing: RefCell::default(),
        }
    }
}

impl<O: ConversionObserver> ConversionObserver for Tally<'_, O> {
    fn conversion_started(&self, rows: usize) {
        self.inner.conversion_started(rows);
    }

    fn row_started(&self, row: usize, label: Option<&str>) {
        self.inner.row_started(row, label);
    }

    fn column_applied(&self, row: usize, column: &str, rule: RuleKind) {
        *self.rule_counts.borrow_mut().entry(rule).or_default() += 1;
        self.inner.column_applied(row, column, rule);
    }

    fn column_skipped(&self, row: usize, column: &str, reason: SkipReason) {
        if reason == SkipReason::Unrecognized {
            self.unrecognized.borrow_mut().insert(column.to_string());
        }
        self.inner.column_skipped(row, column, reason);
    }

    fn missing_companion(&self, row: usize, column: &str, companion: Companion) {
        self.missing.borrow_mut().insert(column.to_string());
        self.inner.missing_companion(row, column, companion);
    }

    fn row_finished(&self, row: usize, elapsed: Duration) {
        self.rows.set(self.rows.get() + 1);
        self.inner.row_finished(row, elapsed);
    }

    fn conversion_finished(&self, rows: usize, elapsed: Duration) {
        self.inner.conversion_finished(rows, elapsed);
    }
}
