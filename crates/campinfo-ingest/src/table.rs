//! In-memory table of string cells.

/// A loaded CSV file: ordered column names and rows of raw cells.
///
/// Every row has exactly `headers.len()` cells; short input rows are padded
/// with empty strings when the table is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at zero-based `index`.
    pub fn record(&self, index: usize) -> Option<Record<'_>> {
        self.rows.get(index).map(|values| Record {
            table: self,
            index,
            values,
        })
    }

    pub fn records(&self) -> impl ExactSizeIterator<Item = Record<'_>> + '_ {
        self.rows.iter().enumerate().map(move |(index, values)| Record {
            table: self,
            index,
            values,
        })
    }
}

/// Borrowed view of one row, addressed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    table: &'a CsvTable,
    index: usize,
    values: &'a [String],
}

impl<'a> Record<'a> {
    /// Zero-based position in the table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// One-based row number, matching output file numbering.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn columns(&self) -> &'a [String] {
        &self.table.headers
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.table.has_column(name)
    }

    /// Cell for `column`, or `None` when the table has no such column.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let index = self.table.column_index(column)?;
        Some(self.values.get(index).map_or("", String::as_str))
    }

    /// Cell for `column`; a missing column reads as an empty string.
    pub fn value(&self, column: &str) -> &'a str {
        self.get(column).unwrap_or("")
    }
}
