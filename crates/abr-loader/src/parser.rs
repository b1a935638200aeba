//! Generic registry file parser.
//!
//! Reads a comma-separated master file row by row, folds the width of the
//! columns that hold codes and romanized text, and hands each row to the
//! tier's record constructor.

use std::fs::File;
use std::io::{BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use abr_types::{ensure_unique_keys, Keyed, MasterResult};
use chrono::NaiveDate;
use csv::{Reader, ReaderBuilder, StringRecord};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::types::{AbrError, AbrResult, LoaderConfig, ParseStats};

/// How the text of a column is taken from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// As written.
    Verbatim,
    /// NFKC-normalized, so full-width digits and Latin letters become ASCII.
    Nfkc,
}

/// One column of a tier's file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Header name of the column.
    pub name: &'static str,
    /// How its cells are read.
    pub width: Width,
    /// A mandatory column keeps blank cells as empty text instead of `None`.
    pub required: bool,
}

impl Column {
    /// A column read as written.
    pub const fn verbatim(name: &'static str) -> Self {
        Self {
            name,
            width: Width::Verbatim,
            required: false,
        }
    }

    /// A column whose cells are NFKC-normalized.
    pub const fn nfkc(name: &'static str) -> Self {
        Self {
            name,
            width: Width::Nfkc,
            required: false,
        }
    }

    /// Marks the column mandatory, so the record's own grammar decides
    /// whether an empty cell is acceptable.
    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }
}

/// Trait for master records that can be read from a registry file.
pub trait AbrRecord: Keyed + Sized + Send {
    /// Tier name used in logs and cancellation errors.
    const TIER: &'static str;

    /// The tier's columns, in file order.
    const COLUMNS: &'static [Column];

    /// Builds a record from one row.
    fn from_row(row: &Row) -> AbrResult<Self>;
}

/// One data row. Blank cells of optional columns are already `None`.
#[derive(Debug, Clone)]
pub struct Row {
    line: u64,
    cells: Vec<Option<String>>,
    columns: &'static [Column],
}

impl Row {
    /// Reads `record` against a column layout.
    pub fn new(record: &StringRecord, line: u64, columns: &'static [Column]) -> AbrResult<Self> {
        if let Some(column) = columns.get(record.len()) {
            return Err(AbrError::MissingColumn {
                column: column.name.to_string(),
            });
        }

        let cells = columns
            .iter()
            .zip(record.iter())
            .map(|(column, raw)| {
                if column.required {
                    Some(parse::text(raw, column.width))
                } else {
                    parse::cell(raw, column.width)
                }
            })
            .collect();

        Ok(Self {
            line,
            cells,
            columns,
        })
    }

    /// 1-based line number of the row in its file.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// The cell at `index`, or `None` when an optional cell was blank.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|cell| cell.as_deref())
    }

    /// An optional date cell.
    pub fn date(&self, index: usize) -> AbrResult<Option<NaiveDate>> {
        self.get(index)
            .map(|value| parse::date(value, self.column(index), self.line))
            .transpose()
    }

    /// A mandatory date cell. A blank cell is an invalid date.
    pub fn required_date(&self, index: usize) -> AbrResult<NaiveDate> {
        parse::date(self.get(index).unwrap_or_default(), self.column(index), self.line)
    }

    /// Runs a builder chain over the row, tagging its failure with the line.
    pub fn build<T>(&self, f: impl FnOnce(&Self) -> MasterResult<T>) -> AbrResult<T> {
        f(self).map_err(|source| AbrError::master(self.line, source))
    }

    fn column(&self, index: usize) -> &'static str {
        self.columns.get(index).map_or("", |column| column.name)
    }
}

/// The records of one file with its statistics.
#[derive(Debug, Clone)]
pub struct Parsed<T> {
    /// Records in file order.
    pub records: Vec<T>,
    /// Counters for the file.
    pub stats: ParseStats,
}

/// A streaming parser for registry files.
///
/// Iterating yields the raw rows; [`AbrParser::parse_all`] builds and checks
/// the records of the whole file.
pub struct AbrParser<R: Read, T: AbrRecord> {
    reader: Reader<R>,
    config: LoaderConfig,
    stats: ParseStats,
    _marker: PhantomData<T>,
}

impl<T: AbrRecord> AbrParser<BufReader<File>, T> {
    /// Creates a new parser from a file path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or has invalid headers.
    pub fn from_path<P: AsRef<Path>>(path: P, config: LoaderConfig) -> AbrResult<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(AbrError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), config)
    }
}

impl<R: Read, T: AbrRecord> AbrParser<R, T> {
    /// Creates a new parser from a reader.
    pub fn from_reader(reader: R, config: LoaderConfig) -> AbrResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::None)
            .from_reader(reader);

        Self::validate_headers(&mut csv_reader, config.strict_headers)?;

        Ok(Self {
            reader: csv_reader,
            config,
            stats: ParseStats::default(),
            _marker: PhantomData,
        })
    }

    /// Checks the header row against the tier's layout.
    fn validate_headers(reader: &mut Reader<R>, strict: bool) -> AbrResult<()> {
        let headers = reader.headers()?;
        let expected = T::COLUMNS;

        if headers.len() != expected.len() {
            return Err(AbrError::InvalidHeader {
                expected: expected.len(),
                found: headers.len(),
            });
        }

        if !strict {
            return Ok(());
        }

        for (i, (column, found)) in expected.iter().zip(headers.iter()).enumerate() {
            // Handle UTF-8 BOM at start of file
            let found = found.trim_start_matches('\u{feff}').trim();
            if found != column.name {
                return Err(AbrError::UnexpectedColumn {
                    position: i,
                    expected: column.name.to_string(),
                    found: found.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Returns the number of data rows read so far.
    pub fn records_read(&self) -> usize {
        self.stats.rows_read
    }

    /// Returns the parser configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Reads and builds every record, then checks key uniqueness.
    pub fn parse_all(self) -> AbrResult<Parsed<T>> {
        self.parse_all_cancellable(&AtomicBool::new(false))
    }

    /// As [`parse_all`](Self::parse_all), giving up with
    /// [`AbrError::Cancelled`] as soon as `cancel` is raised.
    ///
    /// Rows are read in order. They are then built on the rayon pool when
    /// the configuration allows it, and the first failing row in file order
    /// is reported.
    pub fn parse_all_cancellable(mut self, cancel: &AtomicBool) -> AbrResult<Parsed<T>> {
        let started = Instant::now();

        let mut rows = Vec::new();
        for row in self.by_ref() {
            if cancel.load(Ordering::Relaxed) {
                return Err(AbrError::Cancelled { tier: T::TIER });
            }
            rows.push(row?);
        }

        let records = build_rows::<T>(&rows, self.config.parallel, cancel)?;
        check_unique_keys(&records, &rows)?;

        let mut stats = std::mem::take(&mut self.stats);
        stats.parse_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        Ok(Parsed { records, stats })
    }
}

impl<R: Read, T: AbrRecord> Iterator for AbrParser<R, T> {
    type Item = AbrResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut record = StringRecord::new();
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    self.stats.rows_read += 1;

                    // Skip rows with no content
                    if record.iter().all(|f| f.trim().is_empty()) {
                        self.stats.blank_rows += 1;
                        continue;
                    }

                    let line = record.position().map_or(0, |p| p.line());
                    return Some(Row::new(&record, line, T::COLUMNS));
                }
                Ok(false) => return None, // End of file
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Opens `path` and parses every record of tier `T`.
pub fn parse_file<T: AbrRecord, P: AsRef<Path>>(
    path: P,
    config: &LoaderConfig,
) -> AbrResult<Parsed<T>> {
    parse_file_cancellable(path, config, &AtomicBool::new(false))
}

pub(crate) fn parse_file_cancellable<T: AbrRecord, P: AsRef<Path>>(
    path: P,
    config: &LoaderConfig,
    cancel: &AtomicBool,
) -> AbrResult<Parsed<T>> {
    let path = path.as_ref();
    tracing::debug!(tier = T::TIER, path = %path.display(), "opening registry file");

    let parsed = AbrParser::<_, T>::from_path(path, config.clone())?.parse_all_cancellable(cancel)?;

    tracing::info!(
        tier = T::TIER,
        records = parsed.records.len(),
        elapsed_ms = parsed.stats.parse_time_ms,
        "parsed {} rows",
        parsed.stats.rows_read
    );
    Ok(parsed)
}

fn build_rows<T: AbrRecord>(
    rows: &[Row],
    parallel: bool,
    cancel: &AtomicBool,
) -> AbrResult<Vec<T>> {
    let build = |row: &Row| {
        if cancel.load(Ordering::Relaxed) {
            return Err(AbrError::Cancelled { tier: T::TIER });
        }
        T::from_row(row)
    };

    #[cfg(feature = "parallel")]
    {
        if parallel {
            let results: Vec<AbrResult<T>> = rows.par_iter().map(&build).collect();
            return results.into_iter().collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    rows.iter().map(&build).collect()
}

/// Runs the collection check, naming the line of the second occurrence.
fn check_unique_keys<T: AbrRecord>(records: &[T], rows: &[Row]) -> AbrResult<()> {
    ensure_unique_keys(records).map_err(|source| {
        let line = records
            .iter()
            .zip(rows)
            .filter(|(record, _)| record.key() == source.key())
            .nth(1)
            .map_or(0, |(_, row)| row.line());
        AbrError::master(line, source)
    })
}

/// Helper functions for reading cell values.
pub mod parse {
    use chrono::NaiveDate;
    use unicode_normalization::UnicodeNormalization;

    use super::Width;
    use crate::types::{AbrError, AbrResult};

    /// Date format of the `efct_date` and `ablt_date` columns.
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Reads one cell. Empty and whitespace-only cells are `None`.
    pub fn cell(raw: &str, width: Width) -> Option<String> {
        if raw.trim().is_empty() {
            return None;
        }
        Some(text(raw, width))
    }

    /// Reads one cell of a mandatory column, keeping blank text as it is.
    pub fn text(raw: &str, width: Width) -> String {
        match width {
            Width::Verbatim => raw.to_string(),
            Width::Nfkc => nfkc(raw),
        }
    }

    /// NFKC-normalizes a value.
    pub fn nfkc(value: &str) -> String {
        value.nfkc().collect()
    }

    /// Parses a `YYYY-MM-DD` calendar date.
    pub fn date(value: &str, column: &'static str, line: u64) -> AbrResult<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| AbrError::InvalidDate {
            column,
            line,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abr_types::{MasterError, PrefectureRecord};

    const HEADER: &str = "lg_code,pref,pref_kana,pref_roma,efct_date,ablt_date,remarks\n";

    fn parser(body: &str, config: LoaderConfig) -> AbrResult<AbrParser<&[u8], PrefectureRecord>> {
        AbrParser::from_reader(body.as_bytes(), config)
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse::cell("", Width::Verbatim), None);
        assert_eq!(parse::cell("  \u{3000}", Width::Verbatim), None);
        assert_eq!(parse::cell("北海道", Width::Verbatim).as_deref(), Some("北海道"));
        assert_eq!(parse::cell("０１１００２", Width::Nfkc).as_deref(), Some("011002"));
        assert_eq!(parse::cell("０１１００２", Width::Verbatim).as_deref(), Some("０１１００２"));
        assert_eq!(parse::text("", Width::Verbatim), "");
        assert_eq!(parse::text("　", Width::Nfkc), " ");
    }

    #[test]
    fn test_parse_nfkc_folds_full_width_latin() {
        assert_eq!(parse::nfkc("Ｓａｐｐｏｒｏ－ｓｈｉ"), "Sapporo-shi");
        assert_eq!(parse::nfkc("Hokkaido"), "Hokkaido");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse::date("2020-04-01", "efct_date", 2).unwrap(),
            NaiveDate::from_ymd_opt(2020, 4, 1).unwrap()
        );
        assert!(parse::date("2020/04/01", "efct_date", 2).is_err());
        assert!(parse::date("2020-13-01", "efct_date", 2).is_err());

        let err = parse::date("", "ablt_date", 9).unwrap_err();
        assert!(matches!(
            err,
            AbrError::InvalidDate {
                column: "ablt_date",
                line: 9,
                ..
            }
        ));
    }

    #[test]
    fn test_header_count_is_checked() {
        let err = parser("lg_code,pref\n", LoaderConfig::default()).err().unwrap();
        assert!(matches!(err, AbrError::InvalidHeader { expected: 7, found: 2 }));

        let err = parser("", LoaderConfig::default()).err().unwrap();
        assert!(matches!(err, AbrError::InvalidHeader { expected: 7, found: 0 }));
    }

    #[test]
    fn test_header_names_only_checked_when_strict() {
        let body = "a,b,c,d,e,f,g\n";
        assert!(parser(body, LoaderConfig::default()).is_ok());

        let err = parser(body, LoaderConfig::strict()).err().unwrap();
        match err {
            AbrError::UnexpectedColumn {
                position,
                expected,
                found,
            } => {
                assert_eq!(position, 0);
                assert_eq!(expected, "lg_code");
                assert_eq!(found, "a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_strict_header_tolerates_bom() {
        let body = format!("\u{feff}{HEADER}");
        assert!(parser(&body, LoaderConfig::strict()).is_ok());
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let body = format!("{HEADER},,,,,,\n011002,北海道,,,,,\n");
        let parsed = parser(&body, LoaderConfig::default()).unwrap().parse_all().unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.stats.rows_read, 2);
        assert_eq!(parsed.stats.blank_rows, 1);
        assert_eq!(parsed.stats.records(), 1);
    }

    #[test]
    fn test_rows_carry_file_line() {
        let body = format!("{HEADER}011002,北海道,,,,,\n020001,青森県,,,,,\n");
        let rows: Vec<Row> = parser(&body, LoaderConfig::default())
            .unwrap()
            .collect::<AbrResult<_>>()
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line(), 2);
        assert_eq!(rows[1].line(), 3);
        assert_eq!(rows[1].get(1), Some("青森県"));
        assert_eq!(rows[1].get(2), None);
    }

    #[test]
    fn test_first_failing_row_in_file_order_is_reported() {
        let body = format!(
            "{HEADER}011002,北海道,,,,,\n02000,青森県,,,,,\n0300070,岩手県,,,,,\n"
        );
        for parallel in [false, true] {
            let config = LoaderConfig {
                parallel,
                ..LoaderConfig::default()
            };
            let err = parser(&body, config).unwrap().parse_all().unwrap_err();
            match err {
                AbrError::Master { line, source } => {
                    assert_eq!(line, 3);
                    assert!(matches!(source, MasterError::Length { field: "lg_code", .. }));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_duplicate_key_names_second_line() {
        let body = format!("{HEADER}011002,北海道,,,,,\n020001,青森県,,,,,\n011002,北海道,,,,,\n");
        let err = parser(&body, LoaderConfig::default()).unwrap().parse_all().unwrap_err();
        match err {
            AbrError::Master { line, source } => {
                assert_eq!(line, 4);
                assert_eq!(source, MasterError::DuplicateKey { key: "011002".to_string() });
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_raised_cancel_flag_stops_parse() {
        let body = format!("{HEADER}011002,北海道,,,,,\n");
        let cancel = AtomicBool::new(true);
        let err = parser(&body, LoaderConfig::default())
            .unwrap()
            .parse_all_cancellable(&cancel)
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_ragged_row_is_a_csv_error() {
        let body = format!("{HEADER}011002,北海道\n");
        let err = parser(&body, LoaderConfig::default()).unwrap().parse_all().unwrap_err();
        assert!(matches!(err, AbrError::Csv(_)));
    }

    #[test]
    fn test_required_column_keeps_blank_text() {
        let body = format!("{HEADER}011011,,,,,,\n020001, ,,,,,\n");
        let parsed = parser(&body, LoaderConfig::default()).unwrap().parse_all().unwrap();
        let names: Vec<&str> = parsed.records.iter().map(|p| p.pref()).collect();
        assert_eq!(names, vec!["", " "]);
        assert_eq!(parsed.records[0].pref_kana(), None);

        let record = StringRecord::from(vec!["011011", "", "", "", "", "", ""]);
        let row = Row::new(&record, 2, PrefectureRecord::COLUMNS).unwrap();
        assert_eq!(row.get(1), Some(""));
        assert_eq!(row.get(2), None);
    }

    #[test]
    fn test_short_record_is_missing_column() {
        let record = StringRecord::from(vec!["011002", "北海道"]);
        let err = Row::new(&record, 2, PrefectureRecord::COLUMNS).unwrap_err();
        assert!(matches!(err, AbrError::MissingColumn { ref column } if column == "pref_kana"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = AbrParser::<_, PrefectureRecord>::from_path(
            "/nonexistent/mt_pref_all.csv",
            LoaderConfig::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, AbrError::FileNotFound { .. }));
    }
}
