//! CSV loading into an immutable dataset
//!
//! The loader reads the whole file in one pass, coerces the typed columns
//! and keeps every original cell. Bad cells become missing values; only a
//! missing required column or unreadable delimited text fails the load.

use std::path::Path;

use std::borrow::Cow;

use csv::{ByteRecord, ReaderBuilder};
use tracing::{debug, info};

use crate::config::{ColumnNames, Settings};
use crate::error::{KardexError, KardexResult};
use crate::models::movement::{parse_code, parse_decimal_comma, parse_entry_date};
use crate::models::{Movement, MovementType, StockFlag};

/// Options controlling how a file is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Source column names
    pub columns: ColumnNames,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            columns: ColumnNames::default(),
        }
    }
}

impl From<&Settings> for LoaderOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            delimiter: settings.delimiter_byte(),
            columns: settings.columns.clone(),
        }
    }
}

/// Counts of cells that could not be coerced during a load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Data rows read
    pub rows: usize,
    /// Quantity cells that did not parse
    pub invalid_quantity: usize,
    /// Value cells that did not parse
    pub invalid_value: usize,
    /// Entry date cells that did not parse
    pub invalid_date: usize,
    /// Company/operator/product cells that did not parse
    pub invalid_code: usize,
    /// Cells that were not valid UTF-8 and were decoded with replacements
    pub lossy_text: usize,
}

impl LoadStats {
    /// Total number of non-blank cells recovered as missing
    pub fn recovered_cells(&self) -> usize {
        self.invalid_quantity + self.invalid_value + self.invalid_date + self.invalid_code
    }
}

/// Positions of the required columns in the header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    company_code: usize,
    operator_code: usize,
    product_id: usize,
    entry_date: usize,
    quantity: usize,
    value: usize,
    location: usize,
    movement_type: usize,
    managerial_stock: usize,
    fiscal_stock: usize,
}

impl ColumnIndex {
    /// Resolve every required column, reporting all absent ones at once
    fn resolve(headers: &[String], names: &ColumnNames) -> KardexResult<Self> {
        let mut missing = Vec::new();
        let mut find = |name: &str| -> usize {
            match headers.iter().position(|h| h == name) {
                Some(idx) => idx,
                None => {
                    missing.push(name.to_string());
                    0
                }
            }
        };

        let index = Self {
            company_code: find(names.company_code.as_str()),
            operator_code: find(names.operator_code.as_str()),
            product_id: find(names.product_id.as_str()),
            entry_date: find(names.entry_date.as_str()),
            quantity: find(names.quantity.as_str()),
            value: find(names.value.as_str()),
            location: find(names.location.as_str()),
            movement_type: find(names.movement_type.as_str()),
            managerial_stock: find(names.managerial_stock.as_str()),
            fiscal_stock: find(names.fiscal_stock.as_str()),
        };

        if missing.is_empty() {
            Ok(index)
        } else {
            Err(KardexError::MissingColumn { columns: missing })
        }
    }
}

/// A loaded Kardex file
///
/// Never mutated after loading; filters produce views over it.
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Vec<String>,
    movements: Vec<Movement>,
    stats: LoadStats,
}

impl Dataset {
    /// Column names in source order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All movements in source order
    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.movements.len()
    }

    /// Whether the file had no data rows
    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    /// Coercion statistics for this load
    pub fn stats(&self) -> LoadStats {
        self.stats
    }
}

/// Parse CSV bytes into a dataset
pub fn load_dataset(bytes: &[u8], options: &LoaderOptions) -> KardexResult<Dataset> {
    // Short rows are padded with missing cells, long rows keep their extras
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let mut stats = LoadStats::default();
    let headers = normalize_headers(reader.byte_headers()?, &mut stats);
    let index = ColumnIndex::resolve(&headers, &options.columns)?;

    let mut movements = Vec::new();
    for (idx, result) in reader.byte_records().enumerate() {
        let record = result?;
        movements.push(parse_record(&record, idx + 1, &index, &mut stats));
    }
    stats.rows = movements.len();

    if stats.recovered_cells() > 0 {
        debug!(
            quantity = stats.invalid_quantity,
            value = stats.invalid_value,
            date = stats.invalid_date,
            code = stats.invalid_code,
            "recovered unparseable cells as missing"
        );
    }
    if stats.lossy_text > 0 {
        debug!(cells = stats.lossy_text, "decoded non-UTF-8 cells with replacements");
    }
    info!(rows = stats.rows, columns = headers.len(), "loaded kardex dataset");

    Ok(Dataset {
        headers,
        movements,
        stats,
    })
}

/// Read a file from disk and parse it
pub fn load_file(path: &Path, options: &LoaderOptions) -> KardexResult<Dataset> {
    let bytes = std::fs::read(path)
        .map_err(|e| KardexError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    load_dataset(&bytes, options)
}

/// Decode a cell as UTF-8, replacing invalid sequences
fn decode_cell<'r>(bytes: &'r [u8], stats: &mut LoadStats) -> Cow<'r, str> {
    let text = String::from_utf8_lossy(bytes);
    if matches!(text, Cow::Owned(_)) {
        stats.lossy_text += 1;
    }
    text
}

/// Trim header names and drop a UTF-8 byte order mark
fn normalize_headers(headers: &ByteRecord, stats: &mut LoadStats) -> Vec<String> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            let text = decode_cell(h, stats);
            let text: &str = if idx == 0 {
                text.trim_start_matches('\u{feff}')
            } else {
                &text
            };
            text.trim().to_string()
        })
        .collect()
}

/// Blank cells are simply missing; only non-blank ones count as unreadable
fn count_unreadable(parsed: bool, text: &str, counter: &mut usize) {
    if !parsed && !text.trim().is_empty() {
        *counter += 1;
    }
}

/// Coerce one record; never fails
fn parse_record(
    record: &ByteRecord,
    line: usize,
    index: &ColumnIndex,
    stats: &mut LoadStats,
) -> Movement {
    let raw: Vec<String> = record
        .iter()
        .map(|bytes| decode_cell(bytes, stats).into_owned())
        .collect();
    let cell = |idx: usize| raw.get(idx).map(String::as_str).unwrap_or("");

    let mut code = |idx: usize| {
        let parsed = parse_code(cell(idx));
        count_unreadable(parsed.is_some(), cell(idx), &mut stats.invalid_code);
        parsed
    };
    let company_code = code(index.company_code);
    let operator_code = code(index.operator_code);
    let product_id = code(index.product_id);

    let entry_date = parse_entry_date(cell(index.entry_date));
    count_unreadable(entry_date.is_some(), cell(index.entry_date), &mut stats.invalid_date);

    let quantity = parse_decimal_comma(cell(index.quantity));
    count_unreadable(quantity.is_some(), cell(index.quantity), &mut stats.invalid_quantity);

    let value = parse_decimal_comma(cell(index.value));
    count_unreadable(value.is_some(), cell(index.value), &mut stats.invalid_value);

    Movement {
        line,
        company_code,
        operator_code,
        product_id,
        entry_date,
        quantity,
        value,
        location: cell(index.location).trim().to_string(),
        movement_type: MovementType::from_code(cell(index.movement_type)),
        affects_managerial_stock: StockFlag::from_code(cell(index.managerial_stock)),
        affects_fiscal_stock: StockFlag::from_code(cell(index.fiscal_stock)),
        raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DisplayCategory;
    use chrono::NaiveDate;

    const HEADER: &str = "NROEMPRESA;CODGERALOPER;SEQPRODUTO;DTAENTRADASAIDA;QTDLANCTO;VALORVLRNF;LOCAL;TIPLANCTO;GERALTERACAOESTQ;GERALTERACAOESTQFISC";

    fn kardex_csv(rows: &[&str]) -> String {
        let mut data = HEADER.to_string();
        for row in rows {
            data.push('\n');
            data.push_str(row);
        }
        data
    }

    #[test]
    fn test_load_typed_columns() {
        let data = kardex_csv(&[
            "1;201;5001;15/01/2024;10,5;100,25;A1;E;S;S",
            "1;202;5001;16/01/2024;4;40;A1;S;S;N",
        ]);
        let dataset = load_dataset(data.as_bytes(), &LoaderOptions::default()).unwrap();

        assert_eq!(dataset.len(), 2);
        let first = &dataset.movements()[0];
        assert_eq!(first.line, 1);
        assert_eq!(first.company_code, Some(1));
        assert_eq!(first.operator_code, Some(201));
        assert_eq!(first.product_id, Some(5001));
        assert_eq!(
            first.entry_day(),
            Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
        assert_eq!(first.quantity, Some(10.5));
        assert_eq!(first.value, Some(100.25));
        assert_eq!(first.location, "A1");
        assert_eq!(first.movement_type, MovementType::Entry);
        assert_eq!(first.affects_fiscal_stock, Some(StockFlag::Yes));

        let second = &dataset.movements()[1];
        assert_eq!(second.movement_type, MovementType::Exit);
        assert_eq!(second.affects_fiscal_stock, Some(StockFlag::No));
    }

    #[test]
    fn test_bad_cells_become_missing() {
        let data = kardex_csv(&["1;201;5001;not a date;abc;;A1;E;;"]);
        let dataset = load_dataset(data.as_bytes(), &LoaderOptions::default()).unwrap();

        let m = &dataset.movements()[0];
        assert_eq!(m.quantity, None);
        assert_eq!(m.value, None);
        assert_eq!(m.entry_date, None);
        assert_eq!(m.affects_managerial_stock, None);
        assert_eq!(m.affects_fiscal_stock, None);

        let stats = dataset.stats();
        assert_eq!(stats.invalid_quantity, 1);
        assert_eq!(stats.invalid_date, 1);
        // blank, not unreadable
        assert_eq!(stats.invalid_value, 0);
        assert_eq!(stats.recovered_cells(), 2);
    }

    #[test]
    fn test_blank_cells_are_not_counted_as_unreadable() {
        let data = kardex_csv(&["1;;5001;;;;A1;E;S;S", "x;1;5001;01/01/2024;1;1;A1;E;S;S"]);
        let dataset = load_dataset(data.as_bytes(), &LoaderOptions::default()).unwrap();

        let stats = dataset.stats();
        assert_eq!(stats.invalid_date, 0);
        assert_eq!(stats.invalid_quantity, 0);
        assert_eq!(stats.invalid_value, 0);
        assert_eq!(stats.invalid_code, 1);
        assert_eq!(stats.recovered_cells(), 1);
    }

    #[test]
    fn test_preserves_row_order_and_raw_cells() {
        let data = kardex_csv(&[
            "2;1;9;01/02/2024;1;1;B;E;S;S",
            "1;1;9;01/01/2024;1;1;A;S;S;S",
        ]);
        let dataset = load_dataset(data.as_bytes(), &LoaderOptions::default()).unwrap();

        let lines: Vec<usize> = dataset.movements().iter().map(|m| m.line).collect();
        assert_eq!(lines, vec![1, 2]);
        assert_eq!(dataset.movements()[0].raw[6], "B");
        assert_eq!(dataset.headers().len(), 10);
        assert_eq!(dataset.headers()[6], "LOCAL");
    }

    #[test]
    fn test_missing_columns_fail_the_load() {
        let data = "NROEMPRESA;SEQPRODUTO\n1;2";
        let err = load_dataset(data.as_bytes(), &LoaderOptions::default()).unwrap_err();

        match err {
            KardexError::MissingColumn { columns } => {
                assert!(columns.contains(&"LOCAL".to_string()));
                assert!(columns.contains(&"QTDLANCTO".to_string()));
                assert!(!columns.contains(&"NROEMPRESA".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_file_fails_with_missing_columns() {
        let err = load_dataset(b"", &LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, KardexError::MissingColumn { .. }));
    }

    #[test]
    fn test_short_rows_are_padded_with_missing_cells() {
        let data = kardex_csv(&[
            "1;1;1;01/01/2024;10;1;A;E;S;S",
            "1;1;1;02/01/2024;4;1;A;S",
            "1;1;1;03/01/2024;2;1;A;T",
        ]);
        let dataset = load_dataset(data.as_bytes(), &LoaderOptions::default()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.movements()[0].affects_fiscal_stock, Some(StockFlag::Yes));

        let short = &dataset.movements()[1];
        assert_eq!(short.movement_type, MovementType::Exit);
        assert_eq!(short.quantity, Some(4.0));
        assert_eq!(short.affects_managerial_stock, None);
        assert_eq!(short.affects_fiscal_stock, None);
        assert_eq!(short.raw.len(), 8);

        let other = &dataset.movements()[2];
        assert_eq!(
            DisplayCategory::classify(other),
            DisplayCategory::FiscalStockWarning
        );
    }

    #[test]
    fn test_non_utf8_cells_still_load() {
        let mut data = kardex_csv(&[]).into_bytes();
        data.extend_from_slice(b"\n1;1;1;01/01/2024;10;1;DEP\xd3SITO;E;S;S");
        data.extend_from_slice(b"\n1;1;1;02/01/2024;4;1;LOJA;S;S;S");
        let dataset = load_dataset(&data, &LoaderOptions::default()).unwrap();

        assert_eq!(dataset.len(), 2);
        let first = &dataset.movements()[0];
        assert!(first.location.starts_with("DEP"));
        assert!(first.location.ends_with("SITO"));
        assert_eq!(first.quantity, Some(10.0));
        assert_eq!(dataset.movements()[1].location, "LOJA");
        assert_eq!(dataset.stats().lossy_text, 1);
        assert_eq!(dataset.stats().recovered_cells(), 0);
    }

    #[test]
    fn test_extra_columns_and_bom() {
        let data = format!("\u{feff}{};OBS\n1;2;3;01/01/2024;1;1;A;E;S;S;note", HEADER);
        let dataset = load_dataset(data.as_bytes(), &LoaderOptions::default()).unwrap();

        assert_eq!(dataset.headers()[0], "NROEMPRESA");
        assert_eq!(dataset.movements()[0].raw[10], "note");
    }

    #[test]
    fn test_custom_delimiter_and_columns() {
        let mut options = LoaderOptions {
            delimiter: b',',
            ..LoaderOptions::default()
        };
        options.columns.location = "DEPOSITO".to_string();

        let data = HEADER.replace(';', ",").replace("LOCAL", "DEPOSITO")
            + "\n1,2,3,01/01/2024,1,1,D9,E,S,S";
        let dataset = load_dataset(data.as_bytes(), &options).unwrap();
        assert_eq!(dataset.movements()[0].location, "D9");
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("kardex.csv");
        std::fs::write(&path, kardex_csv(&["1;2;3;01/01/2024;1;1;A;E;S;S"])).unwrap();

        let dataset = load_file(&path, &LoaderOptions::default()).unwrap();
        assert_eq!(dataset.len(), 1);

        let err = load_file(&dir.path().join("nope.csv"), &LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, KardexError::Io(_)));
    }
}
