//! Inventory movement model
//!
//! One row of a Kardex report: a stock entry or exit for a product at a
//! store, with the flags telling whether it touches managerial and fiscal
//! stock.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// Direction of an inventory movement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MovementType {
    /// Stock entry (`E`)
    Entry,
    /// Stock exit (`S`)
    Exit,
    /// Any other code found in the source file
    Other(String),
}

impl MovementType {
    /// Parse the source code (`E`/`S`), keeping unknown codes verbatim
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "E" => Self::Entry,
            "S" => Self::Exit,
            other => Self::Other(other.to_string()),
        }
    }

    /// The code as it appears in the source file
    pub fn code(&self) -> &str {
        match self {
            Self::Entry => "E",
            Self::Exit => "S",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => write!(f, "Entry"),
            Self::Exit => write!(f, "Exit"),
            Self::Other(code) if code.is_empty() => write!(f, "-"),
            Self::Other(code) => write!(f, "{}", code),
        }
    }
}

/// Whether a movement affects a stock count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockFlag {
    /// `S` in the source file
    Yes,
    /// `N` in the source file
    No,
}

impl StockFlag {
    /// Parse an `S`/`N` cell; anything else is treated as missing
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "S" => Some(Self::Yes),
            "N" => Some(Self::No),
            _ => None,
        }
    }

    /// Short label for table cells, `-` when missing
    pub fn label(flag: Option<Self>) -> &'static str {
        match flag {
            Some(Self::Yes) => "Yes",
            Some(Self::No) => "No",
            None => "-",
        }
    }
}

/// A single inventory movement
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    /// 1-based data row number in the source file (header excluded)
    pub line: usize,

    /// Store identifier
    pub company_code: Option<i64>,

    /// Code of the operator/process that generated the entry
    pub operator_code: Option<i64>,

    /// Product sequence identifier
    pub product_id: Option<i64>,

    /// Date of the movement
    pub entry_date: Option<NaiveDateTime>,

    /// Quantity moved
    pub quantity: Option<f64>,

    /// Monetary value
    pub value: Option<f64>,

    /// Storage location code
    pub location: String,

    /// Entry, exit or other
    pub movement_type: MovementType,

    /// Affects managerial stock
    pub affects_managerial_stock: Option<StockFlag>,

    /// Affects fiscal stock
    pub affects_fiscal_stock: Option<StockFlag>,

    /// Every original cell of the row, in header order
    pub raw: Vec<String>,
}

impl Movement {
    /// Date portion of the entry date
    pub fn entry_day(&self) -> Option<NaiveDate> {
        self.entry_date.map(|dt| dt.date())
    }

    /// Quantity with missing values counted as zero
    pub fn quantity_or_zero(&self) -> f64 {
        self.quantity.filter(|q| !q.is_nan()).unwrap_or(0.0)
    }

    /// Whether this is a stock entry
    pub fn is_entry(&self) -> bool {
        self.movement_type == MovementType::Entry
    }

    /// Whether this is a stock exit
    pub fn is_exit(&self) -> bool {
        self.movement_type == MovementType::Exit
    }
}

/// Parse a comma-decimal number (`"12,5"` → 12.5)
///
/// Only the simple form is supported: every comma becomes a dot before
/// parsing, so thousands separators are not understood. Returns `None` for
/// anything that does not parse.
pub fn parse_decimal_comma(s: &str) -> Option<f64> {
    let normalized = s.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Parse an integer cell, tolerating a zero fraction such as `"12,0"`
pub fn parse_code(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    parse_decimal_comma(s)
        .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
        .map(|v| v as i64)
}

/// Parse the entry date column
///
/// Accepts `dd/mm/yyyy`, `dd/mm/yyyy HH:MM[:SS]` and ISO `yyyy-mm-dd`
/// (with optional time).
pub fn parse_entry_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let datetime_formats = [
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    let date_formats = ["%d/%m/%Y", "%Y-%m-%d"];
    for format in date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_comma() {
        assert_eq!(parse_decimal_comma("12,5"), Some(12.5));
        assert_eq!(parse_decimal_comma(" 3 "), Some(3.0));
        assert_eq!(parse_decimal_comma("-0,25"), Some(-0.25));
        assert_eq!(parse_decimal_comma("7.75"), Some(7.75));
    }

    #[test]
    fn test_decimal_comma_garbage_is_missing() {
        assert_eq!(parse_decimal_comma("abc"), None);
        assert_eq!(parse_decimal_comma(""), None);
        assert_eq!(parse_decimal_comma("1.234,56"), None);
        assert_eq!(parse_decimal_comma("NaN"), None);
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("101"), Some(101));
        assert_eq!(parse_code(" 7 "), Some(7));
        assert_eq!(parse_code("12,0"), Some(12));
        assert_eq!(parse_code("12,5"), None);
        assert_eq!(parse_code("x"), None);
    }

    #[test]
    fn test_entry_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_entry_date("15/03/2024").unwrap().date(), expected);
        assert_eq!(parse_entry_date("15/03/2024 13:45").unwrap().date(), expected);
        assert_eq!(parse_entry_date("2024-03-15").unwrap().date(), expected);
        assert!(parse_entry_date("31/02/2024").is_none());
        assert!(parse_entry_date("").is_none());
    }

    #[test]
    fn test_movement_type_codes() {
        assert_eq!(MovementType::from_code("E"), MovementType::Entry);
        assert_eq!(MovementType::from_code(" S "), MovementType::Exit);
        assert_eq!(
            MovementType::from_code("T"),
            MovementType::Other("T".to_string())
        );
        assert_eq!(MovementType::Other("T".into()).code(), "T");
    }

    #[test]
    fn test_stock_flag_codes() {
        assert_eq!(StockFlag::from_code("S"), Some(StockFlag::Yes));
        assert_eq!(StockFlag::from_code("N"), Some(StockFlag::No));
        assert_eq!(StockFlag::from_code(""), None);
        assert_eq!(StockFlag::from_code("X"), None);
        assert_eq!(StockFlag::label(None), "-");
    }
}
