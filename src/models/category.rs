//! Display category of a movement
//!
//! Used only to color report rows.

use ratatui::style::{Color, Style};
use std::fmt;

use super::movement::{Movement, MovementType, StockFlag};

/// How a movement row is highlighted in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayCategory {
    /// Stock entry
    Inflow,
    /// Stock exit
    Outflow,
    /// Neither entry nor exit, and it does not touch fiscal stock
    FiscalStockWarning,
    /// Everything else
    Neutral,
}

impl DisplayCategory {
    /// Classify a movement. First match wins:
    /// entry, exit, missing/`No` fiscal flag, neutral.
    pub fn classify(movement: &Movement) -> Self {
        match (&movement.movement_type, movement.affects_fiscal_stock) {
            (MovementType::Entry, _) => Self::Inflow,
            (MovementType::Exit, _) => Self::Outflow,
            (MovementType::Other(_), None | Some(StockFlag::No)) => Self::FiscalStockWarning,
            (MovementType::Other(_), Some(StockFlag::Yes)) => Self::Neutral,
        }
    }

    /// Row style for the TUI table
    pub fn style(&self) -> Style {
        match self {
            Self::Inflow => Style::default().bg(Color::Blue).fg(Color::White),
            Self::Outflow => Style::default().bg(Color::Yellow).fg(Color::Black),
            Self::FiscalStockWarning => Style::default().bg(Color::Red).fg(Color::White),
            Self::Neutral => Style::default(),
        }
    }

    /// ANSI SGR prefix for stdout rendering, empty for neutral rows
    pub fn ansi_prefix(&self) -> &'static str {
        match self {
            Self::Inflow => "\x1b[44;37m",
            Self::Outflow => "\x1b[43;30m",
            Self::FiscalStockWarning => "\x1b[41;37m",
            Self::Neutral => "",
        }
    }
}

impl fmt::Display for DisplayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inflow => write!(f, "Inflow"),
            Self::Outflow => write!(f, "Outflow"),
            Self::FiscalStockWarning => write!(f, "Fiscal stock warning"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movement(movement_type: MovementType, fiscal: Option<StockFlag>) -> Movement {
        Movement {
            line: 1,
            company_code: Some(1),
            operator_code: Some(1),
            product_id: Some(1),
            entry_date: None,
            quantity: Some(1.0),
            value: None,
            location: String::new(),
            movement_type,
            affects_managerial_stock: None,
            affects_fiscal_stock: fiscal,
            raw: Vec::new(),
        }
    }

    #[test]
    fn test_entry_is_inflow_regardless_of_fiscal_flag() {
        for fiscal in [None, Some(StockFlag::No), Some(StockFlag::Yes)] {
            let m = movement(MovementType::Entry, fiscal);
            assert_eq!(DisplayCategory::classify(&m), DisplayCategory::Inflow);
        }
    }

    #[test]
    fn test_exit_is_outflow_regardless_of_fiscal_flag() {
        for fiscal in [None, Some(StockFlag::No), Some(StockFlag::Yes)] {
            let m = movement(MovementType::Exit, fiscal);
            assert_eq!(DisplayCategory::classify(&m), DisplayCategory::Outflow);
        }
    }

    #[test]
    fn test_other_type_without_fiscal_stock_is_warning() {
        let other = MovementType::Other("T".into());
        assert_eq!(
            DisplayCategory::classify(&movement(other.clone(), None)),
            DisplayCategory::FiscalStockWarning
        );
        assert_eq!(
            DisplayCategory::classify(&movement(other, Some(StockFlag::No))),
            DisplayCategory::FiscalStockWarning
        );
    }

    #[test]
    fn test_other_type_with_fiscal_stock_is_neutral() {
        let m = movement(MovementType::Other(String::new()), Some(StockFlag::Yes));
        assert_eq!(DisplayCategory::classify(&m), DisplayCategory::Neutral);
        assert_eq!(DisplayCategory::Neutral.ansi_prefix(), "");
    }

    #[test]
    fn test_classification_ignores_managerial_flag() {
        let mut m = movement(MovementType::Other("X".into()), Some(StockFlag::Yes));
        m.affects_managerial_stock = Some(StockFlag::No);
        assert_eq!(DisplayCategory::classify(&m), DisplayCategory::Neutral);
    }
}
