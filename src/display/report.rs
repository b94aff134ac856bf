//! Report formatting utilities for terminal output
//!
//! Provides formatting helpers shared by the stdout report and the TUI.

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_RED: &str = "\x1b[31m";
const ANSI_BLUE: &str = "\x1b[34m";

/// Format a number with a fixed number of decimals
pub fn format_fixed(value: f64, places: usize) -> String {
    format!("{:.*}", places, value)
}

/// Format an optional number, `-` when missing
pub fn format_optional(value: Option<f64>, places: usize) -> String {
    match value {
        Some(v) => format_fixed(v, places),
        None => "-".to_string(),
    }
}

/// Format an optional integer code, `-` when missing
pub fn format_code(code: Option<i64>) -> String {
    code.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Wrap text in an ANSI style when color output is enabled
pub fn colorize(text: &str, ansi_prefix: &str, enabled: bool) -> String {
    if enabled && !ansi_prefix.is_empty() {
        format!("{}{}{}", ansi_prefix, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

/// ANSI color of a balance: red when negative, blue otherwise
pub fn balance_ansi(balance: f64) -> &'static str {
    if balance < 0.0 {
        ANSI_RED
    } else {
        ANSI_BLUE
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format a double separator line
pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}

/// Truncate a string to a maximum number of characters with an ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len == 0 {
        String::new()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(10.0, 3), "10.000");
        assert_eq!(format_fixed(-0.5, 3), "-0.500");
        assert_eq!(format_optional(None, 3), "-");
        assert_eq!(format_code(Some(7)), "7");
        assert_eq!(format_code(None), "-");
    }

    #[test]
    fn test_format_bar() {
        let bar = format_bar(50.0, 100.0, 10);
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 5);
        assert_eq!(bar.chars().count(), 10);

        let empty = format_bar(0.0, 0.0, 4);
        assert_eq!(empty.chars().filter(|c| *c == '█').count(), 0);
    }

    #[test]
    fn test_colorize() {
        assert_eq!(colorize("x", "\x1b[41m", false), "x");
        assert_eq!(colorize("x", "", true), "x");
        assert_eq!(colorize("x", "\x1b[41m", true), "\x1b[41mx\x1b[0m");
    }

    #[test]
    fn test_balance_color() {
        assert_eq!(balance_ansi(-1.0), ANSI_RED);
        assert_eq!(balance_ansi(0.0), ANSI_BLUE);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 5), "Hell…");
        assert_eq!(truncate("Hi", 5), "Hi");
        assert_eq!(truncate("Depósito", 8), "Depósito");
    }
}
