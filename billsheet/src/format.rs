//! Presentation formatting: money, dates, numbers and file names.
//!
//! Computation elsewhere keeps full `f64` precision; rounding to two
//! decimals happens only here.

use chrono::NaiveDate;

/// Symbol used when a currency code is not in the table.
pub const GENERIC_CURRENCY_SIGN: &str = "¤";

/// Placeholder shown in place of a blank invoice number.
pub const DRAFT_NUMBER: &str = "Draft";

const CURRENCY_SYMBOLS: [(&str, &str); 7] = [
    ("USD", "$"),
    ("CAD", "CA$"),
    ("AUD", "A$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("INR", "Rs."),
    ("JPY", "¥"),
];

/// Display symbol for an ISO currency code. Case-insensitive.
pub fn currency_symbol(code: &str) -> &'static str {
    let code = code.trim();
    CURRENCY_SYMBOLS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code))
        .map_or(GENERIC_CURRENCY_SIGN, |(_, symbol)| symbol)
}

/// `"<symbol> <amount to 2dp>"`, e.g. `"CA$ 550.00"`.
pub fn format_money(amount: f64, code: &str) -> String {
    format!("{} {}", currency_symbol(code), format_amount(amount))
}

/// Two-decimal amount with no symbol. Never prints `-0.00`.
pub fn format_amount(amount: f64) -> String {
    let s = format!("{:.2}", amount);
    if s == "-0.00" {
        "0.00".to_string()
    } else {
        s
    }
}

/// Quantities print without a trailing `.0`: `10`, `2.5`.
pub fn format_quantity(qty: f64) -> String {
    qty.to_string()
}

/// Percentage rounded to two decimals with trailing zeros dropped:
/// `10`, `12.5`, `3.33`.
pub fn format_rate(pct: f64) -> String {
    let s = format!("{:.2}", pct);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

/// Parse a `YYYY-MM-DD` date as typed into a form.
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

/// Format ISO input as a display date; anything else passes through
/// trimmed.
pub fn format_date_text(text: &str) -> String {
    match parse_iso_date(text) {
        Some(date) => format_date(date),
        None => text.trim().to_string(),
    }
}

/// `"[from - to]"` label for a service period.
pub fn format_date_range(from: NaiveDate, to: NaiveDate) -> String {
    format!("[{} - {}]", format_date(from), format_date(to))
}

/// Invoice number as printed: prefix plus number, or `Draft` when the
/// number is blank.
pub fn display_number(prefix: &str, number: &str) -> String {
    let number = number.trim();
    if number.is_empty() {
        DRAFT_NUMBER.to_string()
    } else {
        format!("{}{}", prefix.trim(), number)
    }
}

/// `Invoice_<display>.pdf`, with characters that are unsafe in file
/// names replaced by `_`.
pub fn file_name(display: &str) -> String {
    let safe: String = display
        .trim()
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("Invoice_{}.pdf", safe)
}

/// Split free-form multi-line text into trimmed, non-empty lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_currencies() {
        assert_eq!(currency_symbol("CAD"), "CA$");
        assert_eq!(currency_symbol("eur"), "€");
        assert_eq!(currency_symbol("INR"), "Rs.");
        assert_eq!(currency_symbol("XYZ"), "¤");
        assert_eq!(currency_symbol(""), "¤");
    }

    #[test]
    fn money_has_two_decimals() {
        assert_eq!(format_money(550.0, "USD"), "$ 550.00");
        assert_eq!(format_money(0.126, "GBP"), "£ 0.13");
        assert_eq!(format_money(-0.001, "JPY"), "¥ 0.00");
    }

    #[test]
    fn rates_drop_trailing_zeros() {
        assert_eq!(format_rate(10.0), "10");
        assert_eq!(format_rate(12.5), "12.5");
        assert_eq!(format_rate(100.0 / 30.0), "3.33");
        assert_eq!(format_rate(0.0), "0");
    }

    #[test]
    fn quantity_prints_shortest_form() {
        assert_eq!(format_quantity(10.0), "10");
        assert_eq!(format_quantity(2.5), "2.5");
    }

    #[test]
    fn dates_format_as_day_month_year() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_date(d), "07 Mar 2025");
        assert_eq!(format_date_text(" 2025-03-07 "), "07 Mar 2025");
        assert_eq!(format_date_text("next week"), "next week");
    }

    #[test]
    fn date_range_label() {
        let from = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(format_date_range(from, to), "[01 Jan 2025 - 31 Jan 2025]");
    }

    #[test]
    fn blank_number_is_draft() {
        assert_eq!(display_number("INV-", "  "), "Draft");
        assert_eq!(display_number("INV-", "042"), "INV-042");
        assert_eq!(display_number("", "7"), "7");
    }

    #[test]
    fn file_name_replaces_separators() {
        assert_eq!(file_name("INV-042"), "Invoice_INV-042.pdf");
        assert_eq!(file_name("2025/03:1"), "Invoice_2025_03_1.pdf");
        assert_eq!(file_name("Draft"), "Invoice_Draft.pdf");
    }

    #[test]
    fn split_lines_trims_and_drops_blanks() {
        assert_eq!(
            split_lines("  12 Main St \n\n  Springfield\r\n "),
            vec!["12 Main St", "Springfield"]
        );
    }
}
