use crate::core::pricing::round_money;
use crate::utils::error::{Result, SpecError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%d.%m.%Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Renders `1234.5` as `1 234,50`: two decimals, space-grouped thousands,
/// comma as the decimal mark.
pub fn format_money(amount: Decimal) -> String {
    let rounded = round_money(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let digits = format!("{:.2}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!("{}{},{}", sign, group_thousands(whole), fraction)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Accepts `DD.MM.YYYY` (the form's format) and ISO `YYYY-MM-DD`.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT))
        .map_err(|_| SpecError::InvalidDate {
            value: text.to_string(),
        })
}

/// Lenient price parsing for free-text input. Whitespace (including
/// non-breaking and narrow spaces) is dropped and a decimal comma is
/// accepted. Anything unparseable becomes zero.
pub fn parse_money_lenient(text: &str) -> Decimal {
    let normalized: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}' && *c != '\u{202f}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if normalized.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .unwrap_or_else(|_| {
            tracing::debug!("Unparseable price '{}', using 0", text);
            Decimal::ZERO
        })
}
