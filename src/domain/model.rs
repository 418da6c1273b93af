use crate::core::docx::DOCX_MIME_TYPE;
use crate::domain::program::Program;
use crate::utils::error::SpecError;
use crate::utils::format::format_date;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a daily rate is derived from an annual price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum LeapYearPolicy {
    /// Every day costs `annual / 365`, whatever the year.
    Simple,
    /// Each day costs `annual / length_of_its_year`.
    #[default]
    #[serde(alias = "calendar")]
    #[cfg_attr(feature = "cli", value(name = "calendar"))]
    CalendarAccurate,
}

impl fmt::Display for LeapYearPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeapYearPolicy::Simple => f.write_str("simple"),
            LeapYearPolicy::CalendarAccurate => f.write_str("calendar"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Docx,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Docx => DOCX_MIME_TYPE,
            OutputFormat::Csv => "text/csv",
            OutputFormat::Json => "application/json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docx" => Ok(OutputFormat::Docx),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(SpecError::InvalidConfigValueError {
                field: "output_formats".to_string(),
                value: other.to_string(),
                reason: "Supported formats: docx, csv, json".to_string(),
            }),
        }
    }
}

/// One row as typed into the form, before validation.
///
/// `license_count` is kept as text so that a row like `many` or `1.5` is
/// rejected on its own instead of failing the whole file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLineItem {
    pub program: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(deserialize_with = "count_text")]
    pub license_count: String,
    pub annual_price: String,
}

/// Accepts a count written as a number (TOML, CSV) or as a string.
fn count_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct CountText;

    impl Visitor<'_> for CountText {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a license count")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(CountText)
}

impl RawLineItem {
    /// A fresh form row: first catalog program, one license, zero price,
    /// both dates on `today`.
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            program: Program::default().as_str().to_string(),
            start_date: format_date(today),
            end_date: format_date(today),
            license_count: "1".to_string(),
            annual_price: "0,00".to_string(),
        }
    }
}

/// A validated line item. Holds `start_date <= end_date`,
/// `license_count >= 1` and `annual_price > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub program: Program,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub license_count: u32,
    pub annual_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLineItem {
    #[serde(flatten)]
    pub item: LineItem,
    pub per_license_price: Decimal,
    pub total_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub policy: LeapYearPolicy,
    pub rows: Vec<PricedLineItem>,
    pub grand_total: Decimal,
}

impl Report {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A row dropped at the input boundary, with its 1-based position.
#[derive(Debug)]
pub struct RowRejection {
    pub row_number: usize,
    pub error: SpecError,
}

/// Caller-owned list of form rows for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineItemList {
    rows: Vec<RawLineItem>,
}

impl LineItemList {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// The state a new session starts in: a single blank row dated today.
    pub fn with_default_row() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            rows: vec![RawLineItem::blank(today)],
        }
    }

    pub fn from_rows(rows: Vec<RawLineItem>) -> Self {
        Self { rows }
    }

    pub fn push(&mut self, row: RawLineItem) {
        self.rows.push(row);
    }

    pub fn push_default(&mut self) {
        let today = chrono::Local::now().date_naive();
        self.rows.push(RawLineItem::blank(today));
    }

    /// Removes the row at `index`. The last remaining row is never removed,
    /// matching the form, which offers no delete control for it.
    pub fn remove(&mut self, index: usize) -> Option<RawLineItem> {
        if self.rows.len() <= 1 || index >= self.rows.len() {
            return None;
        }
        Some(self.rows.remove(index))
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawLineItem> {
        self.rows.iter()
    }

    pub fn rows(&self) -> &[RawLineItem] {
        &self.rows
    }
}

impl Extend<RawLineItem> for LineItemList {
    fn extend<T: IntoIterator<Item = RawLineItem>>(&mut self, iter: T) {
        self.rows.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(program: &str) -> RawLineItem {
        RawLineItem {
            program: program.to_string(),
            start_date: "01.01.2024".to_string(),
            end_date: "31.12.2024".to_string(),
            license_count: "1".to_string(),
            annual_price: "100".to_string(),
        }
    }

    #[test]
    fn test_blank_row_matches_form_defaults() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let row = RawLineItem::blank(today);
        assert_eq!(row.program, "Case.one");
        assert_eq!(row.start_date, "16.10.2026");
        assert_eq!(row.end_date, "16.10.2026");
        assert_eq!(row.license_count, "1");
        assert_eq!(row.annual_price, "0,00");
    }

    #[test]
    fn test_list_lifecycle() {
        let mut list = LineItemList::with_default_row();
        assert_eq!(list.len(), 1);

        list.push(raw("Doc.one"));
        list.push(raw("Bot.one"));
        assert_eq!(list.len(), 3);

        let removed = list.remove(1).unwrap();
        assert_eq!(removed.program, "Doc.one");
        assert_eq!(list.rows()[1].program, "Bot.one");

        assert!(list.remove(10).is_none());

        list.push_default();
        assert_eq!(list.len(), 3);
        assert_eq!(list.iter().last().unwrap().annual_price, "0,00");

        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_last_row_is_never_removed() {
        let mut list = LineItemList::from_rows(vec![raw("Doc.one")]);
        assert!(list.remove(0).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("DOCX".parse::<OutputFormat>().unwrap(), OutputFormat::Docx);
        assert_eq!(" csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("pdf".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.extension(), "json");
        assert_eq!(
            OutputFormat::Docx.mime_type(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }

    #[test]
    fn test_raw_count_accepts_numbers_and_text() {
        let row: RawLineItem = serde_json::from_str(
            r#"{"program":"Doc.one","start_date":"01.01.2024","end_date":"01.01.2024","license_count":3,"annual_price":"100"}"#,
        )
        .unwrap();
        assert_eq!(row.license_count, "3");

        let row: RawLineItem = serde_json::from_str(
            r#"{"program":"Doc.one","start_date":"01.01.2024","end_date":"01.01.2024","license_count":"many","annual_price":"100"}"#,
        )
        .unwrap();
        assert_eq!(row.license_count, "many");
    }

    #[test]
    fn test_policy_serde_names() {
        let policy: LeapYearPolicy = serde_json::from_str("\"calendar\"").unwrap();
        assert_eq!(policy, LeapYearPolicy::CalendarAccurate);
        let policy: LeapYearPolicy = serde_json::from_str("\"simple\"").unwrap();
        assert_eq!(policy, LeapYearPolicy::Simple);
        assert_eq!(
            serde_json::to_string(&LeapYearPolicy::CalendarAccurate).unwrap(),
            "\"calendar_accurate\""
        );
    }
}
