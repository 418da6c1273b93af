//! Projection of a priced [`Report`] into a fixed seven-column table.
//!
//! [`ReportTable`] is the only thing the screen and document renderers see,
//! so both show the same cells in the same order.

use crate::domain::model::Report;
use crate::domain::program::Program;
use crate::utils::error::Result;
use crate::utils::format::{format_date, format_money};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const COLUMN_COUNT: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LabelPreset {
    #[default]
    English,
    Russian,
}

/// Every user-visible string of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLabels {
    pub heading: String,
    pub columns: [String; COLUMN_COUNT],
    pub issuer: String,
    /// `{name}` is replaced with the program's catalog name.
    pub program_template: String,
    /// `{start}` and `{end}` are replaced with `DD.MM.YYYY` dates.
    pub period_template: String,
    pub total_label: String,
}

impl ReportLabels {
    pub fn english() -> Self {
        Self {
            heading: "Specification".to_string(),
            columns: [
                "No.".to_string(),
                "Rights holder".to_string(),
                "Computer program, the right to use which is granted to the Licensee".to_string(),
                "Number of licenses".to_string(),
                "Term for which the right is granted".to_string(),
                "Price, RUB".to_string(),
                "Amount, RUB".to_string(),
            ],
            issuer: "JSC \"Pravo.ru\"".to_string(),
            program_template: "Program «{name}»".to_string(),
            period_template: "from {start} to {end}".to_string(),
            total_label: "Grand total of license remuneration".to_string(),
        }
    }

    pub fn russian() -> Self {
        Self {
            heading: "Спецификация".to_string(),
            columns: [
                "№".to_string(),
                "Правообладатель".to_string(),
                "Наименование программы для ЭВМ, право использования которой предоставляется Лицензиату"
                    .to_string(),
                "Кол-во Лицензий*".to_string(),
                "Срок, на который предоставляется право".to_string(),
                "Цена, руб. РФ".to_string(),
                "Сумма, руб. РФ".to_string(),
            ],
            issuer: "АО \"Право.ру\"".to_string(),
            program_template: "Программа для ЭВМ {name}".to_string(),
            period_template: "с {start} по {end}".to_string(),
            total_label: "Итого общий размер лицензионного вознаграждения:".to_string(),
        }
    }

    pub fn for_preset(preset: LabelPreset) -> Self {
        match preset {
            LabelPreset::English => Self::english(),
            LabelPreset::Russian => Self::russian(),
        }
    }

    pub fn program_name(&self, program: Program) -> String {
        self.program_template.replace("{name}", program.as_str())
    }

    pub fn period(&self, start: NaiveDate, end: NaiveDate) -> String {
        self.period_template
            .replace("{start}", &format_date(start))
            .replace("{end}", &format_date(end))
    }
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self::english()
    }
}

/// Rendered report: every cell is final text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    pub heading: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Spans the first `COLUMN_COUNT - 1` columns.
    pub total_label: String,
    /// Sits in the last column.
    pub total_amount: String,
}

impl ReportTable {
    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}

pub fn render(report: &Report, labels: &ReportLabels) -> ReportTable {
    let rows = report
        .rows
        .iter()
        .enumerate()
        .map(|(idx, priced)| {
            let item = &priced.item;
            vec![
                (idx + 1).to_string(),
                labels.issuer.clone(),
                labels.program_name(item.program),
                item.license_count.to_string(),
                labels.period(item.start_date, item.end_date),
                format_money(priced.per_license_price),
                format_money(priced.total_price),
            ]
        })
        .collect();

    ReportTable {
        heading: labels.heading.clone(),
        header: labels.columns.to_vec(),
        rows,
        total_label: labels.total_label.clone(),
        total_amount: format_money(report.grand_total),
    }
}

/// Same cells as the screen and document tables, one CSV record per row.
/// The total row carries its label in the first field and the amount in
/// the last.
pub fn render_csv(table: &ReportTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    let mut total_row = vec![String::new(); table.column_count()];
    if let Some(first) = total_row.first_mut() {
        *first = table.total_label.clone();
    }
    if let Some(last) = total_row.last_mut() {
        *last = table.total_amount.clone();
    }
    writer.write_record(&total_row)?;

    writer.into_inner().map_err(|e| e.into_error().into())
}
