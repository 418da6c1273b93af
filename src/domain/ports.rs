use crate::core::report::{ReportLabels, ReportTable};
use crate::domain::model::{LeapYearPolicy, LineItemList, OutputFormat, RawLineItem, Report, RowRejection};
use crate::utils::error::Result;

/// Destination for generated files, addressed by file name.
pub trait Storage {
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    /// CSV file with line items, if any.
    fn input_path(&self) -> Option<&str>;
    /// Line items given directly in the configuration.
    fn inline_items(&self) -> &[RawLineItem];
    fn output_path(&self) -> &str;
    fn file_name(&self) -> &str;
    fn output_formats(&self) -> &[OutputFormat];
    fn policy(&self) -> LeapYearPolicy;
    fn labels(&self) -> ReportLabels;
}

/// Everything produced by pricing one list of rows.
#[derive(Debug)]
pub struct PricingOutcome {
    pub report: Report,
    pub table: ReportTable,
    pub rejected: Vec<RowRejection>,
}

pub trait Pipeline {
    fn extract(&self) -> Result<LineItemList>;
    fn transform(&self, rows: &LineItemList) -> Result<PricingOutcome>;
    /// Writes the outputs and returns their paths.
    fn load(&self, outcome: &PricingOutcome) -> Result<Vec<String>>;
}
