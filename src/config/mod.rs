pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::report::{LabelPreset, ReportLabels};
#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, LeapYearPolicy, OutputFormat, RawLineItem};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_file_name, validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "license-spec")]
#[command(about = "Prices software license line items and exports the specification")]
pub struct CliConfig {
    /// CSV file: program,start_date,end_date,license_count,annual_price
    #[arg(short, long)]
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = crate::core::docx::DEFAULT_FILE_NAME)]
    pub file_name: String,

    #[arg(long, value_enum, default_value_t = LeapYearPolicy::CalendarAccurate)]
    pub policy: LeapYearPolicy,

    #[arg(long, value_enum, default_value_t = LabelPreset::English)]
    pub labels: LabelPreset,

    #[arg(long, value_enum, value_delimiter = ',', default_value = "docx")]
    pub format: Vec<OutputFormat>,

    /// Print the table without writing any files
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> Option<&str> {
        Some(&self.input)
    }

    fn inline_items(&self) -> &[RawLineItem] {
        &[]
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.format
    }

    fn policy(&self) -> LeapYearPolicy {
        self.policy
    }

    fn labels(&self) -> ReportLabels {
        ReportLabels::for_preset(self.labels)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_path("output_path", &self.output_path)?;
        validate_file_name("file_name", &self.file_name, "docx")?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let config = CliConfig::parse_from(["license-spec", "--input", "items.csv"]);

        assert_eq!(config.input, "items.csv");
        assert_eq!(config.output_path, "./output");
        assert_eq!(config.file_name, "specification.docx");
        assert_eq!(config.policy, LeapYearPolicy::CalendarAccurate);
        assert_eq!(config.labels, LabelPreset::English);
        assert_eq!(config.format, vec![OutputFormat::Docx]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_overrides() {
        let config = CliConfig::parse_from([
            "license-spec",
            "-i",
            "items.csv",
            "--policy",
            "simple",
            "--labels",
            "russian",
            "--format",
            "docx,csv,json",
            "--file-name",
            "spec.docx",
        ]);

        assert_eq!(config.policy, LeapYearPolicy::Simple);
        assert_eq!(config.labels().heading, "Спецификация");
        assert_eq!(
            config.format,
            vec![OutputFormat::Docx, OutputFormat::Csv, OutputFormat::Json]
        );
        assert_eq!(config.file_name(), "spec.docx");
    }

    #[test]
    fn test_policy_value_name() {
        let config =
            CliConfig::parse_from(["license-spec", "-i", "a.csv", "--policy", "calendar"]);
        assert_eq!(config.policy, LeapYearPolicy::CalendarAccurate);
    }

    #[test]
    fn test_validate_rejects_bad_file_name() {
        let config = CliConfig::parse_from([
            "license-spec",
            "-i",
            "items.csv",
            "--file-name",
            "spec.pdf",
        ]);
        assert!(config.validate().is_err());
    }
}
