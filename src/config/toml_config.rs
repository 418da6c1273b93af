use crate::core::docx::DEFAULT_FILE_NAME;
use crate::core::report::{LabelPreset, ReportLabels};
use crate::core::{ConfigProvider, LeapYearPolicy, OutputFormat, RawLineItem};
use crate::utils::error::{Result, SpecError};
use crate::utils::validation::{validate_file_name, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// A pricing job described in TOML:
///
/// ```toml
/// [report]
/// policy = "calendar"
/// labels = "russian"
///
/// [load]
/// output_path = "./output"
/// output_formats = ["docx", "csv"]
///
/// [[items]]
/// program = "Doc.one"
/// start_date = "01.01.2024"
/// end_date = "31.12.2024"
/// license_count = 2
/// annual_price = "36 500,00"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub report: ReportSection,
    pub source: Option<SourceConfig>,
    pub load: LoadConfig,
    #[serde(default)]
    pub items: Vec<RawLineItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default)]
    pub policy: LeapYearPolicy,
    #[serde(default)]
    pub labels: LabelPreset,
    pub heading: Option<String>,
    pub issuer: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// CSV file with additional rows, read before `[[items]]`.
    pub csv_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<OutputFormat>,
}

fn default_output_formats() -> Vec<OutputFormat> {
    vec![OutputFormat::Docx]
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern is valid"))
}

impl TomlConfig {
    /// Loads and parses a job file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SpecError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SpecError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Expands `${VAR}` from the environment; unknown variables are left as is.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("load.output_path", &self.load.output_path)?;
        validate_file_name("report.file_name", self.file_name(), "docx")?;

        if self.load.output_formats.is_empty() {
            return Err(SpecError::InvalidConfigValueError {
                field: "load.output_formats".to_string(),
                value: "[]".to_string(),
                reason: "At least one output format is required".to_string(),
            });
        }

        if let Some(csv_path) = self.csv_path() {
            validate_path("source.csv_path", csv_path)?;
        } else if self.items.is_empty() {
            return Err(SpecError::MissingConfigError {
                field: "[[items]] or source.csv_path".to_string(),
            });
        }

        Ok(())
    }

    pub fn csv_path(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.csv_path.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> Option<&str> {
        self.csv_path()
    }

    fn inline_items(&self) -> &[RawLineItem] {
        &self.items
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn file_name(&self) -> &str {
        self.report.file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME)
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.load.output_formats
    }

    fn policy(&self) -> LeapYearPolicy {
        self.report.policy
    }

    fn labels(&self) -> ReportLabels {
        let mut labels = ReportLabels::for_preset(self.report.labels);
        if let Some(heading) = &self.report.heading {
            labels.heading = heading.clone();
        }
        if let Some(issuer) = &self.report.issuer {
            labels.issuer = issuer.clone();
        }
        labels
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
