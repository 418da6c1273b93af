use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpecError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid period: start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Annual price must be greater than zero, got {value}")]
    NonPositivePrice { value: Decimal },

    #[error("Annual price {value} exceeds the maximum of {max}")]
    PriceOutOfRange { value: Decimal, max: i64 },

    #[error("License count must be at least 1, got {value}")]
    NonPositiveCount { value: i64 },

    #[error("License count '{value}' is not a whole number")]
    InvalidCount { value: String },

    #[error("License count {value} exceeds the maximum of {max}")]
    CountOutOfRange { value: i64, max: u32 },

    #[error("Unknown program '{name}'")]
    UnknownProgram { name: String },

    #[error("Invalid date '{value}': expected DD.MM.YYYY or YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("No valid line items to price ({rejected} rows rejected)")]
    NoValidLineItems { rejected: usize },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Io,
    Encoding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SpecError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SpecError::InvalidRange { .. }
            | SpecError::NonPositivePrice { .. }
            | SpecError::PriceOutOfRange { .. }
            | SpecError::NonPositiveCount { .. }
            | SpecError::InvalidCount { .. }
            | SpecError::CountOutOfRange { .. }
            | SpecError::UnknownProgram { .. }
            | SpecError::InvalidDate { .. }
            | SpecError::NoValidLineItems { .. }
            | SpecError::CsvError(_) => ErrorCategory::Input,
            SpecError::ConfigValidationError { .. }
            | SpecError::InvalidConfigValueError { .. }
            | SpecError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SpecError::IoError(_) => ErrorCategory::Io,
            SpecError::ZipError(_) | SpecError::SerializationError(_) => ErrorCategory::Encoding,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Row-level problems only drop the row.
            SpecError::InvalidRange { .. }
            | SpecError::NonPositivePrice { .. }
            | SpecError::PriceOutOfRange { .. }
            | SpecError::NonPositiveCount { .. }
            | SpecError::InvalidCount { .. }
            | SpecError::CountOutOfRange { .. }
            | SpecError::UnknownProgram { .. }
            | SpecError::InvalidDate { .. } => ErrorSeverity::Low,
            SpecError::NoValidLineItems { .. } => ErrorSeverity::Medium,
            SpecError::CsvError(_)
            | SpecError::ConfigValidationError { .. }
            | SpecError::InvalidConfigValueError { .. }
            | SpecError::MissingConfigError { .. } => ErrorSeverity::High,
            SpecError::IoError(_) | SpecError::ZipError(_) | SpecError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SpecError::InvalidRange { .. } => "Make sure the license start date is not after the end date",
            SpecError::NonPositivePrice { .. } => {
                "Enter an annual price greater than zero, e.g. 36500 or 36 500,00"
            }
            SpecError::PriceOutOfRange { .. } => "Enter the annual price of a single license",
            SpecError::NonPositiveCount { .. } | SpecError::InvalidCount { .. } => {
                "Enter a license count of 1 or more"
            }
            SpecError::CountOutOfRange { .. } => "Split the order into several rows",
            SpecError::UnknownProgram { .. } => {
                "Use one of the catalog program names (see `Program::ALL`)"
            }
            SpecError::InvalidDate { .. } => "Write dates as DD.MM.YYYY, e.g. 01.01.2024",
            SpecError::NoValidLineItems { .. } => {
                "Check the input rows; every row was rejected during validation"
            }
            SpecError::CsvError(_) => {
                "Check the CSV header: program,start_date,end_date,license_count,annual_price"
            }
            SpecError::ConfigValidationError { .. }
            | SpecError::InvalidConfigValueError { .. }
            | SpecError::MissingConfigError { .. } => "Fix the configuration and run again",
            SpecError::IoError(_) => "Check that the paths exist and are writable",
            SpecError::ZipError(_) | SpecError::SerializationError(_) => {
                "This is unexpected; rerun with --verbose and report the log"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Input problem: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Io => format!("File system problem: {}", self),
            ErrorCategory::Encoding => format!("Could not build the output: {}", self),
        }
    }

    /// Process exit code for the binaries.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, SpecError>;
