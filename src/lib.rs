pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::core::{
    docx::{DocxWriter, DOCX_MIME_TYPE},
    engine::{RunSummary, SpecEngine},
    pipeline::SpecPipeline,
    pricing::{grand_total, price, price_all, total},
    report::{render, LabelPreset, ReportLabels, ReportTable},
    screen::render_screen,
};
pub use domain::model::{
    LeapYearPolicy, LineItem, LineItemList, OutputFormat, PricedLineItem, RawLineItem, Report,
};
pub use domain::ports::{ConfigProvider, Pipeline, PricingOutcome, Storage};
pub use domain::program::Program;
pub use utils::error::{Result, SpecError};
