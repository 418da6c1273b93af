pub mod docx;
pub mod engine;
pub mod input;
pub mod pipeline;
pub mod pricing;
pub mod report;
pub mod screen;

pub use crate::domain::model::{
    LeapYearPolicy, LineItem, LineItemList, OutputFormat, PricedLineItem, RawLineItem, Report,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, PricingOutcome, Storage};
pub use crate::utils::error::Result;
