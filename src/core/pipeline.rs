use crate::core::docx::DocxWriter;
use crate::core::input::{filter_valid, parse_csv};
use crate::core::pricing::price_all;
use crate::core::report::{render, render_csv};
use crate::core::{ConfigProvider, LineItemList, OutputFormat, Pipeline, PricingOutcome, Storage};
use crate::utils::error::{Result, SpecError};
use std::path::Path;

pub struct SpecPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    writer: DocxWriter,
}

impl<S: Storage, C: ConfigProvider> SpecPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            writer: DocxWriter::new(),
        }
    }

    pub fn with_writer(mut self, writer: DocxWriter) -> Self {
        self.writer = writer;
        self
    }

    /// Output file name for `format`, derived from the configured `.docx` name.
    fn output_name(&self, format: OutputFormat) -> String {
        let file_name = self.config.file_name();
        match format {
            OutputFormat::Docx => file_name.to_string(),
            other => {
                let stem = Path::new(file_name)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("specification");
                format!("{}.{}", stem, other.extension())
            }
        }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for SpecPipeline<S, C> {
    fn extract(&self) -> Result<LineItemList> {
        let mut rows = LineItemList::new();

        if let Some(path) = self.config.input_path() {
            tracing::debug!("Reading line items from {}", path);
            let data = std::fs::read(path)?;
            rows.extend(parse_csv(&data)?.iter().cloned());
        }

        rows.extend(self.config.inline_items().iter().cloned());

        if rows.is_empty() {
            return Err(SpecError::MissingConfigError {
                field: "line items (CSV input or [[items]])".to_string(),
            });
        }

        Ok(rows)
    }

    fn transform(&self, rows: &LineItemList) -> Result<PricingOutcome> {
        let (items, rejected) = filter_valid(rows);

        if items.is_empty() {
            return Err(SpecError::NoValidLineItems {
                rejected: rejected.len(),
            });
        }

        let report = price_all(&items, self.config.policy());
        let table = render(&report, &self.config.labels());

        Ok(PricingOutcome {
            report,
            table,
            rejected,
        })
    }

    fn load(&self, outcome: &PricingOutcome) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for format in self.config.output_formats() {
            let data = match format {
                OutputFormat::Docx => self.writer.write(&outcome.table)?,
                OutputFormat::Csv => render_csv(&outcome.table)?,
                OutputFormat::Json => serde_json::to_vec_pretty(&outcome.report)?,
            };

            let name = self.output_name(*format);
            tracing::debug!(
                "Writing {} ({}, {} bytes) to storage",
                name,
                format.mime_type(),
                data.len()
            );
            self.storage.write_file(&name, &data)?;

            written.push(format!("{}/{}", self.config.output_path(), name));
        }

        Ok(written)
    }
}
