use crate::core::{Pipeline, PricingOutcome};
use crate::utils::error::Result;
use std::time::Instant;

/// What one run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub outcome: PricingOutcome,
    pub written: Vec<String>,
}

pub struct SpecEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SpecEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Extract and price without writing anything.
    pub fn preview(&self) -> Result<PricingOutcome> {
        tracing::info!("Reading line items...");
        let rows = self.pipeline.extract()?;
        tracing::info!("Read {} rows", rows.len());

        tracing::info!("Pricing line items...");
        let outcome = self.pipeline.transform(&rows)?;
        tracing::info!(
            "Priced {} items ({} rejected), grand total {}",
            outcome.report.len(),
            outcome.rejected.len(),
            outcome.table.total_amount
        );

        Ok(outcome)
    }

    pub fn run(&self) -> Result<RunSummary> {
        let started = Instant::now();
        let outcome = self.preview()?;

        tracing::info!("Writing outputs...");
        let written = self.pipeline.load(&outcome)?;
        for path in &written {
            tracing::info!("Output saved to: {}", path);
        }

        tracing::debug!("Run finished in {:?}", started.elapsed());
        Ok(RunSummary { outcome, written })
    }
}
