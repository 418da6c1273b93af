use clap::Parser;
use license_spec::utils::{logger, validation::Validate};
use license_spec::{render_screen, CliConfig, LocalStorage, SpecEngine, SpecPipeline};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("Starting license-spec");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let dry_run = config.dry_run;
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = SpecPipeline::new(storage, config);
    let engine = SpecEngine::new(pipeline);

    let result = if dry_run {
        tracing::info!("Dry run: nothing will be written");
        engine.preview().map(|outcome| (outcome, Vec::new()))
    } else {
        engine.run().map(|summary| (summary.outcome, summary.written))
    };

    match result {
        Ok((outcome, written)) => {
            println!("{}", render_screen(&outcome.table));
            for rejection in &outcome.rejected {
                eprintln!("⚠️  Row {} skipped: {}", rejection.row_number, rejection.error);
            }
            for path in &written {
                println!("📁 Saved to: {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
