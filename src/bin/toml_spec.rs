use anyhow::Context;
use clap::Parser;
use license_spec::config::toml_config::TomlConfig;
use license_spec::core::docx::{MAX_FONT_POINTS, MIN_FONT_POINTS};
use license_spec::domain::program::CATALOG_VERSION;
use license_spec::utils::{logger, validation::Validate};
use license_spec::{
    render_screen, ConfigProvider, DocxWriter, LeapYearPolicy, LocalStorage, SpecEngine,
    SpecPipeline,
};

#[derive(Parser)]
#[command(name = "toml-spec")]
#[command(about = "Prices a license specification described in a TOML job file")]
struct Args {
    /// Path to TOML job file
    #[arg(short, long, default_value = "spec-job.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Override the leap-year policy from the job file
    #[arg(long, value_enum)]
    policy: Option<LeapYearPolicy>,

    /// Document font
    #[arg(long, default_value = "Times New Roman")]
    font: String,

    /// Document font size in points
    #[arg(
        long,
        default_value_t = 9,
        value_parser = clap::value_parser!(u32).range(i64::from(MIN_FONT_POINTS)..=i64::from(MAX_FONT_POINTS))
    )]
    font_size: u32,

    /// Dry run - print the table without writing files
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_logger(args.verbose, args.log_json);

    tracing::info!("Loading job from: {}", args.config);

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load job file '{}'", args.config))?;

    if let Some(policy) = args.policy {
        config.report.policy = policy;
        tracing::info!("Leap-year policy overridden to: {}", policy);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = SpecPipeline::new(storage, config)
        .with_writer(DocxWriter::new().with_font(args.font.clone(), args.font_size));
    let engine = SpecEngine::new(pipeline);

    let result = if args.dry_run {
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

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let formats: Vec<&str> = config
        .output_formats()
        .iter()
        .map(|format| format.extension())
        .collect();

    println!("📋 Job Summary:");
    println!("  Policy: {}", config.policy());
    println!("  Labels: {:?}", config.report.labels);
    if let Some(csv_path) = config.csv_path() {
        println!("  CSV input: {}", csv_path);
    }
    println!("  Inline items: {}", config.items.len());
    println!("  Program catalog: v{}", CATALOG_VERSION);
    println!("  Output: {}/{}", config.output_path(), config.file_name());
    println!("  Formats: {}", formats.join(", "));
    println!("  Font: {} {}pt", args.font, args.font_size);

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
