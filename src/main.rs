use catalog_import::config::TomlConfig;
use catalog_import::core::{parser, reconciler};
use catalog_import::domain::ports::{CatalogReader, ConfigProvider};
use catalog_import::utils::{logger, validation::Validate};
use catalog_import::{CliConfig, HttpCatalog, ImportEngine};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting catalog-import CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // A TOML file, when given, overrides the endpoint and placeholders.
    let (endpoint, timeout, defaults) = match &cli.config_file {
        Some(path) => {
            let file_config = TomlConfig::from_file(path)?;
            file_config.validate()?;
            (
                file_config.api_endpoint().to_string(),
                file_config.request_timeout_secs(),
                file_config.import_defaults(),
            )
        }
        None => (
            cli.api_endpoint().to_string(),
            cli.request_timeout_secs(),
            cli.import_defaults(),
        ),
    };

    let raw_text = tokio::fs::read_to_string(&cli.input_file).await?;

    let catalog = HttpCatalog::new(endpoint, timeout)?;
    let mut snapshot = catalog.fetch_institutions().await?;
    tracing::info!(
        "Fetched {} institutions from the catalog service",
        snapshot.len()
    );

    if cli.dry_run {
        let rows = parser::parse_rows(&raw_text)?;
        let outcome = reconciler::reconcile(&rows, &mut snapshot, &defaults);
        println!(
            "🔍 Dry run: {} institutions and {} programs would be created",
            outcome.institutions_created, outcome.programs_created
        );
        for skipped in &outcome.skipped {
            println!("⚠️  row {} skipped: {}", skipped.row_number, skipped.reason);
        }
        return Ok(());
    }

    let engine = ImportEngine::new(catalog, defaults);
    match engine.run(&raw_text, &mut snapshot).await {
        Ok(summary) => {
            tracing::info!("✅ Import completed successfully");
            println!(
                "✅ Import completed: {} institutions created, {} programs created",
                summary.institutions_created, summary.programs_created
            );
            for skipped in &summary.skipped {
                println!("⚠️  row {} skipped: {}", skipped.row_number, skipped.reason);
            }
        }
        Err(e) => {
            tracing::error!("❌ Import failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
