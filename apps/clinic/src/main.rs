use anyhow::{Context, Result};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_scheduler::seed::SeedDocument;
use clinic_scheduler::Clinic;
use shared_config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting clinic scheduler");
    info!("Slot expansion: {}", config.slot_expansion);

    // A path on the command line wins over CLINIC_SEED_FILE.
    let seed_path = std::env::args().nth(1).or_else(|| config.seed_file.clone());

    let clinic = Clinic::in_memory(config);

    let Some(seed_path) = seed_path else {
        info!("No seed document given; set CLINIC_SEED_FILE or pass a path");
        return Ok(());
    };

    let seed = SeedDocument::from_path(&seed_path)?;
    let seeded = seed.apply(&clinic).await?;

    let output = serde_json::to_string_pretty(&seeded).context("Failed to serialize slots")?;
    println!("{}", output);

    Ok(())
}
