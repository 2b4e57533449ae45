use std::error::Error;
use std::time::Instant;

use chrono::Local;
use log::{error, info};

use torgi_scraper::{input_loader, logger, ScraperConfig, VinScraper};

const DEFAULT_INPUT_FILE: &str = "input/vin_list.csv";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logger::init();
    info!("Starting auction VIN check...");

    let input_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_INPUT_FILE.to_string());

    let vins = input_loader::load_vins(&input_file);
    if vins.is_empty() {
        error!(
            "No valid VINs found in {}. Expecting a CSV or XLSX file with a VIN column.",
            input_file
        );
        return Ok(());
    }

    let output_file = format!(
        "output/check_results_{}.csv",
        Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    info!("Writing results to {}", output_file);

    let config = ScraperConfig {
        output_file: output_file.into(),
        proxy: std::env::var("TORGI_PROXY").ok(),
        ..ScraperConfig::default()
    };

    let started = Instant::now();
    let scraper = VinScraper::new(config);
    scraper.check_all(&vins).await;

    info!(
        "Finished: {} VINs checked in {:.2?}",
        vins.len(),
        started.elapsed()
    );
    Ok(())
}
