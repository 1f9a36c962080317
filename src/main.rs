use clap::Parser;
use page_harvest::ScraperConfig;
use page_harvest::rfp::{AnalysisStatus, RfpReader};
use serde::Serialize;
use std::process::ExitCode;

mod args;
use args::{Args, normalize_target_url};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let url = normalize_target_url(&args.url);
    ::log::info!("Scraping {} via WebDriver at {}", url, config.webdriver_url);

    let start_time = std::time::Instant::now();
    let succeeded = if args.rfp {
        let analysis = RfpReader::new(config).analyze(&url).await;
        print_json(&analysis, args.compact) && analysis.status == AnalysisStatus::Success
    } else {
        let result = page_harvest::scrape_url(&url, &config).await;
        print_json(&result, args.compact) && result.is_success()
    };

    ::log::info!(
        "Finished in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Config file (if any), then WEBDRIVER_URL, then command-line flags
fn load_config(args: &Args) -> Result<ScraperConfig, page_harvest::config::ConfigError> {
    let mut config = match &args.config {
        Some(path) => ScraperConfig::from_file(path)?,
        None => ScraperConfig::default(),
    }
    .with_env_overrides();

    if let Some(webdriver_url) = &args.webdriver_url {
        config.webdriver_url = webdriver_url.clone();
    }
    if let Some(browser) = args.browser {
        config.browser = browser.into();
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.navigation_timeout_ms = timeout_ms;
    }
    if let Some(settle_ms) = args.settle_ms {
        config.settle_delay_ms = settle_ms;
    }
    if let Some(dir) = &args.screenshot_dir {
        config.screenshot_dir = dir.clone();
    }

    Ok(config)
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> bool {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };

    match rendered {
        Ok(json) => {
            println!("{json}");
            true
        }
        Err(e) => {
            ::log::error!("Failed to serialize result: {}", e);
            false
        }
    }
}
