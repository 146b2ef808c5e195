use argh::FromArgs;
use std::time::Duration;
use weathergov::{Config, HttpFetcher, WeatherGov};

#[derive(FromArgs)]
/// Current conditions from api.weather.gov, one JSON line per update
struct Args {
    /// path to the configuration file (optional, uses defaults)
    #[argh(option, short = 'c')]
    config: Option<String>,

    /// station code from weather.gov, overrides the config file
    #[argh(option, short = 's')]
    station: Option<String>,

    /// unit system, 'metric' or 'imperial', overrides the config file
    #[argh(option, short = 'u')]
    units: Option<String>,

    /// run a single update cycle and exit
    #[argh(switch)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let args: Args = argh::from_env();

    // Load configuration (or use defaults)
    let mut config = if let Some(config_path) = &args.config {
        match Config::from_file(config_path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to load config from '{}': {}", config_path, e);
                std::process::exit(1);
            }
        }
    } else {
        log::info!("No config file specified, using defaults");
        Config::default()
    };
    if let Some(station) = args.station {
        config.station_code = Some(station);
    }
    if let Some(units) = args.units {
        config.units = units;
    }

    let interval_secs = config.interval_secs.max(1);
    let mut weather = WeatherGov::new(config, HttpFetcher::new()?);
    match weather.url() {
        Some(url) => log::info!(
            "Polling {} every {}s ({} units)",
            url,
            interval_secs,
            weather.config().units
        ),
        None => log::warn!("No station_code configured, every update will fail"),
    }

    if args.once {
        let result = weather.check_weather().await;
        println!("{}", serde_json::to_string(weather.record())?);
        result?;
        return Ok(());
    }

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(());

    // Set up Ctrl+C handler
    ctrlc::set_handler(move || {
        log::info!("Received Ctrl+C, shutting down gracefully...");
        let _ = shutdown_tx.send(());
    })
    .expect("Error setting Ctrl+C handler");

    weather
        .run(Duration::from_secs(interval_secs), shutdown_rx, |record| {
            match serde_json::to_string(record) {
                Ok(line) => println!("{}", line),
                Err(e) => log::error!("Failed to serialize record: {}", e),
            }
        })
        .await;

    Ok(())
}
