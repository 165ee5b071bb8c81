use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use weather_ingest::{
    default_settings_path, IngestError, IngestOutcome, IngestionRequest, Ingestor,
    PostgresStore, Secret, Settings, WeatherApiClient,
};

#[derive(Parser, Debug)]
#[command(version, about = "Ingest one day of historical weather into PostgreSQL", long_about = None)]
struct Args {
    /// weatherapi.com API key
    #[arg(short = 'k', long = "key")]
    api_key: String,

    /// Location, passed to the API as-is (city name, lat/lon, postcode, ...)
    #[arg(short, long)]
    location: String,

    /// Forecast date [YYYY-MM-DD]
    #[arg(short, long)]
    date: String,

    /// Settings file; defaults to <config dir>/weather_ingest/settings.json
    #[arg(short, long)]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let result = run(args).await;
    match &result {
        Ok(IngestOutcome::AlreadyIngested { date }) => {
            info!("Data for {date} already exists, skipping")
        }
        Ok(IngestOutcome::Persisted { date }) => info!("Data for {date} appended"),
        Err(IngestError::InvalidDate(e)) => eprintln!("\nERROR: {e}"),
        Err(e) => error!("{}", report(e)),
    }
    ExitCode::from(exit_code(&result))
}

/// 0 for a stored record and for an already-ingested date, 1 for any failure.
fn exit_code(result: &Result<IngestOutcome, IngestError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

async fn run(args: Args) -> Result<IngestOutcome, IngestError> {
    // The date is checked before anything touches the disk, the network or the database.
    let request = IngestionRequest::new(Secret::new(args.api_key), args.location, &args.date)?;

    let settings_path = match args.settings {
        Some(path) => path,
        None => default_settings_path()?,
    };
    let settings = Settings::load(&settings_path).await?;

    let ingestor = Ingestor::builder()
        .source(Arc::new(
            WeatherApiClient::new(settings.api.base_url.clone())
                .with_timeout(settings.api.timeout()),
        ))
        .store(Arc::new(PostgresStore::new(&settings.database)))
        .fetch_retry(settings.fetch_retry())
        .persist_retry(settings.persist_retry())
        .scan_chunk_size(settings.scan_chunk_size())
        .build();

    ingestor.ingest(&request).await
}

/// Renders an error with its chain of causes on one line.
fn report(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
