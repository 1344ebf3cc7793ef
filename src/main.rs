use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, builder::styling};
use energy_feature_pipeline::extract::{
    DEFAULT_DAYS_DELAY, DEFAULT_DAYS_EXPORT, DEFAULT_SOURCE_URL, DatetimeFormat, ExtractionConfig,
    SourceKind, TimestampComparison, compute_window, parse_reference_datetime,
};
use energy_feature_pipeline::pipeline::{self, PipelineOptions};
use energy_feature_pipeline::settings::Settings;
use eyre::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Feature pipeline: extract hourly Danish energy consumption, validate it and load it into the feature store
#[derive(Parser)]
#[command(name = "feature-pipeline", version, styles = STYLES)]
struct Cli {
    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, clean, validate and load one window of data
    Run(RunArgs),

    /// Print the extraction window for a reference datetime
    Window(WindowArgs),
}

#[derive(Args)]
struct WindowArgs {
    /// End reference of the window, defaults to now (RFC 3339, "YYYY-MM-DD HH:MM" or "YYYY-MM-DD")
    #[arg(short, long, value_parser = parse_reference)]
    reference: Option<DateTime<Utc>>,

    /// Days the source lags behind real time
    #[arg(long, default_value_t = DEFAULT_DAYS_DELAY)]
    days_delay: u32,

    /// Days of data to export
    #[arg(long, default_value_t = DEFAULT_DAYS_EXPORT)]
    days_export: u32,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    window: WindowArgs,

    /// Dataset URL, a downloadable file or the JSON API endpoint
    #[arg(short, long, default_value = DEFAULT_SOURCE_URL)]
    url: Url,

    /// Feature group version to load into
    #[arg(long, default_value_t = 1)]
    feature_group_version: u32,

    /// Fetch from a cached file download or the JSON API
    #[arg(short, long, value_enum, default_value_t = SourceKind::File)]
    source: SourceKind,

    /// strftime format of the source timestamps, defaults per source
    #[arg(long)]
    datetime_format: Option<String>,

    /// Directory for the cached download, defaults to output/data under the root directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// How timestamps are compared against the window
    #[arg(long, value_enum, default_value_t = TimestampComparison::Lexical)]
    comparison: TimestampComparison,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,
}

fn parse_reference(value: &str) -> Result<DateTime<Utc>, String> {
    parse_reference_datetime(value).map_err(|e| e.to_string())
}

impl RunArgs {
    fn into_options(self) -> Result<PipelineOptions> {
        let mut extraction = ExtractionConfig::new(self.source, self.url);
        extraction.reference = self.window.reference;
        extraction.days_delay = self.window.days_delay;
        extraction.days_export = self.window.days_export;
        extraction.cache_dir = self.cache_dir;
        extraction.comparison = self.comparison;
        extraction.timeout = Duration::from_secs(self.timeout);
        if let Some(format) = self.datetime_format {
            extraction.datetime_format = DatetimeFormat::new(format)?;
        }

        Ok(PipelineOptions {
            extraction,
            feature_group_version: self.feature_group_version,
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match cli.command {
        Commands::Run(args) => {
            let settings = Settings::load()?;
            let options = args.into_options()?;
            log::info!(
                "Running {} extraction into feature group version {}",
                format!("{:?}", options.extraction.source).to_lowercase().cyan(),
                options.feature_group_version.cyan()
            );

            match pipeline::run(&settings, &options).await? {
                Some(metadata) => log::info!(
                    "Loaded {} records between {} and {}",
                    metadata.records_loaded.cyan(),
                    metadata.extraction.export_datetime_utc_start,
                    metadata.extraction.export_datetime_utc_end
                ),
                None => log::warn!(
                    "No data could be extracted from {}, nothing was loaded",
                    options.extraction.url.bright_black()
                ),
            }
        }
        Commands::Window(args) => {
            let window = compute_window(args.reference, args.days_delay, args.days_export);
            let format = DatetimeFormat::file_default();
            println!("start: {}", format.format(&window.start()));
            println!("end:   {}", format.format(&window.end()));
        }
    }

    Ok(())
}
