use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use video_insight::{
    config::Config,
    models::Credential,
    services::{AnalysisReport, AnalysisService},
    web::WebServer,
};

#[derive(Parser)]
#[command(name = "video-insight")]
#[command(version)]
#[command(about = "Reconciles public video counters with channel analytics and writes a growth report")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CONFIG_FILE", default_value = "config.toml")]
    config: String,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a single video
    Analyze {
        /// Watch URL, short link or bare video identifier
        reference: String,

        /// OAuth access token with YouTube read and analytics scopes
        #[arg(long, env = "YOUTUBE_ACCESS_TOKEN", hide_env_values = true)]
        access_token: String,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the analysis pipeline over HTTP
    Serve {
        /// Listening IP address
        #[arg(short = 'H', long, value_name = "IP")]
        host: Option<String>,

        /// Listening port
        #[arg(short, long, value_name = "PORT")]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.log_format);

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    match cli.command {
        Command::Analyze {
            reference,
            access_token,
            json,
        } => {
            let service = AnalysisService::from_config(&config)?;
            let report = service
                .analyze(&reference, &Credential::new(access_token))
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_summary(&report);
            }
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.web.host = host;
            }
            if let Some(port) = port {
                config.web.port = port;
            }

            info!("Starting video-insight v{}", env!("CARGO_PKG_VERSION"));
            let service = Arc::new(AnalysisService::from_config(&config)?);
            WebServer::new(&config.web, service)?.serve().await?;
        }
    }

    Ok(())
}

fn init_logging(level: &str, format: LogFormat) {
    let log_filter = if level == "trace" {
        format!("video_insight={},tower_http=trace", level)
    } else {
        format!("video_insight={}", level)
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| log_filter.into());

    // Logs go to stderr so `analyze --json` output stays parseable
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn print_summary(report: &AnalysisReport) {
    let record = &report.record;
    let public = record.public();

    println!("{} ({})", public.title, report.resource_id);
    println!("  published:    {}", public.publication_date());
    println!(
        "  public:       {} views, {} likes, {} comments",
        public.view_count, public.like_count, public.comment_count
    );
    println!("  ownership:    {}", record.ownership_state());
    println!("  availability: {}", record.availability_state());
    if let Some(window) = record.analysis_window() {
        println!("  window:       {} to {}", window.start_date, window.end_date);
    }
    if let Some(metrics) = record.behavioral() {
        println!(
            "  analytics:    {} views, {} minutes watched, {:.0}s average",
            metrics.aggregated_view_count, metrics.watched_minutes, metrics.average_watch_seconds
        );
    }
    if let Some(detail) = record.denial_detail() {
        println!("  denied:       {}", detail);
    }
    println!("  scenario:     {}", report.scenario);
    println!();

    match (&report.narrative, &report.narrative_error) {
        (Some(narrative), _) => println!("{}", narrative),
        (None, Some(error)) => println!("({})", error),
        (None, None) => {}
    }
}
