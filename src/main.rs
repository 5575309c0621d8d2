//! deploy-status: a deployment status page behind a load balancer.
//!
//! This is the application entry point. It loads configuration from a TOML
//! file, initializes tracing, and then either serves the status page and health
//! endpoint (`serve`, the default) or runs the status viewer in the terminal
//! against a running instance (`status`).

use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use reqwest::Url;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deploy_status::config::{resolve_log_filter, AppConfig, DEFAULT_CONFIG_PATH};
use deploy_status::console::{self, ConsoleOptions, Outcome};
use deploy_status::health::{Deployment, HealthReporter};
use deploy_status::http::start_server;
use deploy_status::routes::create_router;
use deploy_status::state::AppState;
use deploy_status::templates::init_templates;
use deploy_status::viewer::{HealthSource, HttpHealthSource, StatusViewer};

/// deploy-status: deployment status page and health endpoint
#[derive(Parser, Debug)]
#[command(name = "deploy-status", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "deploy_status=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the status page and health endpoint (default)
    Serve,
    /// Show the status of a running instance in the terminal
    Status {
        /// Base URL of the instance (defaults to the configured listen address)
        #[arg(short, long)]
        url: Option<Url>,

        /// Request timeout in seconds (defaults to viewer.timeout_seconds)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Exit on failure instead of offering to retry
        #[arg(long)]
        once: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration. Only the default path may be absent.
    let (config, config_missing) =
        AppConfig::load_or_default(&args.config, args.config == DEFAULT_CONFIG_PATH)?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = resolve_log_filter(args.log_level, std::env::var("RUST_LOG").ok());

    let json = config.logging.is_json();
    // Logs go to stderr so `status` output stays clean on stdout
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_filter))
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    if config_missing {
        tracing::warn!(
            path = DEFAULT_CONFIG_PATH,
            "Config file not found, using defaults"
        );
    } else {
        tracing::info!(path = %args.config, "Loaded configuration");
    }

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Status { url, timeout, once } => status(&config, url, timeout, once).await,
    }
}

async fn serve(config: AppConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Uptime counts from here
    let deployment = Deployment::from_env(&config.deployment);
    let reporter = HealthReporter::new(deployment);
    tracing::info!(
        environment = %reporter.deployment().environment,
        version = %reporter.deployment().version,
        "Resolved deployment"
    );

    // Initialize Tera templates
    let tera = init_templates(&config.assets.templates)?;
    tracing::info!("Initialized templates");

    let state = AppState::new(config.clone(), tera, reporter)?;
    tracing::info!(source = %state.page_source.describe(), "Status page health source");

    let app = create_router(state);
    start_server(app, &config).await?;

    Ok(ExitCode::SUCCESS)
}

async fn status(
    config: &AppConfig,
    url: Option<Url>,
    timeout: Option<u64>,
    once: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let base = match url {
        Some(url) => url,
        None => config.http.local_base_url().parse()?,
    };
    let timeout = Duration::from_secs(timeout.unwrap_or(config.viewer.timeout_seconds));
    let source = HttpHealthSource::new(&base, timeout)?;
    tracing::debug!(url = %source.url(), "Fetching health snapshot");

    let interactive = std::io::stdin().is_terminal();
    let options = ConsoleOptions {
        animate: std::io::stdout().is_terminal(),
        prompt: interactive && !once,
    };

    let mut viewer = StatusViewer::open(Arc::new(source));
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let outcome = console::run(&mut viewer, stdin, &mut stdout, options).await?;

    Ok(match outcome {
        Outcome::Loaded => ExitCode::SUCCESS,
        Outcome::Failed => ExitCode::FAILURE,
    })
}
