use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gcp_exporter::config::Config;
use gcp_exporter::dispatch::Dispatcher;
use gcp_exporter::gcp::client::GcpSessions;
use gcp_exporter::plugin::PluginFactory;
use gcp_exporter::query::validator::Validators;
use gcp_exporter::server::{self, AppState};
use gcp_exporter::{emitter, VERSION};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// HTTP exporter for GCP resource queries
#[derive(Parser, Debug)]
#[command(name = "gcp-exporter", version, about, long_about = None)]
struct Args {
    /// Config file (JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides the config file
    #[arg(short, long)]
    bind: Option<String>,

    /// Push a metric to the Pushgateway after each successful query
    #[arg(long)]
    emit: bool,

    /// Log level; RUST_LOG is used when omitted
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(args: &Args) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = match args.log_level {
        Some(level) => match level.to_tracing_level() {
            Some(level) => EnvFilter::new(level.as_str().to_lowercase()),
            None => return Ok(None),
        },
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let Some(log_path) = &args.log_file else {
        builder.with_writer(std::io::stderr).init();
        return Ok(None);
    };

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    builder
        .with_writer(non_blocking.with_max_level(Level::TRACE))
        .with_ansi(false)
        .init();

    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(&args)?;

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(bind) = &args.bind {
        config.bind_address = bind.clone();
    }
    if args.emit {
        config.emitter.enabled = true;
    }

    tracing::info!("gcp-exporter {} starting", VERSION);

    let sessions = Arc::new(GcpSessions::new(
        config.endpoints.clone(),
        config.access_token.clone(),
    ));
    let emitter = emitter::from_config(&config.emitter)?;
    let factory = PluginFactory::new(sessions, emitter);
    let dispatcher =
        Dispatcher::new(Validators::new(), factory).with_emitter(config.emitter.enabled);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    server::serve(listener, Arc::new(AppState::new(dispatcher)), shutdown_signal()).await?;

    tracing::info!("gcp-exporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
