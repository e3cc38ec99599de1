//! Binary entry point for `autoreply`.
//!
//! This module provides the command-line interface for autoreply with options
//! for configuration file paths and logging verbosity. It initializes the
//! necessary components and either starts the bot or runs a one-off command
//! against the document store.

use autoreply::prelude::*;
use clap::{Parser, Subcommand};
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing_subscriber::{Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Autoreply – a chat bot that learns answers from replies.
///
/// Configuration can come from `config.toml` or environment variables
/// (prefixed with `AUTOREPLY_`). Learned pairs are kept in
/// `.hidden/autoreply.db` unless `db_endpoint` points elsewhere.
#[derive(Parser, Debug)]
#[command(version, author, about, long_about = None)]
struct Args {
    /// Override the config file path (optional).
    ///
    /// By default, the bot will look for a config file at `.hidden/config.toml`
    /// in the current directory.
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: INFO level
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Export spans to an OTLP collector over HTTP.
    #[arg(long, global = true)]
    otlp: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the bot on the console chat (the default).
    Run,
    /// Store a question and its answer.
    Learn { question: String, answer: String },
    /// Print the best stored answer for a question, with its score.
    Ask { question: String },
    /// Print how many question/answer pairs are stored.
    Count,
}

/// Main entry point for the autoreply binary.
///
/// Sets up logging based on verbosity, loads configuration, and dispatches the command.
#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    // Construct the level filter.

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer (stderr, so the console chat owns stdout).

    let logs = tracing_subscriber::fmt::layer()
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    // Prepare the otlp layer, if requested.

    let otel = if args.otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("autoreply");

        Some(tracing_opentelemetry::layer().with_tracer(tracer).boxed())
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(logs).init();

    let config = Config::load(args.config.as_deref())?;

    match args.command.unwrap_or(Command::Run) {
        Command::Run => autoreply::start(config).await,
        Command::Learn { question, answer } => {
            let db = DbClient::surreal(&config).await?;
            let document = db.add_document(&question, &answer).await?;

            println!("Stored document {}.", document.id);

            Ok(())
        }
        Command::Ask { question } => {
            let db = DbClient::surreal(&config).await?;
            let matcher = Matcher::new(db);

            match matcher.best_answer(&question).await? {
                BestAnswer::Found { answer, score } => {
                    let confident = if score > config.threshold { "above" } else { "below" };
                    println!("{answer}\n(score {score:.3}, {confident} threshold {})", config.threshold);
                }
                BestAnswer::Empty => println!("No documents stored yet."),
            }

            Ok(())
        }
        Command::Count => {
            let db = DbClient::surreal(&config).await?;

            println!("{}", db.count().await?);

            Ok(())
        }
    }
}
