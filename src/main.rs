//! deal-alerts — binary entrypoint.
//! Runs either pipeline stage once; scheduling and chaining belong to the host.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use deal_alerts::config::{RedditCredentials, Settings};
use deal_alerts::dispatch::{log::LogDispatcher, webhook::WebhookDispatcher, Dispatcher};
use deal_alerts::feed::reddit::RedditFeed;
use deal_alerts::store::{json_file::JsonFileStore, memory::MemoryStore, PostStore};
use deal_alerts::{telemetry, Collector, CollectorOutcome, NotifierInput, Notifier, NotifierOptions};

#[derive(Debug, Parser)]
#[command(name = "deal-alerts", version, about = "Collect new deal posts and fan out alerts")]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Serve Prometheus metrics on this address.
    #[arg(long, global = true)]
    metrics_listen: Option<SocketAddr>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the collector and print its outcome as JSON.
    Collect {
        /// Use an in-memory store; nothing is persisted.
        #[arg(long)]
        dry_run: bool,
    },
    /// Read a collector outcome (file or stdin) and publish alerts.
    Notify {
        #[arg(long)]
        input: Option<PathBuf>,
        /// Log alerts instead of publishing them.
        #[arg(long)]
        dry_run: bool,
    },
    /// Collector then notifier in one process.
    Run {
        #[arg(long)]
        dry_run: bool,
    },
}

fn build_store(settings: &Settings, dry_run: bool) -> Arc<dyn PostStore> {
    if dry_run {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(JsonFileStore::for_table(&settings.data_dir, &settings.table))
    }
}

fn build_dispatcher(settings: &Settings, dry_run: bool) -> Arc<dyn Dispatcher> {
    if dry_run {
        Arc::new(LogDispatcher)
    } else {
        Arc::new(WebhookDispatcher::from_settings(settings))
    }
}

fn build_collector(settings: &Settings, store: Arc<dyn PostStore>) -> Result<Collector> {
    let creds = RedditCredentials::load()?;
    let feed = RedditFeed::new(creds)?
        .with_subreddit(settings.subreddit.clone())
        .with_limit(settings.feed_limit);
    Ok(Collector::new(Arc::new(feed), store))
}

fn build_notifier(settings: &Settings, store: Arc<dyn PostStore>, dry_run: bool) -> Notifier {
    // A dry run never flips flags in the store.
    Notifier::new(store, build_dispatcher(settings, dry_run), settings.topics()).with_options(
        NotifierOptions {
            track_notified: settings.track_notified && !dry_run,
        },
    )
}

fn read_outcome(input: Option<&PathBuf>) -> Result<CollectorOutcome> {
    let raw = match input {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("reading outcome from {}", p.display()))?,
        None => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("reading outcome from stdin")?;
            s
        }
    };
    NotifierInput::parse(&raw)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    telemetry::init_tracing(cli.json_logs);
    if let Some(addr) = cli.metrics_listen {
        telemetry::install_prometheus(addr)?;
    }

    let settings = Settings::load_default()?;
    tracing::debug!(?settings, "settings loaded");

    match cli.command {
        Command::Collect { dry_run } => {
            let collector = build_collector(&settings, build_store(&settings, dry_run))?;
            let outcome = collector.run().await?;
            println!("{}", serde_json::to_string(&outcome)?);
        }
        Command::Notify { input, dry_run } => {
            let outcome = read_outcome(input.as_ref())?;
            let notifier = build_notifier(&settings, build_store(&settings, false), dry_run);
            let report = notifier.run(&outcome).await?;
            tracing::info!(published = report.deliveries.len(), "notifier run finished");
        }
        Command::Run { dry_run } => {
            let store = build_store(&settings, dry_run);
            let collector = build_collector(&settings, store.clone())?;
            let outcome = collector.run().await?;
            let notifier = build_notifier(&settings, store, dry_run);
            let report = notifier.run(&outcome).await?;
            tracing::info!(
                inserted = outcome.inserted,
                published = report.deliveries.len(),
                "pipeline run finished"
            );
        }
    }
    Ok(())
}
