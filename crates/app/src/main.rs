use chrono::Utc;
use clap::{Parser, Subcommand};
use course_search_core::{
    Debouncer, Highlighter, KeywordCatalog, SearchClient, SearchClientConfig, SearchOutcome,
    SearchStatus,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "course-search", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Base URL of the web application serving the search endpoint
    #[arg(long, env = "COURSE_SEARCH_BASE_URL", default_value = "http://localhost:3000")]
    base_url: String,

    /// Path of the search endpoint
    #[arg(long, env = "COURSE_SEARCH_PATH", default_value = "/api/search")]
    search_path: String,

    /// Extra attempts after the first failed one
    #[arg(long, env = "COURSE_SEARCH_MAX_RETRIES", default_value = "2")]
    max_retries: u32,

    /// Pause between attempts, in milliseconds
    #[arg(long, env = "COURSE_SEARCH_RETRY_DELAY_MS", default_value = "1000")]
    retry_delay_ms: u64,

    /// Per-request timeout, in milliseconds
    #[arg(long, env = "COURSE_SEARCH_TIMEOUT_MS", default_value = "5000")]
    timeout_ms: u64,

    /// Idle time after the last keystroke before `watch` searches, in milliseconds
    #[arg(long, env = "COURSE_SEARCH_DEBOUNCE_MS", default_value = "400")]
    debounce_ms: u64,

    /// Answer every query with the fallback results without touching the network
    #[arg(long, env = "COURSE_SEARCH_FORCE_FALLBACK", default_value_t = false)]
    force_fallback: bool,

    /// JSON file with keyword → canned results entries
    #[arg(long, env = "COURSE_SEARCH_CATALOG")]
    catalog: Option<PathBuf>,

    /// Disable keyword short-circuits entirely
    #[arg(long, default_value_t = false, conflicts_with = "catalog")]
    no_catalog: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single search and print the results.
    Search {
        /// Search query
        #[arg(long)]
        query: String,
    },
    /// Treat each stdin line as the current content of a search box.
    Watch,
    /// Print text with query matches highlighted.
    Highlight {
        #[arg(long)]
        text: String,
        #[arg(long)]
        query: String,
        #[arg(long, default_value = "<mark>")]
        open: String,
        #[arg(long, default_value = "</mark>")]
        close: String,
    },
}

impl Cli {
    fn client_config(&self) -> SearchClientConfig {
        SearchClientConfig::default()
            .with_endpoint(&self.base_url, &self.search_path)
            .with_max_retries(self.max_retries)
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms))
            .with_request_timeout(Duration::from_millis(self.timeout_ms))
            .with_force_fallback(self.force_fallback)
    }

    /// Longest a single debounced search can take: the debounce delay plus
    /// every attempt timing out followed by its retry delay.
    fn settle_bound(&self) -> Duration {
        let per_attempt = self.timeout_ms.saturating_add(self.retry_delay_ms);
        let attempts = u64::from(self.max_retries).saturating_add(1);
        Duration::from_millis(
            self.debounce_ms
                .saturating_add(per_attempt.saturating_mul(attempts)),
        )
    }

    fn keyword_catalog(&self) -> anyhow::Result<KeywordCatalog> {
        if self.no_catalog {
            return Ok(KeywordCatalog::empty());
        }
        match &self.catalog {
            Some(path) => KeywordCatalog::from_path(path)
                .map_err(|error| anyhow::anyhow!("{}: {error}", path.display())),
            None => Ok(KeywordCatalog::demo()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Command::Highlight {
        text,
        query,
        open,
        close,
    } = &cli.command
    {
        println!("{}", Highlighter::new(open, close).highlight(text, query));
        return Ok(());
    }

    let config = cli.client_config();
    let catalog = cli.keyword_catalog()?;
    let endpoint = config
        .endpoint()
        .map_err(|error| anyhow::anyhow!(error.to_string()))?;
    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        endpoint = %endpoint,
        keywords = catalog.len(),
        "course-search boot"
    );

    let client = SearchClient::http(config, catalog)
        .map_err(|error| anyhow::anyhow!(error.to_string()))?;
    let highlighter = Highlighter::new("**", "**");

    match cli.command {
        Command::Search { query } => {
            let outcome = client.search_detailed(&query).await;
            print_outcome(&query, &outcome, &highlighter);
        }
        Command::Watch => {
            let (mut debouncer, mut results) =
                Debouncer::new(Arc::new(client), Duration::from_millis(cli.debounce_ms));

            let (delivered_tx, mut delivered_rx) = watch::channel(0u64);
            let printer = tokio::spawn(async move {
                while let Some(delivered) = results.recv().await {
                    println!("#{}", delivered.sequence);
                    print_outcome(&delivered.query, &delivered.outcome, &highlighter);
                    let _ = delivered_tx.send(delivered.sequence);
                }
            });

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                let sequence = debouncer.input(&line);
                info!(sequence, query = %line, "input");
            }

            // The newest input always produces an outcome; wait for it, bounded
            // by the worst case of the retry loop.
            let last = debouncer.latest_sequence();
            if last > 0 {
                let caught_up = matches!(
                    tokio::time::timeout(
                        cli.settle_bound(),
                        delivered_rx.wait_for(|delivered| *delivered >= last),
                    )
                    .await,
                    Ok(Ok(_))
                );
                if !caught_up {
                    warn!(sequence = last, "last input produced no outcome before shutdown");
                }
            }
            drop(debouncer);

            // Older in-flight searches would only be discarded as stale.
            printer.abort();
            if let Err(error) = printer.await {
                if !error.is_cancelled() {
                    warn!(%error, "result printer stopped unexpectedly");
                }
            }
        }
        Command::Highlight { .. } => {}
    }

    Ok(())
}

fn print_outcome(query: &str, outcome: &SearchOutcome, highlighter: &Highlighter) {
    let status = match &outcome.status {
        SearchStatus::Completed => "completed".to_string(),
        SearchStatus::QueryTooShort => "query too short".to_string(),
        SearchStatus::Canned { keyword } => format!("canned (keyword={keyword})"),
        SearchStatus::Fallback => "search unavailable, showing suggestions".to_string(),
        SearchStatus::Failed(kind) => format!("search unavailable ({kind:?}), try again"),
    };

    println!("query: {query}");
    println!("status: {status} attempts={}", outcome.attempts);
    if let Some(total) = outcome.total_results {
        println!("total_results: {total}");
    }
    if outcome.results.is_empty() && !outcome.is_error() {
        println!("no results");
    }

    for result in &outcome.results {
        println!(
            "[{}] {} -> {}",
            result.kind.as_str(),
            highlighter.highlight(&result.title, query),
            result.route()
        );
        if !result.snippet.is_empty() {
            println!("  {}", highlighter.highlight(&result.snippet, query));
        }
        if let Some(thumbnail) = &result.thumbnail {
            println!("  thumbnail={thumbnail}");
        }
    }
}
