use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tweetplus_admin::text::normalize;
use tweetplus_admin::{CollectingNotifier, OutcomeStatus};
use tweetplus_common::NormalForm;
use tweetplus_common::observability::{LogConfig, init_logging};
use tweetplus_config::{TweetplusConfig, TweetplusConfigLoader, default_config_path};
use wiring::{FieldSelection, build_admin};

mod dry_run;
mod items;
mod wiring;

/// Tweet published content and clean up text for tweeting.
#[derive(Parser)]
#[command(name = "tweetplus")]
#[command(version)]
struct Cli {
    /// Configuration file (YAML); defaults to the user config directory
    #[arg(long, global = true, env = "TWEETPLUS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize text the way tweets are normalized
    Normalize {
        /// Unicode normal form (NFC, NFD, NFKC, NFKD); defaults to the configured one
        #[arg(long)]
        form: Option<NormalForm>,

        /// Keep line breaks instead of collapsing all whitespace
        #[arg(long)]
        keep_newlines: bool,

        /// Text to normalize; read from stdin when absent
        text: Option<String>,
    },

    /// Tweet every item of a JSON items file
    Tweet {
        /// JSON array of {title, status, url, short_url?, fields}
        #[arg(long)]
        items: PathBuf,

        /// Item field used as tweet text (default: the title)
        #[arg(long)]
        text_field: Option<String>,

        /// Item field holding the image path or URL
        #[arg(long)]
        image_field: Option<String>,

        /// Log the tweets instead of sending them
        #[arg(long)]
        dry_run: bool,
    },
}

fn load_config(explicit: Option<&PathBuf>) -> Result<TweetplusConfig> {
    let loader = match (explicit, default_config_path()) {
        (Some(path), _) => TweetplusConfigLoader::new().with_file(path),
        (None, Some(path)) => TweetplusConfigLoader::new().with_optional_file(path),
        (None, None) => TweetplusConfigLoader::new(),
    };
    loader.load().context("failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_ref())?;

    let log_path = init_logging(LogConfig {
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.stderr,
        format: cfg.logging.format,
        default_filter: cfg.logging.filter.clone(),
        ..LogConfig::default()
    })?;
    tracing::debug!(log = %log_path.display(), "logging ready");

    match cli.command {
        Commands::Normalize {
            form,
            keep_newlines,
            text,
        } => {
            let input = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read stdin")?;
                    buf
                }
            };
            let form = form.unwrap_or(cfg.dispatch.normal_form);
            println!("{}", normalize(&input, form, !keep_newlines));
        }
        Commands::Tweet {
            items: items_path,
            text_field,
            image_field,
            dry_run,
        } => {
            let fields = FieldSelection {
                text: text_field,
                image: image_field,
            };
            let admin = build_admin(&cfg, fields, dry_run)?;
            let mut items = items::load_items(&items_path)?;
            let notifier = CollectingNotifier::new();

            let Some(report) = admin.tweet_item(&mut items, &notifier).await else {
                bail!("twitter credentials are not configured (set twitter.access_token or use --dry-run)");
            };

            for outcome in &report.outcomes {
                match &outcome.status {
                    OutcomeStatus::Sent { tweet_id, .. } => {
                        println!("sent    {} ({tweet_id})", outcome.title)
                    }
                    OutcomeStatus::Failed(reason) => println!("failed  {}: {reason}", outcome.title),
                }
            }
            for notice in notifier.notifications() {
                println!("[{}] {}", notice.level, notice.message);
            }
        }
    }

    Ok(())
}
