//! Drive the incremental listing loader against a live site

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::listing::{
    ConsoleNotifier, HttpFetcher, ListingLoader, LoadOutcome, Notifier, PageFetcher, SkipReason,
};
use crate::Site;

/// Options of the load command
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Listing page to start from
    pub url: String,
    /// Keep loading until the listing ends or a load fails
    pub follow: bool,
    /// Print the final live page as JSON
    pub json: bool,
    /// Write the merged item markup here
    pub output: Option<PathBuf>,
}

/// What a run of the loader did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub pages: usize,
    pub new_items: usize,
    pub finished: bool,
    pub failed: bool,
}

/// Click the trigger once, or repeatedly when `follow` is set
pub async fn drive<F: PageFetcher, N: Notifier>(
    loader: &ListingLoader<F, N>,
    follow: bool,
) -> LoadSummary {
    let mut summary = LoadSummary::default();

    loop {
        let outcome = loader.on_click().await;
        summary.new_items += outcome.new_items();

        match outcome {
            LoadOutcome::Appended { .. } => {
                summary.pages += 1;
                print_progress(loader);
                if !follow {
                    break;
                }
            }
            LoadOutcome::Finished { .. } => {
                summary.pages += 1;
                summary.finished = true;
                print_progress(loader);
                break;
            }
            LoadOutcome::Skipped(reason) => {
                if matches!(reason, SkipReason::NoNextPage | SkipReason::Exhausted) {
                    summary.finished = true;
                }
                tracing::info!("Nothing to load: {:?}", reason);
                break;
            }
            LoadOutcome::Failed(_) => {
                summary.failed = true;
                break;
            }
        }
    }

    summary
}

fn print_progress<F, N>(loader: &ListingLoader<F, N>) {
    if let Some(text) = loader.progress_text() {
        println!("{}", text);
    }
}

/// Run the load command
pub async fn run(site: &Site, options: &LoadOptions) -> Result<()> {
    let pagination = &site.config.pagination;
    let timeout = pagination.request_timeout_secs.map(Duration::from_secs);

    let fetcher = HttpFetcher::new(&options.url, timeout)?;
    let html = fetcher
        .fetch(&options.url)
        .await
        .with_context(|| format!("Failed to fetch {}", options.url))?;

    let Some(loader) = ListingLoader::attach(&html, pagination, fetcher, ConsoleNotifier)? else {
        println!("No incremental listing found at {}", options.url);
        return Ok(());
    };

    print_progress(&loader);
    let summary = drive(&loader, options.follow).await;

    println!(
        "Merged {} new posts from {} pages ({} posts on page)",
        summary.new_items,
        summary.pages,
        loader.item_count()
    );

    if options.json {
        println!("{}", serde_json::to_string_pretty(&loader.snapshot())?);
    }

    if let Some(output) = &options.output {
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, loader.snapshot().render_items())?;
        tracing::info!("Wrote merged items to {:?}", output);
    }

    if summary.failed {
        anyhow::bail!("Loading stopped after a failed page load");
    }

    Ok(())
}
