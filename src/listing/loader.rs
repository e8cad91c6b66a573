//! Incremental listing loader

use anyhow::Result;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::cursor::Cursor;
use super::fetch::PageFetcher;
use super::markup::ListingSelectors;
use super::notify::Notifier;
use super::page::{FetchedPage, LivePage};
use crate::config::PaginationConfig;
use crate::error::LoadError;

/// Why a trigger did not start a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// Another load is still running
    InFlight,
    /// The last page was already merged
    Exhausted,
    /// The cursor has no next page
    NoNextPage,
    AutoTriggerDisabled,
    OutOfRange,
}

/// Result of one trigger
#[derive(Debug)]
pub enum LoadOutcome {
    Skipped(SkipReason),
    /// Items were merged and the cursor moved to the next page
    Appended { new_items: usize, cursor: Cursor },
    /// Items were merged from the last page; the trigger is now hidden
    Finished { new_items: usize, total_count: u32 },
    /// The user has been notified; the cursor is unchanged
    Failed(LoadError),
}

impl LoadOutcome {
    pub fn new_items(&self) -> usize {
        match self {
            LoadOutcome::Appended { new_items, .. } | LoadOutcome::Finished { new_items, .. } => {
                *new_items
            }
            _ => 0,
        }
    }
}

/// Fetches subsequent listing pages and merges them into a live page
pub struct ListingLoader<F, N> {
    fetcher: F,
    notifier: N,
    selectors: ListingSelectors,
    config: PaginationConfig,
    page: Mutex<LivePage>,
    is_loading: AtomicBool,
}

impl<F, N> ListingLoader<F, N> {
    fn lock_page(&self) -> MutexGuard<'_, LivePage> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the live page as it stands now
    pub fn snapshot(&self) -> LivePage {
        self.lock_page().clone()
    }

    pub fn cursor(&self) -> Cursor {
        self.lock_page().trigger.cursor.clone()
    }

    pub fn progress_text(&self) -> Option<String> {
        self.lock_page().progress_text().map(str::to_string)
    }

    pub fn item_count(&self) -> usize {
        self.lock_page().items.len()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading.load(Ordering::Acquire)
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

impl<F: PageFetcher, N: Notifier> ListingLoader<F, N> {
    /// Attach a loader to the host page.
    ///
    /// `Ok(None)` means the page has no trigger control or no item container.
    pub fn attach(
        html: &str,
        config: &PaginationConfig,
        fetcher: F,
        notifier: N,
    ) -> Result<Option<Self>> {
        let selectors = ListingSelectors::new(&config.markup)?;

        let Some(page) = LivePage::parse(html, &selectors) else {
            tracing::debug!("No incremental listing on this page");
            return Ok(None);
        };

        tracing::debug!(
            "Attached to listing with {} items, cursor {:?}",
            page.items.len(),
            page.trigger.cursor
        );

        Ok(Some(Self {
            fetcher,
            notifier,
            selectors,
            config: config.clone(),
            page: Mutex::new(page),
            is_loading: AtomicBool::new(false),
        }))
    }

    /// The user activated the trigger control
    pub async fn on_click(&self) -> LoadOutcome {
        self.load_next_page().await
    }

    /// The trigger came within `distance_px` of the viewport
    pub async fn on_trigger_visible(&self, distance_px: u32) -> LoadOutcome {
        if !self.config.auto_trigger_on_visibility {
            return LoadOutcome::Skipped(SkipReason::AutoTriggerDisabled);
        }
        if distance_px > self.config.root_margin_px {
            return LoadOutcome::Skipped(SkipReason::OutOfRange);
        }
        self.load_next_page().await
    }

    /// Fetch the next page and merge its items and cursor into the live page.
    ///
    /// At most one load runs at a time; triggers arriving meanwhile are
    /// dropped. Failures are reported through the notifier and never leave
    /// the loader busy.
    pub async fn load_next_page(&self) -> LoadOutcome {
        let Some(mut guard) = LoadingGuard::acquire(self) else {
            tracing::debug!("Load already in flight, ignoring trigger");
            return LoadOutcome::Skipped(SkipReason::InFlight);
        };

        let next_page_url = {
            let page = self.lock_page();
            if page.trigger.hidden {
                Err(SkipReason::Exhausted)
            } else {
                page.trigger
                    .cursor
                    .next_page_url
                    .clone()
                    .ok_or(SkipReason::NoNextPage)
            }
        };
        let next_page_url = match next_page_url {
            Ok(url) => url,
            Err(reason) => return LoadOutcome::Skipped(reason),
        };

        guard.enter();

        match self.fetch_and_merge(&next_page_url).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!("Error loading more posts from {}: {}", next_page_url, err);
                self.notifier
                    .notify_failure(&self.config.failure_message, &err);
                LoadOutcome::Failed(err)
            }
        }
    }

    async fn fetch_and_merge(&self, url: &str) -> Result<LoadOutcome, LoadError> {
        let body = self.fetcher.fetch(url).await?;
        let fetched = FetchedPage::parse(&body, &self.selectors);
        let new_items = fetched.items.len();

        let mut page = self.lock_page();
        page.append_items(&fetched.items);

        match fetched.next_cursor {
            Some(update) => {
                let update = update?;
                let cursor = &mut page.trigger.cursor;
                cursor.apply(update);
                if cursor.loaded_count > cursor.total_count {
                    tracing::warn!(
                        "Page {} reports {} loaded of {} total",
                        cursor.current_page,
                        cursor.loaded_count,
                        cursor.total_count
                    );
                }
                let cursor = cursor.clone();
                page.set_progress_text(cursor.progress_text());

                tracing::info!(
                    "Loaded {} posts from {} ({})",
                    new_items,
                    url,
                    cursor.progress_text()
                );
                Ok(LoadOutcome::Appended { new_items, cursor })
            }
            None => {
                page.trigger.hidden = true;
                let total_count = page.trigger.cursor.total_count;
                let text = page.trigger.cursor.completion_text();
                page.set_progress_text(text);

                tracing::info!("Loaded {} posts from {}, end of listing", new_items, url);
                Ok(LoadOutcome::Finished {
                    new_items,
                    total_count,
                })
            }
        }
    }
}

/// Holds the in-flight flag; dropping it returns the loader to idle
struct LoadingGuard<'a, F, N> {
    loader: &'a ListingLoader<F, N>,
    entered: bool,
}

impl<'a, F, N> LoadingGuard<'a, F, N> {
    fn acquire(loader: &'a ListingLoader<F, N>) -> Option<Self> {
        loader
            .is_loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self {
            loader,
            entered: false,
        })
    }

    fn enter(&mut self) {
        self.loader
            .lock_page()
            .enter_loading(&self.loader.config.markup.disabled_classes);
        self.entered = true;
    }
}

impl<F, N> Drop for LoadingGuard<'_, F, N> {
    fn drop(&mut self) {
        if self.entered {
            self.loader
                .lock_page()
                .leave_loading(&self.loader.config.markup.disabled_classes);
        }
        self.loader.is_loading.store(false, Ordering::Release);
    }
}
