//! Incremental listing loader: fetches subsequent listing pages and merges
//! their items and pagination cursor into a live page model.

mod cursor;
mod fetch;
mod loader;
mod markup;
mod notify;
mod page;

pub use cursor::{Cursor, CursorUpdate};
pub use cursor::{ATTR_CURRENT_PAGE, ATTR_LOADED_COUNT, ATTR_NEXT_PAGE, ATTR_TOTAL_COUNT};
pub use fetch::{HttpFetcher, PageFetcher};
pub use loader::{ListingLoader, LoadOutcome, SkipReason};
pub use markup::ListingSelectors;
pub use notify::{ConsoleNotifier, Notifier};
pub use page::{FetchedPage, ItemNode, LivePage, LoadingIndicator, ProgressCounter, TriggerControl};
