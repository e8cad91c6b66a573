//! CSS selectors compiled from the listing markup configuration

use anyhow::{anyhow, Result};
use scraper::Selector;

use crate::config::ListingMarkup;

/// Selectors used to find the loader's elements in a parsed document
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    pub markup: ListingMarkup,
    pub trigger: Selector,
    pub container: Selector,
    pub item: Selector,
    pub loading_indicator: Selector,
    pub progress: Selector,
    /// Pagination region of a fetched page; only the first one is searched
    pub pagination: Selector,
}

impl ListingSelectors {
    pub fn new(markup: &ListingMarkup) -> Result<Self> {
        Ok(Self {
            markup: markup.clone(),
            trigger: parse(&format!("#{}", markup.trigger_id))?,
            container: parse(&format!("#{}", markup.container_id))?,
            item: parse(&format!(".{}", markup.item_class))?,
            loading_indicator: parse(&format!("#{}", markup.loading_indicator_id))?,
            progress: parse(&format!("#{}", markup.progress_id))?,
            pagination: parse(&format!(".{}", markup.pagination_class))?,
        })
    }
}

fn parse(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("Invalid selector {:?}: {}", selector, e))
}
