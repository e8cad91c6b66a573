//! Live page model and fetched page scraping

use scraper::{ElementRef, Html};
use serde::Serialize;

use super::cursor::{Cursor, CursorUpdate};
use super::markup::ListingSelectors;
use crate::error::LoadError;

/// One rendered listing entry, kept as its outer HTML
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemNode {
    pub html: String,
}

/// The control that starts loading the next page
#[derive(Debug, Clone, Serialize)]
pub struct TriggerControl {
    pub cursor: Cursor,
    pub disabled: bool,
    pub classes: Vec<String>,
    /// Set once the last page has been merged
    pub hidden: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadingIndicator {
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressCounter {
    pub text: String,
}

/// The elements of the host page the loader reads and writes
#[derive(Debug, Clone, Serialize)]
pub struct LivePage {
    pub trigger: TriggerControl,
    pub items: Vec<ItemNode>,
    pub loading_indicator: Option<LoadingIndicator>,
    pub progress: Option<ProgressCounter>,
}

impl LivePage {
    /// Build the live page from the host document.
    ///
    /// Returns `None` when the trigger control or the item container is
    /// missing; the loader has nothing to drive on such a page.
    pub fn parse(html: &str, selectors: &ListingSelectors) -> Option<Self> {
        let document = Html::parse_document(html);

        let trigger = document.select(&selectors.trigger).next()?;
        let container = document.select(&selectors.container).next()?;

        let hidden_class = selectors.markup.hidden_class.as_str();
        let loading_indicator = document
            .select(&selectors.loading_indicator)
            .next()
            .map(|el| LoadingIndicator {
                visible: !el.value().classes().any(|c| c == hidden_class),
            });
        let progress = document
            .select(&selectors.progress)
            .next()
            .map(|el| ProgressCounter {
                text: text_of(el),
            });

        Some(Self {
            trigger: TriggerControl {
                cursor: Cursor::from_attrs(|name| trigger.value().attr(name)),
                disabled: trigger.value().attr("disabled").is_some(),
                classes: trigger.value().classes().map(str::to_string).collect(),
                hidden: false,
            },
            items: collect_items(container, selectors),
            loading_indicator,
            progress,
        })
    }

    /// Append copies of fetched items after the existing ones
    pub fn append_items(&mut self, items: &[ItemNode]) {
        self.items.extend_from_slice(items);
    }

    pub fn set_progress_text(&mut self, text: String) {
        if let Some(progress) = self.progress.as_mut() {
            progress.text = text;
        }
    }

    pub fn progress_text(&self) -> Option<&str> {
        self.progress.as_ref().map(|p| p.text.as_str())
    }

    /// Disable the trigger and show the loading indicator
    pub fn enter_loading(&mut self, disabled_classes: &[String]) {
        self.trigger.disabled = true;
        for class in disabled_classes {
            if !self.trigger.classes.contains(class) {
                self.trigger.classes.push(class.clone());
            }
        }
        if let Some(indicator) = self.loading_indicator.as_mut() {
            indicator.visible = true;
        }
    }

    /// Undo `enter_loading`
    pub fn leave_loading(&mut self, disabled_classes: &[String]) {
        self.trigger.disabled = false;
        self.trigger
            .classes
            .retain(|class| !disabled_classes.contains(class));
        if let Some(indicator) = self.loading_indicator.as_mut() {
            indicator.visible = false;
        }
    }

    /// Merged item markup, one item per line
    pub fn render_items(&self) -> String {
        self.items
            .iter()
            .map(|item| item.html.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// What the loader scrapes out of a fetched listing page
#[derive(Debug)]
pub struct FetchedPage {
    pub items: Vec<ItemNode>,
    /// `None` when the page has no pagination control, i.e. it is the last one
    pub next_cursor: Option<Result<CursorUpdate, LoadError>>,
}

impl FetchedPage {
    pub fn parse(html: &str, selectors: &ListingSelectors) -> Self {
        let document = Html::parse_document(html);

        let items = document
            .select(&selectors.container)
            .next()
            .map(|container| collect_items(container, selectors))
            .unwrap_or_default();

        let next_cursor = document
            .select(&selectors.pagination)
            .next()
            .and_then(|region| region.select(&selectors.trigger).next())
            .map(|trigger| CursorUpdate::from_attrs(|name| trigger.value().attr(name)));

        Self { items, next_cursor }
    }
}

fn collect_items(container: ElementRef<'_>, selectors: &ListingSelectors) -> Vec<ItemNode> {
    container
        .select(&selectors.item)
        .map(|item| ItemNode { html: item.html() })
        .collect()
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListingMarkup;

    const HOST: &str = r#"<!DOCTYPE html>
<html><body>
<div id="posts-container">
  <article class="post-item"><h2>One</h2></article>
  <article class="post-item"><h2>Two</h2></article>
  <aside class="promo">not an item</aside>
</div>
<div class="pagination-container">
  <p id="article-counter">Loaded 2 of 5 articles</p>
  <button id="load-more-btn" class="btn" data-next-page="/blog/2/" data-current-page="1" data-loaded-count="2" data-total-count="5">Load more</button>
  <div id="loading-indicator" class="hidden">Loading...</div>
</div>
</body></html>"#;

    fn selectors() -> ListingSelectors {
        ListingSelectors::new(&ListingMarkup::default()).unwrap()
    }

    #[test]
    fn test_parse_live_page() {
        let page = LivePage::parse(HOST, &selectors()).unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.items[0].html.contains("One"));
        assert_eq!(
            page.trigger.cursor.next_page_url.as_deref(),
            Some("/blog/2/")
        );
        assert_eq!(page.trigger.cursor.total_count, 5);
        assert_eq!(page.trigger.classes, vec!["btn".to_string()]);
        assert!(!page.trigger.disabled);
        assert!(!page.loading_indicator.as_ref().unwrap().visible);
        assert_eq!(page.progress_text(), Some("Loaded 2 of 5 articles"));
    }

    #[test]
    fn test_missing_elements_make_page_unavailable() {
        let no_trigger = r#"<div id="posts-container"></div>"#;
        let no_container = r#"<button id="load-more-btn" data-next-page="/blog/2/"></button>"#;
        assert!(LivePage::parse(no_trigger, &selectors()).is_none());
        assert!(LivePage::parse(no_container, &selectors()).is_none());
    }

    #[test]
    fn test_optional_elements() {
        let html = r#"<div id="posts-container"></div><button id="load-more-btn"></button>"#;
        let mut page = LivePage::parse(html, &selectors()).unwrap();
        assert!(page.loading_indicator.is_none());
        assert!(page.progress.is_none());

        page.set_progress_text("ignored".to_string());
        assert_eq!(page.progress_text(), None);
        assert_eq!(page.trigger.cursor, Cursor::default());
    }

    #[test]
    fn test_loading_state_round_trip() {
        let markup = ListingMarkup::default();
        let mut page = LivePage::parse(HOST, &selectors()).unwrap();

        page.enter_loading(&markup.disabled_classes);
        assert!(page.trigger.disabled);
        assert!(page.trigger.classes.contains(&"opacity-50".to_string()));
        assert!(page.loading_indicator.as_ref().unwrap().visible);

        page.leave_loading(&markup.disabled_classes);
        assert!(!page.trigger.disabled);
        assert_eq!(page.trigger.classes, vec!["btn".to_string()]);
        assert!(!page.loading_indicator.as_ref().unwrap().visible);
    }

    #[test]
    fn test_fetched_page_with_cursor() {
        let fetched = FetchedPage::parse(HOST, &selectors());
        assert_eq!(fetched.items.len(), 2);
        let update = fetched.next_cursor.unwrap().unwrap();
        assert_eq!(update.next_page_url.as_deref(), Some("/blog/2/"));
        assert_eq!(update.loaded_count, 2);
    }

    #[test]
    fn test_fetched_trigger_outside_pagination_region_is_ignored() {
        let html = r#"<div id="posts-container"><div class="post-item">Last</div></div>
<button id="load-more-btn" data-next-page="/blog/9/" data-current-page="9" data-loaded-count="9"></button>"#;
        let fetched = FetchedPage::parse(html, &selectors());
        assert_eq!(fetched.items.len(), 1);
        assert!(fetched.next_cursor.is_none());
    }

    #[test]
    fn test_only_first_pagination_region_is_searched() {
        let html = r#"<div id="posts-container"><div class="post-item">Last</div></div>
<nav class="pagination-container"><p id="article-counter">Loaded 5 of 5 articles</p></nav>
<nav class="pagination-container">
  <button id="load-more-btn" data-next-page="/blog/9/" data-current-page="9" data-loaded-count="9"></button>
</nav>"#;
        let fetched = FetchedPage::parse(html, &selectors());
        assert_eq!(fetched.items.len(), 1);
        assert!(fetched.next_cursor.is_none());
    }

    #[test]
    fn test_fetched_page_without_container() {
        let fetched = FetchedPage::parse("<p>maintenance</p>", &selectors());
        assert!(fetched.items.is_empty());
        assert!(fetched.next_cursor.is_none());
    }

    #[test]
    fn test_render_items_preserves_order() {
        let page = LivePage::parse(HOST, &selectors()).unwrap();
        let rendered = page.render_items();
        let one = rendered.find("One").unwrap();
        let two = rendered.find("Two").unwrap();
        assert!(one < two);
    }
}
