//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    pub posts_dir: String,
    pub public_dir: String,
    pub passthrough_dir: String,

    // Listing
    pub listing_dir: String,
    pub per_page: usize,
    pub date_format: String,

    // Incremental loading
    #[serde(default)]
    pub pagination: PaginationConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),

            url: "http://localhost:8080".to_string(),
            root: "/".to_string(),

            source_dir: "src".to_string(),
            posts_dir: "posts".to_string(),
            public_dir: "dist".to_string(),
            passthrough_dir: "public".to_string(),

            listing_dir: "blog".to_string(),
            per_page: 10,
            date_format: "MMMM DD, YYYY".to_string(),

            pagination: PaginationConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Site-relative URL of a listing page (1-based)
    pub fn listing_url(&self, page_num: usize) -> String {
        let root = format!("/{}/", self.root.trim_matches('/')).replace("//", "/");
        let dir = self.listing_dir.trim_matches('/');
        let base = if dir.is_empty() {
            root
        } else {
            format!("{}{}/", root, dir)
        };

        if page_num <= 1 {
            base
        } else {
            format!("{}{}/", base, page_num)
        }
    }

    /// Site-relative URL of a post
    pub fn post_url(&self, slug: &str) -> String {
        let root = format!("/{}/", self.root.trim_matches('/')).replace("//", "/");
        format!("{}{}/{}/", root, self.posts_dir.trim_matches('/'), slug)
    }

    /// Site-relative URL of the Atom feed
    pub fn feed_url(&self) -> String {
        let root = format!("/{}/", self.root.trim_matches('/')).replace("//", "/");
        format!("{}atom.xml", root)
    }

    /// Absolute URL for a site-relative one
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), path)
    }
}

/// Incremental listing loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Load the next page when the trigger scrolls near the viewport
    pub auto_trigger_on_visibility: bool,
    /// Distance from the viewport, in pixels, that counts as "near"
    pub root_margin_px: u32,
    /// Per-request timeout; none means a request may hang indefinitely
    pub request_timeout_secs: Option<u64>,
    /// Message shown to the user when a page fails to load
    pub failure_message: String,
    #[serde(default)]
    pub markup: ListingMarkup,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            auto_trigger_on_visibility: false,
            root_margin_px: 100,
            request_timeout_secs: None,
            failure_message: "Failed to load more posts. Please try again.".to_string(),
            markup: ListingMarkup::default(),
        }
    }
}

/// Element ids and classes shared by the listing template and the loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingMarkup {
    pub trigger_id: String,
    pub container_id: String,
    pub item_class: String,
    pub loading_indicator_id: String,
    pub progress_id: String,
    pub pagination_class: String,
    pub hidden_class: String,
    pub disabled_classes: Vec<String>,
}

impl Default for ListingMarkup {
    fn default() -> Self {
        Self {
            trigger_id: "load-more-btn".to_string(),
            container_id: "posts-container".to_string(),
            item_class: "post-item".to_string(),
            loading_indicator_id: "loading-indicator".to_string(),
            progress_id: "article-counter".to_string(),
            pagination_class: "pagination-container".to_string(),
            hidden_class: "hidden".to_string(),
            disabled_classes: vec!["opacity-50".to_string(), "cursor-not-allowed".to_string()],
        }
    }
}
