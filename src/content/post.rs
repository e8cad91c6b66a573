//! Post model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// URL and file slug (file stem)
    pub slug: String,

    /// Publication date
    pub date: NaiveDate,

    /// Last updated date
    pub updated: Option<NaiveDate>,

    /// Short summary shown on listing pages
    pub excerpt: Option<String>,

    pub featured_image: Option<String>,

    /// Raw markdown body
    pub raw: String,

    /// Rendered HTML body
    pub content: String,

    pub tags: Vec<String>,

    /// Drafts are left out of listings
    pub draft: bool,

    /// Source file path (relative to the source directory)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,
}

impl Post {
    /// Excerpt for listings, falling back to the start of the body
    pub fn summary(&self, max_chars: usize) -> String {
        if let Some(excerpt) = &self.excerpt {
            return excerpt.clone();
        }

        let text = crate::helpers::strip_html(&self.content);
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.chars().count() <= max_chars {
            text
        } else {
            let cut: String = text.chars().take(max_chars).collect();
            format!("{}…", cut.trim_end())
        }
    }
}
