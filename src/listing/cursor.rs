//! Pagination cursor carried by the trigger control

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

pub const ATTR_NEXT_PAGE: &str = "data-next-page";
pub const ATTR_CURRENT_PAGE: &str = "data-current-page";
pub const ATTR_LOADED_COUNT: &str = "data-loaded-count";
pub const ATTR_TOTAL_COUNT: &str = "data-total-count";

/// Where the next fetch goes and how far loading has progressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Absent once there are no further pages
    pub next_page_url: Option<String>,
    pub current_page: u32,
    pub loaded_count: u32,
    pub total_count: u32,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            next_page_url: None,
            current_page: 1,
            loaded_count: 0,
            total_count: 0,
        }
    }
}

/// The part of a cursor a fetched page is allowed to overwrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorUpdate {
    pub next_page_url: Option<String>,
    pub current_page: u32,
    pub loaded_count: u32,
}

impl Cursor {
    /// Read the cursor from the live trigger control.
    ///
    /// Missing or unparsable counts fall back to their defaults.
    pub fn from_attrs<'a>(attr: impl Fn(&str) -> Option<&'a str>) -> Self {
        let defaults = Cursor::default();
        let number = |name: &str, default: u32| {
            attr(name)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(default)
        };

        Self {
            next_page_url: next_page(attr(ATTR_NEXT_PAGE)),
            current_page: number(ATTR_CURRENT_PAGE, defaults.current_page),
            loaded_count: number(ATTR_LOADED_COUNT, defaults.loaded_count),
            total_count: number(ATTR_TOTAL_COUNT, defaults.total_count),
        }
    }

    /// Overwrite the fields a fetched page owns; the total stays put
    pub fn apply(&mut self, update: CursorUpdate) {
        self.next_page_url = update.next_page_url;
        self.current_page = update.current_page;
        self.loaded_count = update.loaded_count;
    }

    /// Loaded count as shown to the user, never above the total
    pub fn displayed_loaded(&self) -> u32 {
        self.loaded_count.min(self.total_count)
    }

    pub fn progress_text(&self) -> String {
        format!(
            "Loaded {} of {} articles",
            self.displayed_loaded(),
            self.total_count
        )
    }

    pub fn completion_text(&self) -> String {
        format!("You've reached the end! ({} articles total)", self.total_count)
    }
}

impl CursorUpdate {
    /// Read a cursor update from a pagination control in a fetched page.
    ///
    /// Unlike the live trigger, counts here must be well formed.
    pub fn from_attrs<'a>(attr: impl Fn(&str) -> Option<&'a str>) -> Result<Self, LoadError> {
        let number = |name: &str| -> Result<u32, LoadError> {
            let value = attr(name).unwrap_or_default();
            value
                .trim()
                .parse::<u32>()
                .map_err(|_| LoadError::MalformedCursor {
                    attribute: name.to_string(),
                    value: value.to_string(),
                })
        };

        Ok(Self {
            next_page_url: next_page(attr(ATTR_NEXT_PAGE)),
            current_page: number(ATTR_CURRENT_PAGE)?,
            loaded_count: number(ATTR_LOADED_COUNT)?,
        })
    }
}

fn next_page(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
