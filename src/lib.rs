//! blog-pager: a small blog toolchain built around an incremental listing
//! loader.
//!
//! The generator renders paginated listing pages whose trigger control
//! carries a pagination cursor; the [`listing`] module fetches the following
//! pages and merges their items and cursor into a live page model.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod listing;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A blog site rooted at a directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
    /// Markdown posts
    pub posts_dir: PathBuf,
    /// Output directory
    pub public_dir: PathBuf,
    /// Files copied verbatim into the output root
    pub passthrough_dir: PathBuf,
}

impl Site {
    /// Open a site, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let source_dir = base_dir.join(&config.source_dir);
        let posts_dir = source_dir.join(&config.posts_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let passthrough_dir = base_dir.join(&config.passthrough_dir);

        Self {
            config,
            base_dir,
            source_dir,
            posts_dir,
            public_dir,
            passthrough_dir,
        }
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Scaffold a new draft post
    pub fn new_post(&self, title: &str) -> Result<PathBuf> {
        commands::new::create_post(self, title)
    }
}
