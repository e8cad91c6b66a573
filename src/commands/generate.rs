//! Generate static files

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::generator::Generator;
use crate::Site;

/// Generate the static site
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = ContentLoader::new(site);
    let posts = loader.posts_without_drafts()?;
    tracing::info!("Loaded {} published posts", posts.len());

    Generator::new(site).generate(&posts)?;

    let duration = start.elapsed();
    tracing::info!("Completed in {:.2}s", duration.as_secs_f64());

    Ok(())
}
