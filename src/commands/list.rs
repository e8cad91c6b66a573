//! List site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::helpers::date_display;
use crate::Site;

/// List posts, newest first
pub fn run(site: &Site, include_drafts: bool) -> Result<()> {
    let loader = ContentLoader::new(site);
    let posts = if include_drafts {
        loader.load_posts()?
    } else {
        loader.posts_without_drafts()?
    };

    println!("Posts ({}):", posts.len());
    for post in posts {
        println!(
            "  {} - {}{} [{}]",
            date_display(&post.date, &site.config.date_format),
            post.title,
            if post.draft { " (draft)" } else { "" },
            post.source
        );
    }

    Ok(())
}
