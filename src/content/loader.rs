//! Content loader - loads posts from the posts directory

use anyhow::Result;
use chrono::Local;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::markdown::render_markdown;
use super::{FrontMatter, Post};
use crate::Site;

/// Loads posts from `{source_dir}/{posts_dir}`
pub struct ContentLoader<'a> {
    site: &'a Site,
}

impl<'a> ContentLoader<'a> {
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Load every post, drafts included, newest first
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = &self.site.posts_dir;
        if !posts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(posts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match self.load_post(path) {
                    Ok(post) => posts.push(post),
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {}", path, e);
                    }
                }
            }
        }

        // Newest first; slug breaks ties so listings are stable
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));

        Ok(posts)
    }

    /// Posts that belong in listings
    pub fn posts_without_drafts(&self) -> Result<Vec<Post>> {
        let mut posts = self.load_posts()?;
        posts.retain(|post| !post.draft);
        Ok(posts)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let file_modified = fs::metadata(path)?
            .modified()
            .ok()
            .map(|t| chrono::DateTime::<Local>::from(t).date_naive());

        let date = fm
            .parse_date()
            .unwrap_or_else(|| file_modified.unwrap_or_else(crate::helpers::today));
        let updated = fm.parse_updated().or(file_modified);

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        let title = fm.title.clone().unwrap_or_else(|| slug.clone());

        let source = path
            .strip_prefix(&self.site.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        Ok(Post {
            title,
            slug,
            date,
            updated,
            excerpt: fm.excerpt().map(str::to_string),
            featured_image: fm.featured_image.clone(),
            raw: body.to_string(),
            content: render_markdown(body),
            tags: fm.tags.clone(),
            draft: fm.draft,
            source,
            full_source: path.to_path_buf(),
        })
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_lowercase().as_str(), "md" | "markdown"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_post(site: &Site, name: &str, front: &str) {
        fs::create_dir_all(&site.posts_dir).unwrap();
        fs::write(
            site.posts_dir.join(name),
            format!("---\n{}\n---\n\nBody of {}\n", front, name),
        )
        .unwrap();
    }

    #[test]
    fn test_load_posts_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        write_post(&site, "older.md", "title: Older\ndate: 2023-05-01");
        write_post(&site, "newer.md", "title: Newer\ndate: 2024-02-01");
        fs::write(site.posts_dir.join("notes.txt"), "not a post").unwrap();

        let posts = ContentLoader::new(&site).load_posts().unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
        assert_eq!(posts[0].slug, "newer");
        assert_eq!(posts[0].source, "posts/newer.md");
        assert!(posts[0].content.contains("Body of newer.md"));
    }

    #[test]
    fn test_posts_without_drafts() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        write_post(&site, "published.md", "title: Published\ndate: 2024-01-01");
        write_post(&site, "wip.md", "title: WIP\ndate: 2024-01-02\ndraft: true");

        let loader = ContentLoader::new(&site);
        assert_eq!(loader.load_posts().unwrap().len(), 2);

        let listed = loader.posts_without_drafts().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Published");
    }

    #[test]
    fn test_missing_posts_dir() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(ContentLoader::new(&site).load_posts().unwrap().is_empty());
    }

    #[test]
    fn test_title_defaults_to_file_stem() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        write_post(&site, "untitled-thoughts.md", "date: 2024-03-03");

        let posts = ContentLoader::new(&site).load_posts().unwrap();
        assert_eq!(posts[0].title, "untitled-thoughts");
    }
}
