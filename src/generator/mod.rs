//! Generator module - renders listing pages, post pages, the feed and the 404 page

mod templates;

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::content::Post;
use crate::helpers::escape_xml;
use crate::listing::Cursor;
use crate::Site;

pub use templates::ListingPageData;

/// Most recent posts included in `atom.xml`
const FEED_ENTRIES: usize = 20;

/// Static site generator for the post listing
pub struct Generator {
    site: Site,
}

impl Generator {
    pub fn new(site: &Site) -> Self {
        Self { site: site.clone() }
    }

    /// Generate the site from posts (drafts already removed)
    pub fn generate(&self, posts: &[Post]) -> Result<()> {
        fs::create_dir_all(&self.site.public_dir)?;

        self.copy_passthrough()?;

        let mut sorted_posts: Vec<_> = posts.to_vec();
        sorted_posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));

        self.generate_listing_pages(&sorted_posts)?;
        self.generate_post_pages(&sorted_posts)?;
        self.generate_atom_feed(&sorted_posts)?;
        self.generate_not_found_page()?;

        Ok(())
    }

    /// Number of listing pages for `post_count` posts; always at least one
    pub fn listing_page_count(&self, post_count: usize) -> usize {
        post_count.div_ceil(self.per_page()).max(1)
    }

    fn per_page(&self) -> usize {
        self.site.config.per_page.max(1)
    }

    /// Cursor rendered on listing page `page_num` (1-based)
    pub fn listing_cursor(&self, page_num: usize, post_count: usize) -> Cursor {
        let total_pages = self.listing_page_count(post_count);
        let loaded = (page_num * self.per_page()).min(post_count);

        Cursor {
            next_page_url: (page_num < total_pages)
                .then(|| self.site.config.listing_url(page_num + 1)),
            current_page: page_num as u32,
            loaded_count: loaded as u32,
            total_count: post_count as u32,
        }
    }

    /// Generate listing pages with pagination
    fn generate_listing_pages(&self, posts: &[Post]) -> Result<()> {
        let per_page = self.per_page();
        let total_pages = self.listing_page_count(posts.len());

        for page_num in 1..=total_pages {
            let start = (page_num - 1) * per_page;
            let end = (start + per_page).min(posts.len());

            let data = ListingPageData {
                page_posts: &posts[start..end],
                cursor: self.listing_cursor(page_num, posts.len()),
            };
            let html = templates::listing_page(&self.site.config, &data);

            let output_path = self.page_path(&self.site.config.listing_url(page_num));
            write_page(&output_path, &html)?;
        }

        tracing::info!("Generated {} listing pages", total_pages);
        Ok(())
    }

    /// Generate individual post pages
    fn generate_post_pages(&self, posts: &[Post]) -> Result<()> {
        for post in posts {
            let html = templates::post_page(&self.site.config, post);
            let output_path = self.page_path(&self.site.config.post_url(&post.slug));
            write_page(&output_path, &html)?;
        }

        tracing::info!("Generated {} post pages", posts.len());
        Ok(())
    }

    /// Generate `atom.xml` from the newest posts
    fn generate_atom_feed(&self, posts: &[Post]) -> Result<()> {
        let config = &self.site.config;
        let feed_url = config.absolute_url(&config.feed_url());
        let home_url = config.absolute_url(&config.listing_url(1));
        let updated = posts
            .iter()
            .map(|post| post.updated.unwrap_or(post.date))
            .max()
            .map(feed_timestamp)
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

        let mut feed = String::new();
        feed.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        feed.push_str("<feed xmlns=\"http://www.w3.org/2005/Atom\">\n");
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!(
            "  <link href=\"{}\" rel=\"self\"/>\n",
            escape_xml(&feed_url)
        ));
        feed.push_str(&format!("  <link href=\"{}\"/>\n", escape_xml(&home_url)));
        feed.push_str(&format!("  <updated>{}</updated>\n", updated));
        feed.push_str(&format!("  <id>{}</id>\n", escape_xml(&home_url)));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author)
        ));

        for post in posts.iter().take(FEED_ENTRIES) {
            let link = escape_xml(&config.absolute_url(&config.post_url(&post.slug)));
            feed.push_str("  <entry>\n");
            feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&post.title)));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
            feed.push_str(&format!("    <id>{}</id>\n", link));
            feed.push_str(&format!(
                "    <published>{}</published>\n",
                feed_timestamp(post.date)
            ));
            feed.push_str(&format!(
                "    <updated>{}</updated>\n",
                feed_timestamp(post.updated.unwrap_or(post.date))
            ));
            feed.push_str(&format!(
                "    <content type=\"html\"><![CDATA[{}]]></content>\n",
                post.content.replace("]]>", "]]]]><![CDATA[>")
            ));
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        write_page(&self.site.public_dir.join("atom.xml"), &feed)?;
        tracing::info!("Generated atom.xml");
        Ok(())
    }

    fn generate_not_found_page(&self) -> Result<()> {
        let html = templates::not_found_page(&self.site.config);
        write_page(&self.site.public_dir.join("404.html"), &html)
    }

    /// `index.html` path under the public dir for a site-relative URL
    fn page_path(&self, url: &str) -> PathBuf {
        let root = self.site.config.root.trim_matches('/');
        let relative = url.trim_matches('/');
        let relative = relative
            .strip_prefix(root)
            .unwrap_or(relative)
            .trim_start_matches('/');

        if relative.is_empty() {
            self.site.public_dir.join("index.html")
        } else {
            self.site.public_dir.join(relative).join("index.html")
        }
    }

    /// Copy the passthrough directory into the public directory
    fn copy_passthrough(&self) -> Result<()> {
        let source_dir = &self.site.passthrough_dir;
        if !source_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() {
                let relative = path.strip_prefix(source_dir)?;
                let dest = self.site.public_dir.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }
}

fn feed_timestamp(date: chrono::NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}

fn write_page(output_path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_path, html)?;
    tracing::debug!("Generated: {:?}", output_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ListingMarkup, SiteConfig};
    use crate::listing::{FetchedPage, ListingSelectors, LivePage};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn post(i: usize) -> Post {
        Post {
            title: format!("Post {}", i),
            slug: format!("post-{}", i),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
            updated: None,
            excerpt: Some(format!("Excerpt {}", i)),
            featured_image: None,
            raw: String::new(),
            content: format!("<p>Body {}</p>", i),
            tags: Vec::new(),
            draft: false,
            source: format!("posts/post-{}.md", i),
            full_source: PathBuf::from(format!("src/posts/post-{}.md", i)),
        }
    }

    fn site(dir: &TempDir, per_page: usize) -> Site {
        let config = SiteConfig {
            per_page,
            ..SiteConfig::default()
        };
        Site::with_config(dir.path().to_path_buf(), config)
    }

    fn selectors() -> ListingSelectors {
        ListingSelectors::new(&ListingMarkup::default()).unwrap()
    }

    #[test]
    fn test_listing_cursor() {
        let dir = TempDir::new().unwrap();
        let generator = Generator::new(&site(&dir, 10));

        assert_eq!(generator.listing_page_count(25), 3);
        assert_eq!(generator.listing_page_count(0), 1);

        let first = generator.listing_cursor(1, 25);
        assert_eq!(first.next_page_url.as_deref(), Some("/blog/2/"));
        assert_eq!(first.loaded_count, 10);
        assert_eq!(first.total_count, 25);

        let last = generator.listing_cursor(3, 25);
        assert_eq!(last.next_page_url, None);
        assert_eq!(last.loaded_count, 25);
        assert_eq!(last.current_page, 3);
    }

    #[test]
    fn test_generate_listing_pages() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir, 2);
        let posts: Vec<_> = (0..5).map(post).collect();

        Generator::new(&site).generate(&posts).unwrap();

        let first = fs::read_to_string(site.public_dir.join("blog/index.html")).unwrap();
        let page = LivePage::parse(&first, &selectors()).unwrap();
        assert_eq!(page.items.len(), 2);
        // Newest first
        assert!(page.items[0].html.contains("Post 4"));
        assert_eq!(page.trigger.cursor.next_page_url.as_deref(), Some("/blog/2/"));
        assert_eq!(page.trigger.cursor.total_count, 5);
        assert_eq!(page.progress_text(), Some("Loaded 2 of 5 articles"));
        assert!(!page.loading_indicator.unwrap().visible);

        let last = fs::read_to_string(site.public_dir.join("blog/3/index.html")).unwrap();
        let fetched = FetchedPage::parse(&last, &selectors());
        assert_eq!(fetched.items.len(), 1);
        assert!(fetched.next_cursor.is_none());

        assert!(site.public_dir.join("posts/post-0/index.html").exists());
        assert!(site.public_dir.join("404.html").exists());
    }

    #[test]
    fn test_atom_feed_lists_newest_posts() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir, 10);
        let mut posts: Vec<_> = (0..25).map(post).collect();
        posts[24].title = "Fish & Chips".to_string();
        posts[24].content = "<p>a]]>b</p>".to_string();

        Generator::new(&site).generate(&posts).unwrap();

        let feed = fs::read_to_string(site.public_dir.join("atom.xml")).unwrap();
        assert!(feed.starts_with("<?xml"));
        assert_eq!(feed.matches("<entry>").count(), FEED_ENTRIES);
        assert!(feed.contains("<title>Fish &amp; Chips</title>"));
        assert!(feed.contains(r#"<link href="http://localhost:8080/posts/post-24/"/>"#));
        assert!(feed.contains("<updated>2024-01-25T00:00:00Z</updated>"));
        assert!(feed.contains("<![CDATA[<p>a]]]]><![CDATA[>b</p>]]>"));
        // Only the newest twenty
        assert!(feed.contains("/posts/post-5/"));
        assert!(!feed.contains("/posts/post-4/"));

        let newest = feed.find("/posts/post-24/").unwrap();
        let older = feed.find("/posts/post-23/").unwrap();
        assert!(newest < older);
    }

    #[test]
    fn test_generate_without_posts() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir, 10);

        Generator::new(&site).generate(&[]).unwrap();

        let html = fs::read_to_string(site.public_dir.join("blog/index.html")).unwrap();
        assert!(LivePage::parse(&html, &selectors()).is_none());
        assert!(html.contains("posts-container"));

        let feed = fs::read_to_string(site.public_dir.join("atom.xml")).unwrap();
        assert!(!feed.contains("<entry>"));
    }

    #[test]
    fn test_passthrough_copy() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir, 10);
        fs::create_dir_all(site.passthrough_dir.join("img")).unwrap();
        fs::write(site.passthrough_dir.join("img/logo.svg"), "<svg/>").unwrap();
        fs::write(site.passthrough_dir.join("robots.txt"), "User-agent: *").unwrap();

        Generator::new(&site).generate(&[]).unwrap();

        assert!(site.public_dir.join("img/logo.svg").exists());
        assert_eq!(
            fs::read_to_string(site.public_dir.join("robots.txt")).unwrap(),
            "User-agent: *"
        );
    }

    #[test]
    fn test_page_path_with_root_prefix() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig {
            root: "/site/".to_string(),
            ..SiteConfig::default()
        };
        let site = Site::with_config(dir.path().to_path_buf(), config);
        let generator = Generator::new(&site);

        assert_eq!(
            generator.page_path("/site/blog/2/"),
            site.public_dir.join("blog/2/index.html")
        );
        assert_eq!(
            generator.page_path("/site/"),
            site.public_dir.join("index.html")
        );
    }
}
