//! Create a new draft post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::helpers::{date_iso, slugify, today};
use crate::Site;

/// Create a draft post for `title` and return its path
pub fn create_post(site: &Site, title: &str) -> Result<PathBuf> {
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("Please provide a post title\nUsage: blog-pager new \"Your Post Title\"");
    }

    let slug = slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable slug", title);
    }

    fs::create_dir_all(&site.posts_dir)?;

    let file_name = format!("{}.md", slug);
    let file_path = site.posts_dir.join(&file_name);

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("A post with this slug already exists: {}", file_name);
    }

    let date = date_iso(&today());
    fs::write(&file_path, scaffold(title, &date))?;

    tracing::debug!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Run the new command
pub fn run(site: &Site, words: &[String]) -> Result<()> {
    let title = words.join(" ");
    let path = create_post(site, &title)?;

    let relative = path.strip_prefix(&site.base_dir).unwrap_or(&path);
    println!("✅ New draft post created: {}", relative.display());
    println!("📝 Title: {}", title.trim());
    println!("📅 Date: {}", date_iso(&today()));
    println!("\nYou can now edit the post at: {}", relative.display());

    Ok(())
}

fn scaffold(title: &str, date: &str) -> String {
    format!(
        r#"---
layout: post
title: {title}
excerpt:
date: {date}
updatedDate: {date}
featuredImage:
draft: true
tags:
  - post
---

Write your post content here...
"#
    )
}
