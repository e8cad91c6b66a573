//! Built-in page templates

use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::{escape_attr, escape_html, time_tag};
use crate::listing::{
    Cursor, ATTR_CURRENT_PAGE, ATTR_LOADED_COUNT, ATTR_NEXT_PAGE, ATTR_TOTAL_COUNT,
};

const SUMMARY_CHARS: usize = 200;

/// Data for one listing page
pub struct ListingPageData<'a> {
    pub page_posts: &'a [Post],
    pub cursor: Cursor,
}

pub fn listing_page(config: &SiteConfig, data: &ListingPageData<'_>) -> String {
    let markup = &config.pagination.markup;

    let items: String = data
        .page_posts
        .iter()
        .map(|post| post_item(config, post))
        .collect();

    let trigger = data
        .cursor
        .next_page_url
        .as_ref()
        .map(|next| {
            format!(
                r#"    <button id="{id}" type="button" {a_next}="{next}" {a_current}="{current}" {a_loaded}="{loaded}" {a_total}="{total}">Load more articles</button>
"#,
                id = markup.trigger_id,
                a_next = ATTR_NEXT_PAGE,
                next = escape_attr(next),
                a_current = ATTR_CURRENT_PAGE,
                current = data.cursor.current_page,
                a_loaded = ATTR_LOADED_COUNT,
                loaded = data.cursor.loaded_count,
                a_total = ATTR_TOTAL_COUNT,
                total = data.cursor.total_count,
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"  <main>
    <h1>{title}</h1>
    <div id="{container}">
{items}    </div>
    <div class="{pagination}">
    <p id="{progress}">{progress_text}</p>
{trigger}    <div id="{indicator}" class="{hidden}">Loading...</div>
    </div>
  </main>
"#,
        title = escape_html(&config.title),
        container = markup.container_id,
        items = items,
        pagination = markup.pagination_class,
        progress = markup.progress_id,
        progress_text = escape_html(&data.cursor.progress_text()),
        trigger = trigger,
        indicator = markup.loading_indicator_id,
        hidden = markup.hidden_class,
    );

    layout(config, &config.title, &body)
}

fn post_item(config: &SiteConfig, post: &Post) -> String {
    format!(
        r#"      <article class="{class}">
        <h2><a href="{url}">{title}</a></h2>
        {date}
        <p>{summary}</p>
      </article>
"#,
        class = config.pagination.markup.item_class,
        url = escape_attr(&config.post_url(&post.slug)),
        title = escape_html(&post.title),
        date = time_tag(&post.date, &config.date_format),
        summary = escape_html(&post.summary(SUMMARY_CHARS)),
    )
}

pub fn post_page(config: &SiteConfig, post: &Post) -> String {
    let image = post
        .featured_image
        .as_ref()
        .map(|src| {
            format!(
                r#"    <img src="{}" alt="{}">
"#,
                escape_attr(src),
                escape_attr(&post.title)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"  <main>
    <article>
    <h1>{title}</h1>
    {date}
{image}    {content}
    </article>
    <p><a href="{back}">Back to all posts</a></p>
  </main>
"#,
        title = escape_html(&post.title),
        date = time_tag(&post.date, &config.date_format),
        image = image,
        content = post.content,
        back = escape_attr(&config.listing_url(1)),
    );

    layout(config, &post.title, &body)
}

pub fn not_found_page(config: &SiteConfig) -> String {
    let body = format!(
        r#"  <main>
    <h1>Page not found</h1>
    <p><a href="{}">Back to all posts</a></p>
  </main>
"#,
        escape_attr(&config.listing_url(1))
    );
    layout(config, "Page not found", &body)
}

fn layout(config: &SiteConfig, title: &str, body: &str) -> String {
    let page_title = if title == config.title {
        escape_html(title)
    } else {
        format!("{} | {}", escape_html(title), escape_html(&config.title))
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta name="description" content="{description}">
  <title>{page_title}</title>
  <link rel="alternate" type="application/atom+xml" title="{feed_title}" href="{feed_url}">
</head>
<body>
{body}</body>
</html>
"#,
        description = escape_attr(&config.description),
        page_title = page_title,
        feed_title = escape_attr(&config.title),
        feed_url = escape_attr(&config.feed_url()),
        body = body,
    )
}
