//! Markdown rendering with syntax highlighting and heading anchors

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::helpers::escape_html;

const THEME_NAME: &str = "base16-ocean.dark";

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEME_SET: ThemeSet = ThemeSet::load_defaults();
}

/// Render markdown to HTML
///
/// Fenced code blocks are highlighted with syntect. Headings without an
/// explicit `{#id}` get an `id` derived from their text, made unique within
/// the document by a `-1`, `-2`, ... suffix.
pub fn render_markdown(markdown: &str) -> String {
    // Front-matter is handled separately in FrontMatter::parse()
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
        | Options::ENABLE_HEADING_ATTRIBUTES;
    let parser = Parser::new_ext(markdown, options);

    let mut events: Vec<Event> = Vec::new();
    let mut code_block: Option<(Option<String>, String)> = None;
    let mut heading: Option<(Tag, Vec<Event>, String)> = None;
    let mut used_ids: HashMap<String, usize> = HashMap::new();

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.trim().is_empty() => {
                        lang.split_whitespace().next().map(str::to_string)
                    }
                    _ => None,
                };
                code_block = Some((lang, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((lang, code)) = code_block.take() {
                    events.push(Event::Html(CowStr::from(highlight_code(
                        &code,
                        lang.as_deref(),
                    ))));
                }
            }
            Event::Text(text) if code_block.is_some() => {
                if let Some((_, code)) = code_block.as_mut() {
                    code.push_str(&text);
                }
            }
            Event::Start(tag @ Tag::Heading { .. }) => {
                heading = Some((tag, Vec::new(), String::new()));
            }
            Event::End(TagEnd::Heading(level)) => {
                if let Some((tag, inner, text)) = heading.take() {
                    events.push(Event::Start(with_anchor(tag, &text, &mut used_ids)));
                    events.extend(inner);
                }
                events.push(Event::End(TagEnd::Heading(level)));
            }
            event => match heading.as_mut() {
                Some((_, inner, text)) => {
                    if let Event::Text(t) | Event::Code(t) = &event {
                        text.push_str(t);
                    }
                    inner.push(event);
                }
                None => events.push(event),
            },
        }
    }

    let mut output = String::new();
    html::push_html(&mut output, events.into_iter());
    output
}

/// Give a heading tag an id unless it already carries one
fn with_anchor<'a>(tag: Tag<'a>, text: &str, used: &mut HashMap<String, usize>) -> Tag<'a> {
    match tag {
        Tag::Heading {
            level,
            id: None,
            classes,
            attrs,
        } => Tag::Heading {
            level,
            id: Some(CowStr::from(unique_anchor(text, used))),
            classes,
            attrs,
        },
        tag => tag,
    }
}

fn unique_anchor(text: &str, used: &mut HashMap<String, usize>) -> String {
    let base = anchor_slug(text);
    let seen = used.entry(base.clone()).or_insert(0);
    let anchor = if *seen == 0 {
        base
    } else {
        format!("{}-{}", base, seen)
    };
    *seen += 1;
    anchor
}

/// Heading text to anchor id: lowercase, whitespace runs become `-`
pub fn anchor_slug(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '<' | '>' | '&' | '?' | '#' | '%'))
        .collect()
}

/// Highlight a code block
fn highlight_code(code: &str, lang: Option<&str>) -> String {
    let lang = lang.unwrap_or("text");

    let syntax = SYNTAX_SET
        .find_syntax_by_token(lang)
        .or_else(|| SYNTAX_SET.find_syntax_by_extension(lang))
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

    let highlighted = theme()
        .and_then(|theme| highlighted_html_for_string(code, &SYNTAX_SET, syntax, theme).ok());

    match highlighted {
        Some(html) => format!(
            r#"<div class="highlight language-{}">{}</div>"#,
            escape_html(lang),
            html
        ),
        None => format!(
            r#"<pre class="language-{lang}"><code class="language-{lang}">{}</code></pre>"#,
            escape_html(code),
            lang = escape_html(lang)
        ),
    }
}

fn theme() -> Option<&'static Theme> {
    THEME_SET
        .themes
        .get(THEME_NAME)
        .or_else(|| THEME_SET.themes.values().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_markdown() {
        let html = render_markdown("# Title\n\nSome *text*.");
        assert!(html.contains(r#"<h1 id="title">Title</h1>"#));
        assert!(html.contains("<em>text</em>"));
    }

    #[test]
    fn test_smart_punctuation() {
        let html = render_markdown("It's \"quoted\"");
        assert!(html.contains('’'));
        assert!(html.contains('“'));
    }

    #[test]
    fn test_heading_anchors() {
        let html = render_markdown("## Getting Started\n\n## Getting Started\n\n### Use `cargo`\n");
        assert!(html.contains(r#"<h2 id="getting-started">Getting Started</h2>"#));
        assert!(html.contains(r#"<h2 id="getting-started-1">Getting Started</h2>"#));
        assert!(html.contains(r#"<h3 id="use-cargo">Use <code>cargo</code></h3>"#));
    }

    #[test]
    fn test_explicit_heading_id_is_kept() {
        let html = render_markdown("## Setup {#install}\n");
        assert!(html.contains(r#"<h2 id="install">Setup</h2>"#));
    }

    #[test]
    fn test_code_block_is_highlighted() {
        let html = render_markdown("```rust\nfn main() {}\n```\n");
        assert!(html.contains(r#"<div class="highlight language-rust">"#));
        assert!(html.contains("<pre style="));
        assert!(html.contains("<span style="));
        assert!(html.contains("main"));
        assert!(!html.contains("<code class=\"language-rust\">fn main"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_text() {
        let html = render_markdown("```nosuchlang\n<b>&</b>\n```\n");
        assert!(html.contains(r#"class="highlight language-nosuchlang""#));
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>&</b>"));
    }

    #[test]
    fn test_anchor_slug() {
        assert_eq!(anchor_slug("  Hello   World "), "hello-world");
        assert_eq!(anchor_slug("What's new?"), "whats-new");
    }
}
