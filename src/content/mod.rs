//! Content module - front-matter, posts and markdown

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::FrontMatter;
pub use markdown::render_markdown;
pub use post::Post;
