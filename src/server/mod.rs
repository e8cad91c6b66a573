//! Development server

use anyhow::Result;
use axum::handler::HandlerWithoutStateExt;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::Site;

/// Router serving the public directory, answering misses with `404.html`
pub fn router(public_dir: &Path) -> Router {
    let dir = public_dir.to_path_buf();
    let not_found = move || not_found_page(dir.clone());
    let files = ServeDir::new(public_dir)
        .append_index_html_on_directories(true)
        .not_found_service(not_found.into_service());

    Router::new()
        .fallback_service(files)
        .layer(TraceLayer::new_for_http())
}

/// 404 response with the generated `404.html`, or plain text without one
async fn not_found_page(public_dir: PathBuf) -> Response {
    match tokio::fs::read_to_string(public_dir.join("404.html")).await {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::debug!("No 404.html in {:?}: {}", public_dir, e);
            (StatusCode::NOT_FOUND, "404 Not Found").into_response()
        }
    }
}

/// Start the development server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}{}", ip, port, site.config.listing_url(1));
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(&site.public_dir)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    async fn spawn(public_dir: &Path) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(public_dir);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_serves_index_and_custom_404() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("blog/2")).unwrap();
        fs::write(dir.path().join("blog/2/index.html"), "page two").unwrap();
        fs::write(dir.path().join("404.html"), "custom missing page").unwrap();

        let base = spawn(dir.path()).await;

        let found = reqwest::get(format!("{}/blog/2/", base)).await.unwrap();
        assert_eq!(found.status().as_u16(), 200);
        assert_eq!(found.text().await.unwrap(), "page two");

        let missing = reqwest::get(format!("{}/blog/9/", base)).await.unwrap();
        assert_eq!(missing.status().as_u16(), 404);
        assert_eq!(
            missing.headers()["content-type"].to_str().unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(missing.text().await.unwrap(), "custom missing page");
    }

    #[tokio::test]
    async fn test_plain_text_404_without_page() {
        let dir = TempDir::new().unwrap();
        let base = spawn(dir.path()).await;

        let missing = reqwest::get(format!("{}/nope/", base)).await.unwrap();
        assert_eq!(missing.status().as_u16(), 404);
        assert_eq!(missing.text().await.unwrap(), "404 Not Found");
    }
}
