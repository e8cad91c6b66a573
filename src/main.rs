//! CLI entry point for blog-pager

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_pager::commands::load::LoadOptions;

#[derive(Parser)]
#[command(name = "blog-pager")]
#[command(version)]
#[command(about = "Blog toolchain with an incremental listing loader", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new draft post
    New {
        /// Title of the new post
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate,

    /// Generate and serve the site locally
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List posts
    List {
        /// Include drafts
        #[arg(long)]
        drafts: bool,
    },

    /// Load further listing pages from a live listing page
    Load {
        /// URL of the listing page to start from
        url: String,

        /// Keep loading until the end of the listing
        #[arg(short, long)]
        follow: bool,

        /// Print the resulting page state as JSON
        #[arg(long)]
        json: bool,

        /// Write the merged items to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blog_pager=debug,info"
    } else {
        "blog_pager=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::New { title } => {
            let site = blog_pager::Site::new(&base_dir)?;
            blog_pager::commands::new::run(&site, &title)?;
        }

        Commands::Generate => {
            let site = blog_pager::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");
            site.generate()?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip } => {
            let site = blog_pager::Site::new(&base_dir)?;

            tracing::info!("Generating static files...");
            site.generate()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            blog_pager::server::start(&site, &ip, port).await?;
        }

        Commands::List { drafts } => {
            let site = blog_pager::Site::new(&base_dir)?;
            blog_pager::commands::list::run(&site, drafts)?;
        }

        Commands::Load {
            url,
            follow,
            json,
            output,
        } => {
            let site = blog_pager::Site::new(&base_dir)?;
            let options = LoadOptions {
                url,
                follow,
                json,
                output,
            };
            blog_pager::commands::load::run(&site, &options).await?;
        }

        Commands::Version => {
            println!("blog-pager version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
