//! CLI commands implementation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use url::Url;

use crate::config::{Config, Settings};
use crate::enhance::Enhancer;
use crate::fragments::{FragmentFetcher, HttpFetcher};
use crate::page::{self, Document};

#[derive(Parser)]
#[command(name = "siteshell")]
#[command(about = "Shared page-shell assembly and enhancement engine")]
#[command(version)]
pub struct Cli {
    /// Config file path (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a page: load its fragments, run the enhancers, report
    Compose {
        /// Page HTML file to enhance
        page: PathBuf,

        /// Base URL fragments are fetched from
        #[arg(long, env = "SITESHELL_BASE_URL")]
        base_url: String,

        /// Path of the current page, for active-nav-link marking
        #[arg(long)]
        page_path: Option<String>,
    },

    /// Probe the configured fragment endpoints and report their status
    Check {
        /// Base URL fragments are fetched from
        #[arg(long, env = "SITESHELL_BASE_URL")]
        base_url: String,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::default();
    if let Some(ref path) = cli.config {
        let config = Config::load_from_path(path)
            .await
            .map_err(anyhow::Error::msg)?;
        config.apply_to_settings(&mut settings);
    }

    match cli.command {
        Commands::Compose {
            page,
            base_url,
            page_path,
        } => compose(settings, page, &base_url, page_path).await,
        Commands::Check { base_url } => check(settings, &base_url).await,
    }
}

fn build_fetcher(settings: &Settings, base_url: &str) -> anyhow::Result<Arc<HttpFetcher>> {
    let base = Url::parse(base_url).with_context(|| format!("Invalid base URL '{}'", base_url))?;
    let fetcher = HttpFetcher::new(
        base,
        settings.request_timeout_duration(),
        &settings.user_agent,
    )?;
    Ok(Arc::new(fetcher))
}

async fn compose(
    mut settings: Settings,
    page: PathBuf,
    base_url: &str,
    page_path: Option<String>,
) -> anyhow::Result<()> {
    if let Some(page_path) = page_path {
        settings.page_path = page_path;
    }

    let html = tokio::fs::read_to_string(&page)
        .await
        .with_context(|| format!("Failed to read page '{}'", page.display()))?;
    let doc = page::shared(Document::from_html(&html));

    let fetcher = build_fetcher(&settings, base_url)?;
    let mut enhancer = Enhancer::new(doc.clone(), fetcher, settings);
    let outcomes = enhancer.bootstrap().await;

    println!("Composed {}", page.display());
    for (name, outcome) in &outcomes {
        println!("  fragment {:<12} {:?}", name, outcome);
    }

    {
        let d = doc.read().await;
        println!("  activated scripts   {}", d.activated_scripts().len());
    }
    println!(
        "  mobile menu         {}",
        if enhancer.menu().is_some() {
            "mounted"
        } else {
            "absent"
        }
    );
    match enhancer.slider() {
        Some(slider) => println!("  slider              {} slide(s)", slider.slide_count()),
        None => println!("  slider              absent"),
    }

    enhancer.shutdown().await;
    Ok(())
}

async fn check(settings: Settings, base_url: &str) -> anyhow::Result<()> {
    let fetcher = build_fetcher(&settings, base_url)?;

    let mut failed = 0usize;
    for spec in &settings.fragments {
        match fetcher.fetch(&spec.source_path).await {
            Ok(body) => println!("ok   {:<12} {} ({} bytes)", spec.name, spec.source_path, body.len()),
            Err(err) => {
                failed += 1;
                println!("fail {:<12} {} ({})", spec.name, spec.source_path, err);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} fragment(s) failed", failed, settings.fragments.len());
    }
    Ok(())
}
