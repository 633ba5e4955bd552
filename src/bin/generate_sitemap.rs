//! Sitemap generator - writes sitemap*.xml and robots.txt for static hosting
//!
//! Usage:
//!   cargo run --bin generate-sitemap
//!
//! Optional environment variables:
//! - SITE_URL (defaults to http://localhost:3000)
//! - SITEMAP_OUT_DIR (defaults to public)
//! - SITEMAP_CHANGEFREQ, SITEMAP_PRIORITY, SITEMAP_SIZE (see the server config)

use anyhow::{Context, Result};
use chrono::Utc;
use localized_site::{config::Config, routing::PathTable, sitemap};
use std::fs;
use std::path::PathBuf;
use tracing::info;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("generate_sitemap=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let out_dir: PathBuf = std::env::var("SITEMAP_OUT_DIR")
        .unwrap_or_else(|_| "public".to_string())
        .into();

    let table = PathTable::canonical().context("Invalid path alias table")?;
    let files = sitemap::build_files(&table, &config.site_url, &config.sitemap, Utc::now());

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    for (name, xml) in &files {
        let path = out_dir.join(name);
        fs::write(&path, xml).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {}", path.display());
    }

    let robots_path = out_dir.join("robots.txt");
    fs::write(&robots_path, sitemap::render_robots(&config.site_url))
        .with_context(|| format!("Failed to write {}", robots_path.display()))?;
    info!("Wrote {}", robots_path.display());

    Ok(())
}
