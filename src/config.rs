use crate::sitemap::{ChangeFreq, SitemapOptions};
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Site
    pub site_url: String,
    pub port: u16,

    // Messages
    pub messages_dir: PathBuf,
    pub strict_messages: bool,

    // Sitemap
    pub sitemap: SitemapOptions,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Base URL used for absolute sitemap links, without trailing slash
            site_url: normalize_site_url(
                &std::env::var("SITE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
            ),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),

            messages_dir: std::env::var("MESSAGES_DIR")
                .unwrap_or_else(|_| "messages".to_string())
                .into(),
            strict_messages: std::env::var("STRICT_MESSAGES")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),

            sitemap: SitemapOptions {
                changefreq: match std::env::var("SITEMAP_CHANGEFREQ") {
                    Ok(v) => v
                        .parse::<ChangeFreq>()
                        .context("SITEMAP_CHANGEFREQ is invalid")?,
                    Err(_) => ChangeFreq::Daily,
                },
                priority: match std::env::var("SITEMAP_PRIORITY") {
                    Ok(v) => parse_priority(&v).context("SITEMAP_PRIORITY is invalid")?,
                    Err(_) => 0.7,
                },
                size: std::env::var("SITEMAP_SIZE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .filter(|size: &usize| *size > 0)
                    .unwrap_or(5000),
            },
        })
    }
}

fn normalize_site_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_priority(value: &str) -> Result<f32> {
    let priority: f32 = value.trim().parse()?;
    if !(0.0..=1.0).contains(&priority) {
        anyhow::bail!("priority must be between 0.0 and 1.0, got {}", priority);
    }
    Ok(priority)
}
