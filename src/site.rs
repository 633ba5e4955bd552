//! The assembled, validated site configuration.
//!
//! Built once at startup from [`Config`] and shared read-only by every
//! request. Construction fails fast on configuration defects: an
//! incomplete path table, a missing message bundle, or (in strict mode) an
//! incomplete bundle.

use crate::config::Config;
use crate::i18n::{BundleValidator, MessageCatalog};
use crate::routing::PathTable;
use crate::sitemap::{self, SitemapOptions};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use tracing::{info, warn};

pub struct Site {
    pub site_url: String,
    pub table: PathTable,
    pub catalog: MessageCatalog,

    /// Pre-rendered `(file name, xml)` pairs
    sitemap_files: Vec<(String, String)>,
    robots: String,
}

impl Site {
    /// Load the path table and message bundles named by `config`.
    pub fn load(config: &Config) -> Result<Self> {
        let table = PathTable::canonical().context("Invalid path alias table")?;
        let catalog = MessageCatalog::load_dir(&config.messages_dir).with_context(|| {
            format!(
                "Failed to load message bundles from {}",
                config.messages_dir.display()
            )
        })?;

        Self::new(
            &config.site_url,
            table,
            catalog,
            &config.sitemap,
            config.strict_messages,
        )
    }

    /// Assemble a site from validated parts.
    ///
    /// Bundle findings are logged; with `strict_messages` any missing key
    /// is fatal.
    pub fn new(
        site_url: &str,
        table: PathTable,
        catalog: MessageCatalog,
        sitemap_options: &SitemapOptions,
        strict_messages: bool,
    ) -> Result<Self> {
        let findings = BundleValidator::validate_catalog(&catalog);
        let mut incomplete = 0;
        for (locale, report) in &findings {
            for error in &report.errors {
                warn!("Message bundle {}: {}", locale, error);
            }
            for warning in &report.warnings {
                warn!("Message bundle {}: {}", locale, warning);
            }
            if report.has_errors() {
                incomplete += 1;
            }
        }

        if strict_messages && incomplete > 0 {
            bail!("{} message bundle(s) are missing keys", incomplete);
        }

        let sitemap_files = sitemap::build_files(&table, site_url, sitemap_options, Utc::now());
        let robots = sitemap::render_robots(site_url);

        info!(
            "Site ready: {} routes, {} sitemap file(s)",
            table.routes().count(),
            sitemap_files.len()
        );

        Ok(Self {
            site_url: site_url.to_string(),
            table,
            catalog,
            sitemap_files,
            robots,
        })
    }

    /// Pre-rendered sitemap file by name (e.g., "sitemap.xml", "sitemap-0.xml").
    pub fn sitemap_file(&self, name: &str) -> Option<&str> {
        self.sitemap_files
            .iter()
            .find(|(file, _)| file == name)
            .map(|(_, xml)| xml.as_str())
    }

    pub fn robots(&self) -> &str {
        &self.robots
    }
}
