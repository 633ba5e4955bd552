//! Sitemap and robots.txt generation.
//!
//! One sitemap entry is produced per (route × locale) pair with a defined
//! path. Each entry lists every locale's version of the same route as an
//! hreflang alternate. Output follows the sitemap protocol with the `xhtml`
//! namespace for alternates, split into chunks of `size` URLs behind a
//! sitemap index when needed.

use crate::i18n::Locale;
use crate::routing::{PathTable, RouteKey};
use anyhow::{bail, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write as _;
use std::str::FromStr;

/// Hreflang link from one locale's page to another locale's version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateRef {
    pub hreflang: Locale,
    pub href: String,
}

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub route: RouteKey,
    pub locale: Locale,
    pub loc: String,
    pub alternate_refs: Vec<AlternateRef>,
}

/// `<changefreq>` values allowed by the sitemap protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

impl FromStr for ChangeFreq {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "always" => ChangeFreq::Always,
            "hourly" => ChangeFreq::Hourly,
            "daily" => ChangeFreq::Daily,
            "weekly" => ChangeFreq::Weekly,
            "monthly" => ChangeFreq::Monthly,
            "yearly" => ChangeFreq::Yearly,
            "never" => ChangeFreq::Never,
            other => bail!("Invalid sitemap changefreq: '{}'", other),
        })
    }
}

/// Rendering options shared by every sitemap file.
#[derive(Debug, Clone)]
pub struct SitemapOptions {
    pub changefreq: ChangeFreq,
    pub priority: f32,

    /// Maximum URLs per sitemap file
    pub size: usize,
}

impl Default for SitemapOptions {
    fn default() -> Self {
        Self {
            changefreq: ChangeFreq::Daily,
            priority: 0.7,
            size: 5000,
        }
    }
}

/// Enumerate every (route × locale) URL with its hreflang alternates.
///
/// Routes come in table order and locales in registry order. A locale
/// without a path for a route is skipped both as an entry and as an
/// alternate; `PathTable::new` rejects such gaps, so with a validated table
/// every route yields one entry per locale.
pub fn enumerate(table: &PathTable, site_url: &str) -> Vec<SitemapEntry> {
    let mut entries = Vec::new();

    for route in table.routes() {
        let locales = table.locales_for(route);

        let alternate_refs: Vec<AlternateRef> = locales
            .iter()
            .map(|locale| AlternateRef {
                hreflang: *locale,
                href: format!("{}{}", site_url, table.href(route, *locale)),
            })
            .collect();

        for locale in locales {
            entries.push(SitemapEntry {
                route,
                locale,
                loc: format!("{}{}", site_url, table.href(route, locale)),
                alternate_refs: alternate_refs.clone(),
            });
        }
    }

    entries
}

/// Render a `<urlset>` document.
pub fn render_urlset(
    entries: &[SitemapEntry],
    options: &SitemapOptions,
    lastmod: DateTime<Utc>,
) -> String {
    let lastmod = lastmod.to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" \
         xmlns:xhtml=\"http://www.w3.org/1999/xhtml\">\n",
    );

    for entry in entries {
        // Writing to a String cannot fail
        let _ = write!(
            xml,
            "<url><loc>{}</loc><lastmod>{}</lastmod><changefreq>{}</changefreq><priority>{:.1}</priority>",
            xml_escape(&entry.loc),
            lastmod,
            options.changefreq.as_str(),
            options.priority,
        );
        for alt in &entry.alternate_refs {
            let _ = write!(
                xml,
                "<xhtml:link rel=\"alternate\" hreflang=\"{}\" href=\"{}\"/>",
                alt.hreflang.tag(),
                xml_escape(&alt.href),
            );
        }
        xml.push_str("</url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Render a `<sitemapindex>` pointing at `sitemap-0.xml` … `sitemap-{n-1}.xml`.
pub fn render_index(site_url: &str, chunks: usize, lastmod: DateTime<Utc>) -> String {
    let lastmod = lastmod.to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for n in 0..chunks {
        let _ = writeln!(
            xml,
            "<sitemap><loc>{}</loc><lastmod>{}</lastmod></sitemap>",
            xml_escape(&format!("{}/sitemap-{}.xml", site_url, n)),
            lastmod,
        );
    }
    xml.push_str("</sitemapindex>\n");
    xml
}

/// Build every sitemap file as `(file name, contents)`.
///
/// A single chunk is served directly as `sitemap.xml`; more chunks become
/// `sitemap-{n}.xml` behind a `sitemap.xml` index.
pub fn build_files(
    table: &PathTable,
    site_url: &str,
    options: &SitemapOptions,
    lastmod: DateTime<Utc>,
) -> Vec<(String, String)> {
    let entries = enumerate(table, site_url);
    let size = options.size.max(1);

    if entries.len() <= size {
        return vec![(
            "sitemap.xml".to_string(),
            render_urlset(&entries, options, lastmod),
        )];
    }

    let chunks: Vec<&[SitemapEntry]> = entries.chunks(size).collect();
    let mut files = vec![(
        "sitemap.xml".to_string(),
        render_index(site_url, chunks.len(), lastmod),
    )];
    for (n, chunk) in chunks.iter().enumerate() {
        files.push((
            format!("sitemap-{}.xml", n),
            render_urlset(chunk, options, lastmod),
        ));
    }
    files
}

/// robots.txt allowing everything and advertising the sitemap.
pub fn render_robots(site_url: &str) -> String {
    format!(
        "# *\nUser-agent: *\nAllow: /\n\n# Host\nHost: {}\n\n# Sitemaps\nSitemap: {}/sitemap.xml\n",
        site_url, site_url
    )
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
