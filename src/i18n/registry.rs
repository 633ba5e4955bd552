//! Locale registry: Single source of truth for all supported locales.
//!
//! Every consumer (the request resolver, the path alias table, the message
//! loader and the sitemap) reads the locale list from here. The registry is
//! a `OnceLock` singleton built from a static table and never mutated.

use std::sync::OnceLock;

/// Writing direction of a locale's script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    /// Value for the HTML `dir` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

/// Configuration for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// Language-region tag in canonical casing (e.g., "de-DE", "en-GB")
    pub tag: &'static str,

    /// English name of the locale (e.g., "German (Switzerland)")
    pub name: &'static str,

    /// Name shown in the language switcher (e.g., "Deutsch (CH)")
    pub native_name: &'static str,

    /// Flag emoji shown next to the native name
    pub flag: &'static str,

    /// Script direction used for the `dir` attribute
    pub direction: Direction,

    /// Whether this is the fallback locale (exactly one must be true)
    pub is_default: bool,
}

impl LocaleConfig {
    /// Primary language subtag, e.g. "de" for "de-AT".
    pub fn language(&self) -> &'static str {
        self.tag.split('-').next().unwrap_or(self.tag)
    }
}

/// Global locale registry singleton.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Look up a locale by tag, ignoring ASCII case.
    ///
    /// # Returns
    /// * `Some(&LocaleConfig)` if the tag names a supported locale
    /// * `None` otherwise
    pub fn get_by_tag(&self, tag: &str) -> Option<&LocaleConfig> {
        self.locales
            .iter()
            .find(|locale| locale.tag.eq_ignore_ascii_case(tag))
    }

    /// All supported locales, in declaration order.
    pub fn list(&self) -> &[LocaleConfig] {
        &self.locales
    }

    /// The default (fallback) locale configuration.
    ///
    /// # Panics
    /// Panics if the static table does not mark exactly one default locale.
    /// That is a build-time configuration error, covered by the tests below.
    pub fn default_locale(&self) -> &LocaleConfig {
        let defaults: Vec<_> = self.locales.iter().filter(|l| l.is_default).collect();

        match defaults.len() {
            0 => panic!("No default locale found in registry"),
            1 => defaults[0],
            _ => panic!("Multiple default locales found in registry"),
        }
    }

    /// Check whether a tag names a supported locale.
    pub fn is_supported(&self, tag: &str) -> bool {
        self.get_by_tag(tag).is_some()
    }

    /// First locale (in declaration order) whose primary language matches.
    pub fn first_with_language(&self, language: &str) -> Option<&LocaleConfig> {
        self.locales
            .iter()
            .find(|locale| locale.language().eq_ignore_ascii_case(language))
    }
}

fn ltr(
    tag: &'static str,
    name: &'static str,
    native_name: &'static str,
    flag: &'static str,
) -> LocaleConfig {
    LocaleConfig {
        tag,
        name,
        native_name,
        flag,
        direction: Direction::Ltr,
        is_default: false,
    }
}

/// The canonical locale set. Order matters: it drives the language switcher,
/// sitemap output and alias disambiguation for unprefixed paths.
fn default_locales() -> Vec<LocaleConfig> {
    vec![
        ltr("de-DE", "German (Germany)", "Deutsch", "🇩🇪"),
        ltr("de-CH", "German (Switzerland)", "Deutsch (CH)", "🇨🇭"),
        ltr("de-AT", "German (Austria)", "Deutsch (AT)", "🇦🇹"),
        LocaleConfig {
            is_default: true,
            ..ltr("en-US", "English (United States)", "English (US)", "🇺🇸")
        },
        ltr("en-GB", "English (United Kingdom)", "English (GB)", "🇬🇧"),
        ltr("es-ES", "Spanish", "Español", "🇪🇸"),
        ltr("tr-TR", "Turkish", "Türkçe", "🇹🇷"),
        ltr("sq-AL", "Albanian", "Shqip", "🇦🇱"),
        ltr("it-IT", "Italian", "Italiano", "🇮🇹"),
        ltr("fr-FR", "French", "Français", "🇫🇷"),
        ltr("hr-HR", "Croatian", "Hrvatski", "🇭🇷"),
        ltr("bs-BA", "Bosnian", "Bosanski", "🇧🇦"),
        LocaleConfig {
            direction: Direction::Rtl,
            ..ltr("ar-SA", "Arabic (Saudi Arabia)", "العربية", "🇸🇦")
        },
    ]
}
