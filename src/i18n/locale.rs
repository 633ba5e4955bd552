//! Locale type: validated language-region tag.
//!
//! A `Locale` can only be constructed from a tag the registry knows, so
//! holding one proves the value belongs to the closed set of supported
//! locales.

use crate::i18n::registry::{Direction, LocaleConfig, LocaleRegistry};
use anyhow::{bail, Result};
use std::fmt;

/// A validated, supported locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    /// Canonical tag from the registry (e.g., "de-DE")
    tag: &'static str,
}

impl Locale {
    pub const DE_DE: Locale = Locale { tag: "de-DE" };
    pub const EN_US: Locale = Locale { tag: "en-US" };
    pub const EN_GB: Locale = Locale { tag: "en-GB" };
    pub const FR_FR: Locale = Locale { tag: "fr-FR" };
    pub const AR_SA: Locale = Locale { tag: "ar-SA" };

    /// Create a Locale from a tag, ignoring ASCII case.
    ///
    /// # Returns
    /// * `Ok(Locale)` carrying the canonical casing of the tag
    /// * `Err` if the tag is not a supported locale
    pub fn from_tag(tag: &str) -> Result<Locale> {
        match Self::parse(tag) {
            Some(locale) => Ok(locale),
            None => bail!("Unsupported locale: '{}'", tag),
        }
    }

    /// Like [`Locale::from_tag`] but for lookups where a miss is expected.
    pub fn parse(tag: &str) -> Option<Locale> {
        LocaleRegistry::get()
            .get_by_tag(tag)
            .map(|config| Locale { tag: config.tag })
    }

    /// The fallback locale.
    pub fn default_locale() -> Locale {
        Locale {
            tag: LocaleRegistry::get().default_locale().tag,
        }
    }

    /// Every supported locale, in registry order.
    pub fn all() -> impl Iterator<Item = Locale> {
        LocaleRegistry::get()
            .list()
            .iter()
            .map(|config| Locale { tag: config.tag })
    }

    /// Canonical tag (e.g., "fr-FR").
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Full registry entry for this locale.
    ///
    /// # Panics
    /// Never for a `Locale` built through this module's constructors.
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get()
            .get_by_tag(self.tag)
            .expect("Locale tag should always be registered")
    }

    /// Primary language subtag (e.g., "de").
    pub fn language(&self) -> &'static str {
        self.config().language()
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn flag(&self) -> &'static str {
        self.config().flag
    }

    pub fn direction(&self) -> Direction {
        self.config().direction
    }

    pub fn is_default(&self) -> bool {
        self.config().is_default
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag)
    }
}
