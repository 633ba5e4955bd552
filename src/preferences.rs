//! User preferences: chosen locale and visual theme.
//!
//! Preferences live on the client. The server only reads them from request
//! cookies and writes them back through `Set-Cookie`, behind the
//! [`PreferenceStore`] trait so handlers can be tested against an in-memory
//! store.

use crate::i18n::Locale;
use axum::http::{header::COOKIE, HeaderMap};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Cookie lifetime for stored preferences: one year.
pub const PREFERENCE_MAX_AGE_SECS: u64 = 31_536_000;

/// Which preference a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    Locale,
    Theme,
}

impl PreferenceKey {
    /// Name of the cookie holding this preference.
    pub fn cookie_name(&self) -> &'static str {
        match self {
            PreferenceKey::Locale => "locale",
            PreferenceKey::Theme => "theme",
        }
    }
}

/// Visual theme. `System` defers to the OS light/dark setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    System,
    Nord,
    Sakura,
    Midnight,
    Earthy,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::System,
        Theme::Nord,
        Theme::Sakura,
        Theme::Midnight,
        Theme::Earthy,
        Theme::Dark,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Theme::System => "system",
            Theme::Nord => "nord",
            Theme::Sakura => "sakura",
            Theme::Midnight => "midnight",
            Theme::Earthy => "earthy",
            Theme::Dark => "dark",
        }
    }

    /// Value for the `data-theme` attribute, `None` for the system theme.
    pub fn data_attribute(&self) -> Option<&'static str> {
        match self {
            Theme::System => None,
            other => Some(other.key()),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.key() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown theme: '{}'", s))
    }
}

/// Get/set/clear access to persisted preferences.
pub trait PreferenceStore {
    fn get(&self, key: PreferenceKey) -> Option<String>;
    fn set(&mut self, key: PreferenceKey, value: &str);
    fn clear(&mut self, key: PreferenceKey);

    /// Stored locale, if it names a supported one.
    fn locale(&self) -> Option<Locale> {
        self.get(PreferenceKey::Locale)
            .and_then(|tag| Locale::parse(&tag))
    }

    /// Stored theme; unknown or absent values mean `System`.
    fn theme(&self) -> Theme {
        self.get(PreferenceKey::Theme)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    fn set_locale(&mut self, locale: Locale) {
        self.set(PreferenceKey::Locale, locale.tag());
    }

    /// Store `theme`. Choosing `System` clears the stored value.
    fn set_theme(&mut self, theme: Theme) {
        match theme {
            Theme::System => self.clear(PreferenceKey::Theme),
            other => self.set(PreferenceKey::Theme, other.key()),
        }
    }
}

/// Process-local store used in tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPreferenceStore {
    values: HashMap<PreferenceKey, String>,
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, key: PreferenceKey) -> Option<String> {
        self.values.get(&key).cloned()
    }

    fn set(&mut self, key: PreferenceKey, value: &str) {
        self.values.insert(key, value.to_string());
    }

    fn clear(&mut self, key: PreferenceKey) {
        self.values.remove(&key);
    }
}

/// Store backed by the request's `Cookie` header. Writes are collected as
/// `Set-Cookie` values for the response.
#[derive(Debug, Default, Clone)]
pub struct CookiePreferenceStore {
    values: HashMap<String, String>,
    set_cookies: Vec<String>,
}

impl CookiePreferenceStore {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let values = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|header| header.split(';'))
            .filter_map(|cookie| {
                let (name, value) = cookie.trim().split_once('=')?;
                Some((name.to_string(), value.to_string()))
            })
            .collect();

        Self {
            values,
            set_cookies: Vec::new(),
        }
    }

    /// `Set-Cookie` header values produced by `set`/`clear`, in call order.
    pub fn set_cookie_headers(&self) -> &[String] {
        &self.set_cookies
    }
}

impl PreferenceStore for CookiePreferenceStore {
    fn get(&self, key: PreferenceKey) -> Option<String> {
        self.values.get(key.cookie_name()).cloned()
    }

    fn set(&mut self, key: PreferenceKey, value: &str) {
        let name = key.cookie_name();
        self.values.insert(name.to_string(), value.to_string());
        self.set_cookies.push(format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            name, value, PREFERENCE_MAX_AGE_SECS
        ));
    }

    fn clear(&mut self, key: PreferenceKey) {
        let name = key.cookie_name();
        self.values.remove(name);
        self.set_cookies
            .push(format!("{}=; Path=/; Max-Age=0; SameSite=Lax", name));
    }
}
