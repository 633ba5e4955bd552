//! Internationalization (i18n): supported locales and their message bundles.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the supported locales and their metadata
//! - `locale`: Validated `Locale` type; only registry tags can be constructed
//! - `messages`: Per-locale JSON bundles flattened to dot-namespaced keys
//! - `validator`: Bundle completeness checks against the default locale
//! - `metrics`: Counters for message lookups that had to fall back
//!
//! # Example
//!
//! ```rust,ignore
//! use localized_site::i18n::{Locale, MessageCatalog};
//!
//! let catalog = MessageCatalog::load_dir(Path::new("messages"))?;
//! let title = catalog.translate(Locale::from_tag("de-DE")?, "HomePage.title");
//! ```

mod locale;
mod messages;
mod metrics;
mod registry;
mod validator;

pub use locale::Locale;
pub use messages::{interpolate, MessageBundle, MessageCatalog, MessageError, Translator};
pub use metrics::{MessageMetrics, MetricsReport};
pub use registry::{Direction, LocaleConfig, LocaleRegistry};
pub use validator::{BundleValidator, ValidationReport};

#[cfg(test)]
pub(crate) use messages::tests::test_catalog as messages_for_tests;
