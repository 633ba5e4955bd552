//! Message bundle completeness validation.
//!
//! Every bundle is compared against the default locale's bundle, which is
//! the reference for which keys exist and which placeholders each string
//! takes.

use crate::i18n::{Locale, MessageBundle, MessageCatalog};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Keys present in the reference bundle but missing here
    pub errors: Vec<String>,

    /// Non-fatal findings: extra keys, placeholder drift, empty strings
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for message bundles.
pub struct BundleValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl BundleValidator {
    /// Compare `candidate` against `reference`.
    ///
    /// Checks that:
    /// - every reference key exists in the candidate (error)
    /// - the candidate has no keys the reference lacks (warning)
    /// - each shared string uses the same `{placeholders}` (warning)
    /// - no candidate string is empty (warning)
    pub fn validate(reference: &MessageBundle, candidate: &MessageBundle) -> ValidationReport {
        let mut report = ValidationReport::new();

        for key in reference.keys() {
            let Some(text) = candidate.get(key) else {
                report.errors.push(format!("Missing key '{}'", key));
                continue;
            };

            if text.trim().is_empty() {
                report.warnings.push(format!("Empty string at '{}'", key));
            }

            let expected = Self::extract_placeholders(reference.get(key).unwrap_or_default());
            let actual = Self::extract_placeholders(text);
            if expected != actual {
                report.warnings.push(format!(
                    "Placeholder mismatch at '{}': expected {:?}, found {:?}",
                    key, expected, actual
                ));
            }
        }

        for key in candidate.keys() {
            if reference.get(key).is_none() {
                report.warnings.push(format!("Unknown key '{}'", key));
            }
        }

        report
    }

    /// Validate every non-default bundle against the default locale's bundle.
    ///
    /// Only locales with findings are returned.
    pub fn validate_catalog(catalog: &MessageCatalog) -> Vec<(Locale, ValidationReport)> {
        let default = Locale::default_locale();
        let reference = catalog.bundle(default);

        Locale::all()
            .filter(|locale| *locale != default)
            .map(|locale| (locale, Self::validate(reference, catalog.bundle(locale))))
            .filter(|(_, report)| !report.is_clean())
            .collect()
    }

    /// Extract the set of `{name}` placeholders from a string.
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX
            .get_or_init(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("valid placeholder regex"));

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}
