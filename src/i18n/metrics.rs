//! Message lookup metrics.
//!
//! Counts how often page rendering asked for a translation and how often
//! that lookup had to fall back, so missing keys show up in `/health`
//! instead of silently rendering key names.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for message lookups. Owned by the `MessageCatalog`.
#[derive(Debug, Default)]
pub struct MessageMetrics {
    /// Lookups answered from the requested locale's bundle
    hits: AtomicUsize,

    /// Lookups answered from the default locale's bundle
    fallbacks: AtomicUsize,

    /// Lookups that found the key in no bundle and rendered the key itself
    misses: AtomicUsize,
}

impl MessageMetrics {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.hits();
        let fallbacks = self.fallbacks();
        let misses = self.misses();
        let total = hits + fallbacks + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            lookups: total,
            hits,
            fallbacks,
            misses,
            hit_rate,
        }
    }
}

/// Snapshot of the message lookup counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub lookups: usize,
    pub hits: usize,
    pub fallbacks: usize,
    pub misses: usize,

    /// Share of lookups served by the requested locale, as a percentage (0-100)
    pub hit_rate: f64,
}
