//! Locale resolution.
//!
//! Locales are opaque ids taken from catalog discovery, kept in sorted order
//! and numbered; ordinals index the per-locale tables. Resolution is total:
//! any unknown or absent request lands on the default locale.

use std::collections::HashMap;

use crate::{error::Error, traits::LocaleCarrier};

/// Carrier key queried when no override is configured.
pub const DEFAULT_CARRIER_KEY: &str = "i18nLocale";

/// Maps requested locales onto the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleResolver {
    locales: Vec<String>,
    ordinals: HashMap<String, usize>,
    default_ordinal: usize,
    carrier_key: String,
}

impl LocaleResolver {
    /// Builds a resolver over `locales`. Without an override the default is
    /// the lexicographically first locale; an override that is not among the
    /// locales is an error.
    pub(crate) fn new(
        mut locales: Vec<String>,
        default_locale: Option<&str>,
        carrier_key: Option<&str>,
    ) -> Result<Self, Error> {
        locales.sort();
        locales.dedup();
        let ordinals: HashMap<String, usize> = locales
            .iter()
            .enumerate()
            .map(|(ordinal, locale)| (locale.clone(), ordinal))
            .collect();
        let default_ordinal = match default_locale {
            Some(locale) => *ordinals
                .get(locale)
                .ok_or_else(|| Error::unknown_default_locale(locale, &locales))?,
            None => 0,
        };
        Ok(LocaleResolver {
            locales,
            ordinals,
            default_ordinal,
            carrier_key: carrier_key.unwrap_or(DEFAULT_CARRIER_KEY).to_string(),
        })
    }

    /// Supported locales in sorted order; positions are the ordinals.
    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    pub fn is_supported(&self, locale: &str) -> bool {
        self.ordinals.contains_key(locale)
    }

    pub fn ordinal_of(&self, locale: &str) -> Option<usize> {
        self.ordinals.get(locale).copied()
    }

    /// Locale id for an ordinal previously produced by this resolver.
    pub fn locale_name(&self, ordinal: usize) -> &str {
        &self.locales[ordinal]
    }

    pub fn default_locale(&self) -> &str {
        &self.locales[self.default_ordinal]
    }

    pub fn default_ordinal(&self) -> usize {
        self.default_ordinal
    }

    /// The key looked up on carriers.
    pub fn carrier_key(&self) -> &str {
        &self.carrier_key
    }

    /// Ordinal of `requested` when supported, the default ordinal otherwise.
    pub fn resolve(&self, requested: &str) -> usize {
        self.ordinal_of(requested).unwrap_or(self.default_ordinal)
    }

    /// Resolves from ambient data, querying the carrier key exactly once.
    /// An absent carrier, an unset key, and an unsupported value all resolve
    /// to the default ordinal.
    pub fn resolve_from_carrier(&self, carrier: Option<&dyn LocaleCarrier>) -> usize {
        match carrier.and_then(|c| c.get(&self.carrier_key)) {
            Some(value) => self.resolve(value),
            None => self.default_ordinal,
        }
    }
}
