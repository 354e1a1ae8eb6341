//! Catalog/symbol cross-checking.
//!
//! Two read-only passes over the declared sets and the parsed catalogs:
//! missing pairs (a symbol some locale has no text for) and orphaned keys
//! (catalog entries no set declares). Neither pass builds tables or mutates
//! anything; the rendered report is meant to be pasted straight into the
//! catalog files it names.

use std::collections::BTreeMap;
use std::fmt::Display;

use indoc::indoc;
use serde::Serialize;

use crate::{catalog::CatalogSet, error::Error, types::SymbolSet};

/// Outcome of the two validation passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Type name, then locale, then the keys that locale lacks in symbol
    /// declaration order.
    pub missing: BTreeMap<String, BTreeMap<String, Vec<String>>>,

    /// Locale, then the keys no set declares, sorted.
    pub orphaned: BTreeMap<String, Vec<String>>,
}

impl CheckReport {
    /// True only when both passes found nothing.
    pub fn passed(&self) -> bool {
        self.missing.is_empty() && self.orphaned.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.missing
            .values()
            .flat_map(|locales| locales.values())
            .map(Vec::len)
            .sum()
    }

    pub fn orphaned_count(&self) -> usize {
        self.orphaned.values().map(Vec::len).sum()
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Display for CheckReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.passed() {
            return writeln!(f, "Check success, All constants have key-value pairs set");
        }

        if !self.missing.is_empty() {
            f.write_str(indoc! {"
                Check Fail
                The missing key-value pair information as follows
                You can copy and fill it to the corresponding catalog file
            "})?;
            for (type_name, locales) in &self.missing {
                for (locale, keys) in locales {
                    writeln!(
                        f,
                        "************TYPE `{}` locale `{}` missing key-value pair************",
                        type_name, locale
                    )?;
                    for key in keys {
                        writeln!(f, "{}=\"\"", key)?;
                    }
                }
            }
        }

        if !self.orphaned.is_empty() {
            f.write_str(indoc! {"
                Check Warning
                key-value pairs that will not be used because there is no corresponding defined constant
                You can delete the key-value pairs in the corresponding catalog file
            "})?;
            for (locale, keys) in &self.orphaned {
                writeln!(
                    f,
                    "************Can be deleted catalog keys of locale `{}`************",
                    locale
                )?;
                for key in keys {
                    writeln!(f, "{}", key)?;
                }
            }
        }
        Ok(())
    }
}

/// Runs both passes. Every symbol of every set is checked, aliases included;
/// deduplication belongs to table layout, not validation.
pub(crate) fn run_check(sets: &[SymbolSet], catalogs: &CatalogSet) -> CheckReport {
    let mut report = CheckReport::default();

    for set in sets {
        for symbol in set.iter() {
            for catalog in catalogs.iter() {
                if !catalog.contains_key(&symbol.name) {
                    report
                        .missing
                        .entry(set.name.clone())
                        .or_default()
                        .entry(catalog.locale().to_string())
                        .or_default()
                        .push(symbol.name.clone());
                }
            }
        }
    }

    for catalog in catalogs.iter() {
        let mut keys: Vec<&str> = catalog.keys().collect();
        keys.sort_unstable();
        for key in keys {
            let declared = sets
                .iter()
                .any(|set| set.iter().any(|symbol| symbol.name == key));
            if !declared {
                report
                    .orphaned
                    .entry(catalog.locale().to_string())
                    .or_default()
                    .push(key.to_string());
            }
        }
    }

    report
}
