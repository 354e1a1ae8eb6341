use std::collections::{BTreeMap, HashMap};

use crate::{error::Error, types::SymbolSet};

/// Supplies the ordered symbol list for one named set.
///
/// Implementations are the seam between symbol declarations (build scripts,
/// schema files, hand-written tables) and compilation; the compiler never
/// inspects source code itself.
pub trait SymbolProvider {
    /// The type name of the provided set.
    fn type_name(&self) -> &str;

    /// The symbols in declaration order, aliases included.
    fn provide(&self) -> Result<SymbolSet, Error>;
}

impl SymbolProvider for SymbolSet {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn provide(&self) -> Result<SymbolSet, Error> {
        Ok(self.clone())
    }
}

/// Read-only key/value lookup carrying ambient locale data.
///
/// Carrier-based translation calls query the configured locale key exactly
/// once per call; everything else about the carrier stays opaque. Lookups must
/// be side-effect free.
pub trait LocaleCarrier {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<&str>;
}

impl LocaleCarrier for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }
}

impl LocaleCarrier for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }
}
