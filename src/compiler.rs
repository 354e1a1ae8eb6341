//! This module provides the `Compiler` struct and associated functionality for
//! turning declared symbol sets and parsed locale catalogs into compiled
//! [`SymbolBundle`]s, and for running the catalog consistency check.
//!
//! The `Compiler` owns a collection of `SymbolSet` instances and a `CatalogSet`
//! and derives everything else: run structure, table strategy, per-locale
//! tables, and the locale resolver shared by every bundle. Sets are compiled
//! independently of each other, in the order they were added.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::{
    builder::CompilerBuilder,
    catalog::{CatalogSet, CatalogWarning, LocaleCatalog},
    check::{run_check, CheckReport},
    error::Error,
    locale::LocaleResolver,
    runs::split_into_runs,
    table::{Table, TableStrategy},
    translate::SymbolBundle,
    types::SymbolSet,
};

/// Options consumed when a `Compiler` is constructed.
///
/// Both fields default to `None`: the default locale falls back to the
/// lexicographically first discovered locale, and the carrier key falls back
/// to [`DEFAULT_CARRIER_KEY`](crate::locale::DEFAULT_CARRIER_KEY).
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub default_locale: Option<String>,
    pub carrier_key: Option<String>,
}

/// Compiles symbol sets against locale catalogs and checks them for
/// consistency.
#[derive(Debug)]
pub struct Compiler {
    sets: Vec<SymbolSet>,
    catalogs: CatalogSet,
    resolver: LocaleResolver,
}

impl Compiler {
    /// Creates a builder for assembling a `Compiler` with a fluent interface.
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder::new()
    }

    /// Creates a `Compiler` over the given sets and catalogs.
    ///
    /// # Parameters
    /// - `sets`: The symbol sets to compile, in declaration order.
    /// - `catalogs`: The parsed catalogs, one per locale.
    /// - `options`: Default-locale override and carrier key name.
    ///
    /// # Returns
    ///
    /// `Ok(Compiler)` on success, or an `Error` if two sets share a name, the
    /// catalog set is empty, or the default-locale override names a locale
    /// that was not discovered.
    pub fn with_options(
        sets: Vec<SymbolSet>,
        catalogs: CatalogSet,
        options: CompileOptions,
    ) -> Result<Self, Error> {
        let mut seen = HashSet::new();
        for set in &sets {
            if !seen.insert(set.name.as_str()) {
                return Err(Error::DuplicateSymbolSet(set.name.clone()));
            }
        }
        if catalogs.is_empty() {
            return Err(Error::NoCatalogs(PathBuf::from("<inline>")));
        }

        let locales = catalogs
            .locales()
            .iter()
            .map(|locale| locale.to_string())
            .collect();
        let resolver = LocaleResolver::new(
            locales,
            options.default_locale.as_deref(),
            options.carrier_key.as_deref(),
        )?;

        Ok(Compiler {
            sets,
            catalogs,
            resolver,
        })
    }

    /// Compiles every set into a [`SymbolBundle`], one table per locale.
    ///
    /// # Returns
    ///
    /// `Ok(bundles)` in set declaration order, or an `Error` if any set has
    /// no symbols.
    pub fn compile(&self) -> Result<Vec<SymbolBundle>, Error> {
        let mut bundles = Vec::with_capacity(self.sets.len());
        for set in &self.sets {
            if set.is_empty() {
                return Err(Error::EmptySymbolSet(set.name.clone()));
            }

            let signed = set.is_signed();
            let runs = split_into_runs(set.symbols.clone());
            let strategy = TableStrategy::for_run_count(runs.len());

            let mut tables = Vec::with_capacity(self.resolver.locales().len());
            for locale in self.resolver.locales() {
                let table = match self.catalogs.get(locale) {
                    Some(catalog) => Table::build(&runs, catalog, signed),
                    None => Table::build(&runs, &LocaleCatalog::new(locale.clone()), signed),
                };
                tables.push(table);
            }

            bundles.push(SymbolBundle::new(
                set.name.clone(),
                signed,
                strategy,
                self.resolver.clone(),
                tables,
            ));
        }
        Ok(bundles)
    }

    /// Runs the consistency check without building any tables.
    ///
    /// # Returns
    ///
    /// `Ok(report)` where `report.passed()` tells whether the symbol sets and
    /// catalogs line up, or an `Error` if any set has no symbols.
    pub fn check(&self) -> Result<CheckReport, Error> {
        for set in &self.sets {
            if set.is_empty() {
                return Err(Error::EmptySymbolSet(set.name.clone()));
            }
        }
        Ok(run_check(&self.sets, &self.catalogs))
    }

    /// The symbol sets this compiler was built over, in declaration order.
    pub fn symbol_sets(&self) -> &[SymbolSet] {
        &self.sets
    }

    /// The parsed catalogs this compiler was built over.
    pub fn catalogs(&self) -> &CatalogSet {
        &self.catalogs
    }

    /// Warnings accumulated while the catalogs were discovered and parsed.
    pub fn warnings(&self) -> &[CatalogWarning] {
        self.catalogs.warnings()
    }
}
