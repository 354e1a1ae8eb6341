//! Fluent assembly of a [`Compiler`].

use std::path::Path;

use crate::{
    catalog::{CatalogSet, LocaleCatalog},
    compiler::{CompileOptions, Compiler},
    error::Error,
    traits::SymbolProvider,
    types::SymbolSet,
};

/// Builder for creating a `Compiler` instance with a fluent interface.
///
/// This builder allows you to chain method calls to add symbol sets and
/// catalogs and then build the final `Compiler` instance.
///
/// # Example
///
/// ```rust,no_run
/// use langtab::{Compiler, SymbolSet};
///
/// let compiler = Compiler::builder()
///     .add_symbol_set(SymbolSet::from_unsigned(
///         "Code",
///         [("ErrNotFound", 1u64), ("ErrTimeout", 2)],
///     ))
///     .catalog_root("catalogs")?
///     .default_locale("en")
///     .build()?;
/// let bundles = compiler.compile()?;
/// # Ok::<(), langtab::Error>(())
/// ```
#[derive(Debug)]
pub struct CompilerBuilder {
    sets: Vec<SymbolSet>,
    catalogs: CatalogSet,
    options: CompileOptions,
}

impl CompilerBuilder {
    /// Creates a new `CompilerBuilder` with no sets and no catalogs.
    pub fn new() -> Self {
        Self {
            sets: Vec::new(),
            catalogs: CatalogSet::new(),
            options: CompileOptions::default(),
        }
    }

    /// Adds a symbol set.
    ///
    /// Sets are compiled in the order they are added.
    ///
    /// # Arguments
    ///
    /// * `set` - The symbol set to add
    ///
    /// # Returns
    ///
    /// Returns `self` for method chaining.
    pub fn add_symbol_set(mut self, set: SymbolSet) -> Self {
        self.sets.push(set);
        self
    }

    /// Adds multiple symbol sets at once.
    ///
    /// # Arguments
    ///
    /// * `sets` - Iterator of symbol sets to add
    ///
    /// # Returns
    ///
    /// Returns `self` for method chaining.
    pub fn add_symbol_sets<I>(mut self, sets: I) -> Self
    where
        I: IntoIterator<Item = SymbolSet>,
    {
        self.sets.extend(sets);
        self
    }

    /// Adds the symbol set yielded by a provider.
    ///
    /// This is the seam for callers that derive their symbol lists from build
    /// scripts, schema files, or other machinery.
    ///
    /// # Arguments
    ///
    /// * `provider` - The provider to query
    ///
    /// # Returns
    ///
    /// Returns `self` for method chaining, or an `Error` if the provider
    /// fails.
    pub fn add_provider(mut self, provider: &dyn SymbolProvider) -> Result<Self, Error> {
        self.sets.push(provider.provide()?);
        Ok(self)
    }

    /// Discovers and parses every catalog under a root directory.
    ///
    /// Direct child files named `<locale>.toml` and direct child directories
    /// named after a locale each contribute one catalog. Catalogs discovered
    /// here merge with any added earlier under the last-write-wins rule.
    ///
    /// # Arguments
    ///
    /// * `root` - Path to the catalog root directory
    ///
    /// # Returns
    ///
    /// Returns `self` for method chaining, or an `Error` if the root is not a
    /// directory, contains no catalog files, or any file fails to parse.
    pub fn catalog_root<P: AsRef<Path>>(mut self, root: P) -> Result<Self, Error> {
        let discovered = CatalogSet::discover(root)?;
        self.catalogs.extend(discovered);
        Ok(self)
    }

    /// Adds a catalog built in memory.
    ///
    /// # Arguments
    ///
    /// * `catalog` - The catalog to add
    ///
    /// # Returns
    ///
    /// Returns `self` for method chaining.
    pub fn add_catalog(mut self, catalog: LocaleCatalog) -> Self {
        self.catalogs.add(catalog);
        self
    }

    /// Overrides the default locale.
    ///
    /// Without an override the lexicographically first discovered locale is
    /// the default. The override is validated against the discovered locales
    /// when `build` runs.
    ///
    /// # Arguments
    ///
    /// * `locale` - The locale id to fall back to
    ///
    /// # Returns
    ///
    /// Returns `self` for method chaining.
    pub fn default_locale(mut self, locale: impl Into<String>) -> Self {
        self.options.default_locale = Some(locale.into());
        self
    }

    /// Overrides the key queried on ambient locale carriers.
    ///
    /// # Arguments
    ///
    /// * `key` - The carrier key name
    ///
    /// # Returns
    ///
    /// Returns `self` for method chaining.
    pub fn carrier_key(mut self, key: impl Into<String>) -> Self {
        self.options.carrier_key = Some(key.into());
        self
    }

    /// Builds the final `Compiler` instance.
    ///
    /// This method consumes the builder and validates the whole
    /// configuration.
    ///
    /// # Returns
    ///
    /// Returns the constructed `Compiler` instance, or an `Error` if two sets
    /// share a name, no catalogs were added, or the default-locale override
    /// names a locale that was not discovered.
    pub fn build(self) -> Result<Compiler, Error> {
        Compiler::with_options(self.sets, self.catalogs, self.options)
    }
}

impl Default for CompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
