#![forbid(unsafe_code)]
//! Localization table compiler for Rust.
//!
//! Compiles enum-style symbol sets and per-locale text catalogs into compact,
//! allocation-light lookup tables mapping (value, locale) to localized text,
//! with printf-style placeholder substitution and a consistency check that
//! cross-validates symbols against catalogs.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use langtab::{Compiler, SymbolSet};
//!
//! let compiler = Compiler::builder()
//!     .add_symbol_set(SymbolSet::from_unsigned(
//!         "Code",
//!         [("ErrNotFound", 1u64), ("ErrTimeout", 2)],
//!     ))
//!     .catalog_root("catalogs")?
//!     .build()?;
//!
//! // Cross-validate catalogs against the declared symbols
//! let report = compiler.check()?;
//! assert!(report.passed());
//!
//! // Compile and translate
//! let bundles = compiler.compile()?;
//! let text = bundles[0].translate(1, "zh-hk", &[]);
//! # Ok::<(), langtab::Error>(())
//! ```
//!
//! # Table strategies
//!
//! - **Direct**: one contiguous value run, plain offset indexing
//! - **Switch**: up to ten runs, one dispatch arm per run
//! - **Map**: anything sparser, hashed text regions
//!
//! The strategy is chosen per symbol set from its run structure; lookups never
//! allocate regardless of strategy.
//!
//! # Features
//!
//! - ✨ Compile, check, and translate from one declarative description
//! - 🦀 Idiomatic, modular, and ergonomic Rust API
//! - 📦 Designed for build scripts, services, and library integration
//! - 🔄 Deterministic output: same inputs, same tables, same reports
//! - 📖 Well-documented, robust error handling and extensible codebase

pub mod builder;
pub mod catalog;
pub mod check;
pub mod compiler;
pub mod error;
pub mod locale;
pub mod placeholder;
pub mod runs;
pub mod table;
pub mod traits;
pub mod translate;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    builder::CompilerBuilder,
    catalog::{CatalogSet, CatalogWarning, LocaleCatalog},
    check::CheckReport,
    compiler::{CompileOptions, Compiler},
    error::Error,
    locale::{DEFAULT_CARRIER_KEY, LocaleResolver},
    placeholder::substitute,
    runs::split_into_runs,
    table::{MAX_SWITCH_RUNS, Table, TableStrategy},
    traits::{LocaleCarrier, SymbolProvider},
    translate::{BundleInfo, LocalizedError, SymbolBundle},
    types::{Argument, Symbol, SymbolSet},
};
