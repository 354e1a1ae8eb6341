//! Core types for langtab.
//! Symbol sets are the compile input; translators consume the built tables.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A named integer constant belonging to one [`SymbolSet`].
///
/// The value is stored as a 64-bit bit pattern; `signed` says how to read it.
/// Catalog keys are matched against `name`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Symbol {
    /// Display name; catalog keys and packed-name fallbacks use this.
    pub name: String,

    /// Name exactly as declared, kept even when `name` was shortened.
    pub original_name: String,

    /// Value bit pattern, interpreted through `signed`.
    pub value: u64,

    /// Whether the declaring type is signed.
    pub signed: bool,

    /// Decimal representation of the value in the declared signedness.
    pub repr: String,
}

impl Symbol {
    /// Creates a symbol from a raw bit pattern and a signedness flag.
    pub fn new(name: impl Into<String>, value: u64, signed: bool) -> Self {
        let name = name.into();
        let repr = if signed {
            (value as i64).to_string()
        } else {
            value.to_string()
        };
        Symbol {
            original_name: name.clone(),
            name,
            value,
            signed,
            repr,
        }
    }

    /// Creates a symbol of a signed type.
    pub fn signed(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, value as u64, true)
    }

    /// Creates a symbol of an unsigned type.
    pub fn unsigned(name: impl Into<String>, value: u64) -> Self {
        Self::new(name, value, false)
    }

    /// Replaces the display name, keeping `original_name` as declared.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The value reinterpreted as signed.
    pub fn signed_value(&self) -> i64 {
        self.value as i64
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.repr)
    }
}

/// An ordered collection of [`Symbol`]s sharing one type name.
///
/// Declaration order is preserved and duplicate values (aliases) appear
/// verbatim; deduplication happens later, when runs are split.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SymbolSet {
    /// Type name, e.g. `Code`.
    pub name: String,

    /// Symbols in declaration order.
    pub symbols: Vec<Symbol>,
}

impl SymbolSet {
    pub fn new(name: impl Into<String>, symbols: Vec<Symbol>) -> Self {
        SymbolSet {
            name: name.into(),
            symbols,
        }
    }

    /// Builds a signed set from `(name, value)` pairs in declaration order.
    pub fn from_signed<S: Into<String>>(
        name: impl Into<String>,
        pairs: impl IntoIterator<Item = (S, i64)>,
    ) -> Self {
        SymbolSet {
            name: name.into(),
            symbols: pairs
                .into_iter()
                .map(|(n, v)| Symbol::signed(n, v))
                .collect(),
        }
    }

    /// Builds an unsigned set from `(name, value)` pairs in declaration order.
    pub fn from_unsigned<S: Into<String>>(
        name: impl Into<String>,
        pairs: impl IntoIterator<Item = (S, u64)>,
    ) -> Self {
        SymbolSet {
            name: name.into(),
            symbols: pairs
                .into_iter()
                .map(|(n, v)| Symbol::unsigned(n, v))
                .collect(),
        }
    }

    pub fn push(&mut self, symbol: Symbol) {
        self.symbols.push(symbol);
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.symbols.iter()
    }

    /// Set-wide signedness: signed comparison semantics apply if any member is
    /// signed.
    pub fn is_signed(&self) -> bool {
        self.symbols.iter().any(|s| s.signed)
    }
}

impl Display for SymbolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SymbolSet {{ name: {}, symbols: {} }}",
            self.name,
            self.symbols.len()
        )
    }
}

/// One substitution argument for a translation call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum Argument {
    /// A symbol value of the named set. A reference to the translating set
    /// expands one level to that symbol's localized text; a reference to any
    /// other set degrades to the decimal text of its stored bit pattern.
    SymbolRef { set: String, value: u64 },

    /// Literal text substituted as-is.
    Literal(String),
}

impl Argument {
    pub fn symbol(set: impl Into<String>, value: u64) -> Self {
        Argument::SymbolRef {
            set: set.into(),
            value,
        }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Argument::Literal(text.into())
    }
}

impl From<&str> for Argument {
    fn from(text: &str) -> Self {
        Argument::Literal(text.to_string())
    }
}

impl From<String> for Argument {
    fn from(text: String) -> Self {
        Argument::Literal(text)
    }
}
