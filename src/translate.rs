//! Translation over compiled tables.
//!
//! A [`SymbolBundle`] is the per-set compile artifact: the supported locale
//! list, the resolved default, the encoding strategy, and one packed table
//! per locale. Bundles are immutable; translation borrows them freely across
//! threads.

use std::borrow::Cow;
use std::fmt::Display;

use serde::Serialize;

use crate::{
    locale::LocaleResolver,
    placeholder::substitute,
    table::{Table, TableStrategy},
    traits::LocaleCarrier,
    types::Argument,
};

/// Compiled translation tables of one symbol set.
#[derive(Debug, Clone)]
pub struct SymbolBundle {
    type_name: String,
    signed: bool,
    strategy: TableStrategy,
    resolver: LocaleResolver,
    tables: Vec<Table>,
}

impl SymbolBundle {
    pub(crate) fn new(
        type_name: String,
        signed: bool,
        strategy: TableStrategy,
        resolver: LocaleResolver,
        tables: Vec<Table>,
    ) -> Self {
        SymbolBundle {
            type_name,
            signed,
            strategy,
            resolver,
            tables,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn strategy(&self) -> TableStrategy {
        self.strategy
    }

    pub fn resolver(&self) -> &LocaleResolver {
        &self.resolver
    }

    /// Supported locales in ordinal order.
    pub fn locales(&self) -> &[String] {
        self.resolver.locales()
    }

    pub fn default_locale(&self) -> &str {
        self.resolver.default_locale()
    }

    pub fn is_locale_supported(&self, locale: &str) -> bool {
        self.resolver.is_supported(locale)
    }

    /// The packed table of a locale, resolved to the default when
    /// unsupported.
    pub fn table(&self, locale: &str) -> &Table {
        &self.tables[self.resolver.resolve(locale)]
    }

    /// Zero-allocation region lookup; `None` for out-of-range values.
    pub fn lookup(&self, value: u64, locale: &str) -> Option<&str> {
        self.table(locale).lookup(value)
    }

    /// Translates `value` into `locale` (default when unsupported),
    /// substituting `args` positionally.
    pub fn translate(&self, value: u64, locale: &str, args: &[Argument]) -> String {
        self.translate_at(value, self.resolver.resolve(locale), args)
    }

    /// Translates with the locale taken from ambient carrier data.
    pub fn translate_with_carrier(
        &self,
        value: u64,
        carrier: Option<&dyn LocaleCarrier>,
        args: &[Argument],
    ) -> String {
        self.translate_at(value, self.resolver.resolve_from_carrier(carrier), args)
    }

    /// Default-locale text of `value`, without substitution.
    pub fn text(&self, value: u64) -> String {
        self.translate_at(value, self.resolver.default_ordinal(), &[])
    }

    /// Attaches the translation of `value` to an external error.
    pub fn wrap(
        &self,
        inner: impl Into<Box<dyn std::error::Error + Send + Sync>>,
        value: u64,
        locale: &str,
        args: Vec<Argument>,
    ) -> LocalizedError {
        self.wrap_at(inner.into(), value, self.resolver.resolve(locale), args)
    }

    /// [`SymbolBundle::wrap`] with the locale taken from ambient carrier
    /// data.
    pub fn wrap_with_carrier(
        &self,
        inner: impl Into<Box<dyn std::error::Error + Send + Sync>>,
        value: u64,
        carrier: Option<&dyn LocaleCarrier>,
        args: Vec<Argument>,
    ) -> LocalizedError {
        self.wrap_at(
            inner.into(),
            value,
            self.resolver.resolve_from_carrier(carrier),
            args,
        )
    }

    /// Serializable build summary.
    pub fn info(&self) -> BundleInfo {
        BundleInfo {
            type_name: self.type_name.clone(),
            locales: self.resolver.locales().to_vec(),
            default_locale: self.resolver.default_locale().to_string(),
            strategy: self.strategy,
        }
    }

    fn translate_at(&self, value: u64, ordinal: usize, args: &[Argument]) -> String {
        let text: Cow<'_, str> = match self.tables[ordinal].lookup(value) {
            Some(text) => Cow::Borrowed(text),
            None => Cow::Owned(self.fallback_text(value, ordinal)),
        };
        if args.is_empty() {
            return text.into_owned();
        }
        let expanded: Vec<String> = args.iter().map(|arg| self.expand(arg, ordinal)).collect();
        substitute(&text, &expanded)
    }

    /// Expands one argument. Same-set symbol references become their own text
    /// in the same locale, one level deep and with no further substitution;
    /// references to other sets degrade to the decimal text of the stored bit
    /// pattern.
    fn expand(&self, arg: &Argument, ordinal: usize) -> String {
        match arg {
            Argument::Literal(text) => text.clone(),
            Argument::SymbolRef { set, value } if *set == self.type_name => {
                match self.tables[ordinal].lookup(*value) {
                    Some(text) => text.to_string(),
                    None => self.fallback_text(*value, ordinal),
                }
            }
            Argument::SymbolRef { value, .. } => value.to_string(),
        }
    }

    fn fallback_text(&self, value: u64, ordinal: usize) -> String {
        let raw = if self.signed {
            (value as i64).to_string()
        } else {
            value.to_string()
        };
        format!(
            "{}[{}]({})",
            self.type_name,
            self.resolver.locale_name(ordinal),
            raw
        )
    }

    fn wrap_at(
        &self,
        inner: Box<dyn std::error::Error + Send + Sync>,
        value: u64,
        ordinal: usize,
        args: Vec<Argument>,
    ) -> LocalizedError {
        LocalizedError {
            text: self.translate_at(value, ordinal, &args),
            set_name: self.type_name.clone(),
            value,
            locale: self.resolver.locale_name(ordinal).to_string(),
            args,
            inner,
        }
    }
}

/// Serializable build summary of one [`SymbolBundle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleInfo {
    pub type_name: String,
    pub locales: Vec<String>,
    pub default_locale: String,
    pub strategy: TableStrategy,
}

/// A translation outcome attached to an external error.
///
/// Displays as the translated text, keeps the wrapped error reachable for
/// unwrapping, and stores the (symbol, locale, args) triple so the
/// translation can be redone on demand.
#[derive(Debug)]
pub struct LocalizedError {
    text: String,
    set_name: String,
    value: u64,
    locale: String,
    args: Vec<Argument>,
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl LocalizedError {
    /// The text translated at wrap time.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_name(&self) -> &str {
        &self.set_name
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// The locale the text was resolved to.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.inner.as_ref()
    }

    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync> {
        self.inner
    }

    /// Re-runs the stored translation against `bundle`.
    pub fn retranslate(&self, bundle: &SymbolBundle) -> String {
        bundle.translate(self.value, &self.locale, &self.args)
    }

    /// Own text with the wrapped error's message appended.
    pub fn debug_format(&self) -> String {
        format!("{} ({})", self.text, self.inner)
    }
}

impl Display for LocalizedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl std::error::Error for LocalizedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let inner: &(dyn std::error::Error + 'static) = self.inner.as_ref();
        Some(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::LocaleCatalog, locale::LocaleResolver, runs::split_into_runs, types::SymbolSet,
    };

    const NOT_FOUND: u64 = 1;
    const TIMEOUT: u64 = 2;

    fn bundle() -> SymbolBundle {
        let set = SymbolSet::from_unsigned(
            "Code",
            vec![("ErrNotFound", NOT_FOUND), ("ErrTimeout", TIMEOUT), ("ErrOther", 3)],
        );

        let mut en = LocaleCatalog::new("en");
        en.insert("ErrNotFound", "not found");
        en.insert("ErrTimeout", "timed out: %s");
        let mut zh = LocaleCatalog::new("zh-hk");
        zh.insert("ErrNotFound", "搵唔到");
        zh.insert("ErrTimeout", "超時: %s");

        let runs = split_into_runs(set.symbols.clone());
        let resolver =
            LocaleResolver::new(vec!["en".to_string(), "zh-hk".to_string()], None, None).unwrap();
        let tables = vec![
            Table::build(&runs, &en, set.is_signed()),
            Table::build(&runs, &zh, set.is_signed()),
        ];
        SymbolBundle::new(
            set.name.clone(),
            set.is_signed(),
            TableStrategy::for_run_count(runs.len()),
            resolver,
            tables,
        )
    }

    #[test]
    fn test_translate_without_args_is_verbatim() {
        let bundle = bundle();
        assert_eq!(bundle.translate(NOT_FOUND, "en", &[]), "not found");
        assert_eq!(bundle.translate(TIMEOUT, "en", &[]), "timed out: %s");
    }

    #[test]
    fn test_missing_key_falls_back_to_symbol_name() {
        let bundle = bundle();
        assert_eq!(bundle.translate(3, "zh-hk", &[]), "ErrOther");
    }

    #[test]
    fn test_unsupported_locale_behaves_like_default() {
        let bundle = bundle();
        assert_eq!(
            bundle.translate(NOT_FOUND, "fr", &[]),
            bundle.translate(NOT_FOUND, "en", &[])
        );
        assert_eq!(bundle.default_locale(), "en");
    }

    #[test]
    fn test_out_of_range_synthetic_text() {
        let bundle = bundle();
        assert_eq!(bundle.translate(99, "en", &[]), "Code[en](99)");
        // The locale in the fallback is the resolved one.
        assert_eq!(bundle.translate(99, "fr", &[]), "Code[en](99)");
        assert_eq!(bundle.translate(99, "zh-hk", &[]), "Code[zh-hk](99)");
    }

    #[test]
    fn test_out_of_range_signed_prints_raw_value() {
        let set = SymbolSet::from_signed("Delta", vec![("Down", -1i64), ("Flat", 0)]);
        let mut en = LocaleCatalog::new("en");
        en.insert("Down", "down");
        let runs = split_into_runs(set.symbols.clone());
        let resolver = LocaleResolver::new(vec!["en".to_string()], None, None).unwrap();
        let tables = vec![Table::build(&runs, &en, set.is_signed())];
        let bundle = SymbolBundle::new(
            set.name.clone(),
            set.is_signed(),
            TableStrategy::for_run_count(runs.len()),
            resolver,
            tables,
        );

        assert_eq!(bundle.translate((-7i64) as u64, "en", &[]), "Delta[en](-7)");
    }

    #[test]
    fn test_literal_argument_substitution() {
        let bundle = bundle();
        assert_eq!(
            bundle.translate(TIMEOUT, "en", &[Argument::literal("10s")]),
            "timed out: 10s"
        );
    }

    #[test]
    fn test_symbol_argument_expands_one_level() {
        let bundle = bundle();
        assert_eq!(
            bundle.translate(TIMEOUT, "en", &[Argument::symbol("Code", NOT_FOUND)]),
            "timed out: not found"
        );
        // Expansion follows the resolved locale.
        assert_eq!(
            bundle.translate(TIMEOUT, "zh-hk", &[Argument::symbol("Code", NOT_FOUND)]),
            "超時: 搵唔到"
        );
    }

    #[test]
    fn test_expanded_text_is_not_substituted_again() {
        // ErrTimeout's own text contains a placeholder; as an argument it must
        // land verbatim, not consume further arguments.
        let bundle = bundle();
        assert_eq!(
            bundle.translate(
                TIMEOUT,
                "en",
                &[Argument::symbol("Code", TIMEOUT), Argument::literal("spare")]
            ),
            "timed out: timed out: %s"
        );
    }

    #[test]
    fn test_foreign_set_reference_degrades_to_decimal() {
        let bundle = bundle();
        assert_eq!(
            bundle.translate(TIMEOUT, "en", &[Argument::symbol("Other", 42)]),
            "timed out: 42"
        );
    }

    #[test]
    fn test_out_of_range_symbol_argument_uses_fallback_text() {
        let bundle = bundle();
        assert_eq!(
            bundle.translate(TIMEOUT, "en", &[Argument::symbol("Code", 99)]),
            "timed out: Code[en](99)"
        );
    }

    #[test]
    fn test_translate_with_carrier() {
        let bundle = bundle();
        let mut ambient = std::collections::HashMap::new();
        ambient.insert(
            crate::locale::DEFAULT_CARRIER_KEY.to_string(),
            "zh-hk".to_string(),
        );
        assert_eq!(
            bundle.translate_with_carrier(NOT_FOUND, Some(&ambient), &[]),
            "搵唔到"
        );
        assert_eq!(
            bundle.translate_with_carrier(NOT_FOUND, None, &[]),
            "not found"
        );
    }

    #[test]
    fn test_text_uses_default_locale() {
        let bundle = bundle();
        assert_eq!(bundle.text(NOT_FOUND), "not found");
    }

    #[test]
    fn test_lookup_is_region_access_without_fallback() {
        let bundle = bundle();
        assert_eq!(bundle.lookup(NOT_FOUND, "en"), Some("not found"));
        assert_eq!(bundle.lookup(99, "en"), None);
    }

    #[test]
    fn test_wrap_exposes_text_and_inner_error() {
        let bundle = bundle();
        let io_error = std::io::Error::new(std::io::ErrorKind::TimedOut, "socket closed");
        let wrapped = bundle.wrap(io_error, TIMEOUT, "en", vec![Argument::literal("10s")]);

        assert_eq!(wrapped.to_string(), "timed out: 10s");
        assert_eq!(wrapped.text(), "timed out: 10s");
        assert_eq!(wrapped.value(), TIMEOUT);
        assert_eq!(wrapped.locale(), "en");
        assert_eq!(wrapped.debug_format(), "timed out: 10s (socket closed)");

        let source = std::error::Error::source(&wrapped).map(|e| e.to_string());
        assert_eq!(source.as_deref(), Some("socket closed"));
    }

    #[test]
    fn test_wrap_resolves_unsupported_locale_before_storing() {
        let bundle = bundle();
        let io_error = std::io::Error::other("boom");
        let wrapped = bundle.wrap(io_error, NOT_FOUND, "fr", Vec::new());
        assert_eq!(wrapped.locale(), "en");
        assert_eq!(wrapped.retranslate(&bundle), "not found");
    }

    #[test]
    fn test_wrap_with_carrier_uses_ambient_locale() {
        let bundle = bundle();
        let mut ambient = std::collections::HashMap::new();
        ambient.insert(
            crate::locale::DEFAULT_CARRIER_KEY.to_string(),
            "zh-hk".to_string(),
        );
        let wrapped = bundle.wrap_with_carrier(
            std::io::Error::other("boom"),
            NOT_FOUND,
            Some(&ambient),
            Vec::new(),
        );
        assert_eq!(wrapped.locale(), "zh-hk");
        assert_eq!(wrapped.to_string(), "搵唔到");
    }

    #[test]
    fn test_info_summary() {
        let bundle = bundle();
        let info = bundle.info();
        assert_eq!(info.type_name, "Code");
        assert_eq!(info.locales, vec!["en", "zh-hk"]);
        assert_eq!(info.default_locale, "en");
        assert_eq!(info.strategy, TableStrategy::Direct);
    }
}
