//! Catalog parsing and discovery.
//!
//! A catalog holds the translation texts of one locale as flat key/value
//! pairs. On disk the accepted syntax is a restricted key/quoted-value subset
//! of TOML: comments, `[section]` headers, and blank lines are skipped, every
//! non-empty value is a double-quoted string, and nothing else of the format
//! is recognized. Discovery maps a directory tree onto locales: a direct
//! child file `en.toml` is the `en` catalog, a direct child directory `en/`
//! is the `en` catalog aggregating every matching file beneath it.

use std::{
    collections::HashMap,
    fmt::Display,
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::error::Error;

/// File extension read during discovery; anything else is skipped with a
/// warning.
pub const CATALOG_EXTENSION: &str = "toml";

const TRIMMED: [char; 4] = [' ', '\t', '\n', '\r'];

/// The translation texts of one locale.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocaleCatalog {
    locale: String,
    entries: HashMap<String, String>,
}

impl LocaleCatalog {
    /// Creates an empty catalog for `locale`.
    pub fn new(locale: impl Into<String>) -> Self {
        LocaleCatalog {
            locale: locale.into(),
            entries: HashMap::new(),
        }
    }

    /// Parses catalog content from a string.
    ///
    /// Returns the catalog together with the non-fatal findings (duplicate
    /// keys). Duplicates keep the later value.
    pub fn from_str(
        locale: impl Into<String>,
        content: &str,
    ) -> Result<(Self, Vec<CatalogWarning>), Error> {
        Self::from_bytes(locale, content.as_bytes())
    }

    /// Parses catalog content from raw bytes.
    pub fn from_bytes(
        locale: impl Into<String>,
        bytes: &[u8],
    ) -> Result<(Self, Vec<CatalogWarning>), Error> {
        let mut catalog = LocaleCatalog::new(locale);
        let mut warnings = Vec::new();
        parse_bytes(&mut catalog, bytes, Path::new("<inline>"), &mut warnings)?;
        Ok((catalog, warnings))
    }

    /// Parses catalog content from any reader.
    pub fn from_reader<R: Read>(
        locale: impl Into<String>,
        mut reader: R,
    ) -> Result<(Self, Vec<CatalogWarning>), Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(locale, &bytes)
    }

    /// Parses a single catalog file; the locale is the file stem.
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<(Self, Vec<CatalogWarning>), Error> {
        let path = path.as_ref();
        let locale = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::read_error(
                    path,
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "file name has no UTF-8 stem",
                    ),
                )
            })?;
        let bytes = fs::read(path).map_err(|e| Error::read_error(path, e))?;
        let mut catalog = LocaleCatalog::new(locale);
        let mut warnings = Vec::new();
        parse_bytes(&mut catalog, &bytes, path, &mut warnings)?;
        Ok((catalog, warnings))
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts a pair, returning the previous value when the key existed.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), text.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Parses the locale id as a language identifier, when it is one.
    ///
    /// Resolution never depends on this; locale ids stay opaque strings.
    pub fn language_identifier(&self) -> Option<LanguageIdentifier> {
        self.locale.parse().ok()
    }
}

/// All discovered catalogs, unique and sorted by locale id.
#[derive(Debug, Clone, Default)]
pub struct CatalogSet {
    catalogs: Vec<LocaleCatalog>,
    warnings: Vec<CatalogWarning>,
}

impl CatalogSet {
    pub fn new() -> Self {
        CatalogSet::default()
    }

    /// Walks `root` and parses every catalog it defines.
    ///
    /// Direct child files named `<locale>.toml` and direct child directories
    /// (locale = directory name, all matching files beneath it, any nesting)
    /// each contribute one catalog; both may feed the same locale. Entries are
    /// visited in lexicographic order so the last-write-wins rule for
    /// duplicate keys is reproducible. A root without a single catalog file is
    /// an error.
    pub fn discover<P: AsRef<Path>>(root: P) -> Result<Self, Error> {
        let root = root.as_ref();
        let meta = fs::metadata(root).map_err(|e| Error::read_error(root, e))?;
        if !meta.is_dir() {
            return Err(Error::NotDirectory(root.to_path_buf()));
        }

        let mut warnings = Vec::new();
        let mut sources: Vec<(String, Vec<PathBuf>)> = Vec::new();

        for entry in sorted_dir(root)? {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .map_err(|e| Error::read_error(&path, e))?;
            if file_type.is_dir() {
                let Some(locale) = path.file_name().and_then(|name| name.to_str()) else {
                    warnings.push(CatalogWarning::skipped_file(&path));
                    continue;
                };
                let locale = locale.to_string();
                let files = collect_catalog_files(&path, &mut warnings)?;
                // A directory without catalog files defines no locale.
                if !files.is_empty() {
                    append_sources(&mut sources, locale, files);
                }
            } else if path.extension().and_then(|ext| ext.to_str()) == Some(CATALOG_EXTENSION) {
                let Some(locale) = path.file_stem().and_then(|stem| stem.to_str()) else {
                    warnings.push(CatalogWarning::skipped_file(&path));
                    continue;
                };
                let locale = locale.to_string();
                append_sources(&mut sources, locale, vec![path]);
            } else {
                warnings.push(CatalogWarning::skipped_file(&path));
            }
        }

        if sources.is_empty() {
            return Err(Error::NoCatalogs(root.to_path_buf()));
        }

        sources.sort_by(|a, b| a.0.cmp(&b.0));

        let mut set = CatalogSet {
            catalogs: Vec::with_capacity(sources.len()),
            warnings,
        };
        for (locale, files) in sources {
            let mut catalog = LocaleCatalog::new(locale);
            for file in files {
                let bytes = fs::read(&file).map_err(|e| Error::read_error(&file, e))?;
                parse_bytes(&mut catalog, &bytes, &file, &mut set.warnings)?;
            }
            set.catalogs.push(catalog);
        }
        Ok(set)
    }

    /// Adds a catalog built in memory, merging into an existing locale with
    /// the same last-write-wins rule as on-disk duplicates.
    pub fn add(&mut self, catalog: LocaleCatalog) {
        match self
            .catalogs
            .binary_search_by(|c| c.locale.as_str().cmp(&catalog.locale))
        {
            Ok(pos) => {
                let existing = &mut self.catalogs[pos];
                for (key, text) in catalog.entries {
                    if existing.entries.contains_key(&key) {
                        self.warnings.push(CatalogWarning::DuplicateKey {
                            locale: existing.locale.clone(),
                            key: key.clone(),
                            origin: "<inline>".to_string(),
                        });
                    }
                    existing.entries.insert(key, text);
                }
            }
            Err(pos) => self.catalogs.insert(pos, catalog),
        }
    }

    /// Folds another catalog set into this one, locale by locale, keeping
    /// its warnings.
    pub fn extend(&mut self, other: CatalogSet) {
        self.warnings.extend(other.warnings);
        for catalog in other.catalogs {
            self.add(catalog);
        }
    }

    pub fn get(&self, locale: &str) -> Option<&LocaleCatalog> {
        self.catalogs
            .binary_search_by(|c| c.locale.as_str().cmp(locale))
            .ok()
            .map(|pos| &self.catalogs[pos])
    }

    /// Locale ids in sorted order.
    pub fn locales(&self) -> Vec<&str> {
        self.catalogs.iter().map(|c| c.locale.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LocaleCatalog> {
        self.catalogs.iter()
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// Non-fatal findings accumulated by discovery, parsing, and merging.
    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.warnings
    }
}

/// Non-fatal data-quality finding from catalog parsing or discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogWarning {
    /// A key appeared more than once for one locale; the later value won.
    DuplicateKey {
        locale: String,
        key: String,
        origin: String,
    },

    /// A file in the catalog tree that does not match the naming rules.
    SkippedFile { path: String },
}

impl CatalogWarning {
    fn duplicate_key(locale: &str, key: &str, origin: &Path) -> Self {
        CatalogWarning::DuplicateKey {
            locale: locale.to_string(),
            key: key.to_string(),
            origin: origin.display().to_string(),
        }
    }

    fn skipped_file(path: &Path) -> Self {
        CatalogWarning::SkippedFile {
            path: path.display().to_string(),
        }
    }
}

impl Display for CatalogWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogWarning::DuplicateKey {
                locale,
                key,
                origin,
            } => write!(
                f,
                "duplicate key-value pair for key `{}` at `{}` with locale `{}`",
                key, origin, locale
            ),
            CatalogWarning::SkippedFile { path } => {
                write!(f, "only .{} catalog files are read, `{}` is ignored", CATALOG_EXTENSION, path)
            }
        }
    }
}

fn append_sources(sources: &mut Vec<(String, Vec<PathBuf>)>, locale: String, files: Vec<PathBuf>) {
    match sources.iter_mut().find(|(existing, _)| *existing == locale) {
        Some((_, existing_files)) => existing_files.extend(files),
        None => sources.push((locale, files)),
    }
}

fn sorted_dir(dir: &Path) -> Result<Vec<fs::DirEntry>, Error> {
    let mut entries: Vec<fs::DirEntry> = fs::read_dir(dir)
        .map_err(|e| Error::read_error(dir, e))?
        .collect::<Result<_, _>>()
        .map_err(|e| Error::read_error(dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

fn collect_catalog_files(
    dir: &Path,
    warnings: &mut Vec<CatalogWarning>,
) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    for entry in sorted_dir(dir)? {
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| Error::read_error(&path, e))?;
        if file_type.is_dir() {
            files.extend(collect_catalog_files(&path, warnings)?);
        } else if path.extension().and_then(|ext| ext.to_str()) == Some(CATALOG_EXTENSION) {
            files.push(path);
        } else {
            warnings.push(CatalogWarning::skipped_file(&path));
        }
    }
    Ok(files)
}

fn parse_bytes(
    catalog: &mut LocaleCatalog,
    bytes: &[u8],
    origin: &Path,
    warnings: &mut Vec<CatalogWarning>,
) -> Result<(), Error> {
    let bytes = strip_bom(bytes);

    // A NUL in the leading bytes means UTF-16 or worse slipped through.
    let guard = &bytes[..bytes.len().min(6)];
    if guard.contains(&0) {
        return Err(Error::NonUtf8Catalog(origin.to_path_buf()));
    }
    let text =
        std::str::from_utf8(bytes).map_err(|_| Error::NonUtf8Catalog(origin.to_path_buf()))?;

    for raw_line in text.split('\n') {
        let line = raw_line.trim_matches(TRIMMED);
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') || (line.starts_with('[') && line.ends_with(']')) {
            continue;
        }
        let Some(eq) = line.find('=') else {
            continue;
        };
        let key = line[..eq].trim_matches(TRIMMED).to_string();
        let raw_value = line[eq + 1..].trim_matches(TRIMMED);

        // An empty value needs no quotes; everything else does.
        let text = if raw_value.is_empty() {
            String::new()
        } else if !raw_value.starts_with('"') {
            return Err(Error::malformed_value(
                origin,
                key,
                "value must be using double quotes",
            ));
        } else {
            unquote(raw_value).ok_or_else(|| {
                Error::malformed_value(origin, key.as_str(), "backslash escape used incorrectly")
            })?
        };

        if catalog.entries.contains_key(&key) {
            warnings.push(CatalogWarning::duplicate_key(&catalog.locale, &key, origin));
        }
        catalog.entries.insert(key, text);
    }
    Ok(())
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    if bytes.starts_with(&[0xef, 0xbb, 0xbf]) {
        &bytes[3..]
    } else if bytes.starts_with(&[0xff, 0xfe]) || bytes.starts_with(&[0xfe, 0xff]) {
        &bytes[2..]
    } else {
        bytes
    }
}

/// Decodes a double-quoted value. Escapes are `\0 \t \n \r \" \\`; any other
/// escape fails. Content after the closing quote is discarded and a value the
/// line ends before closing is accepted as-is.
fn unquote(s: &str) -> Option<String> {
    let mut chars = s.chars();
    if chars.next() != Some('"') {
        return None;
    }
    let mut result = String::new();
    let mut escape = false;
    for c in chars {
        if escape {
            match c {
                '0' => result.push('\0'),
                't' => result.push('\t'),
                'n' => result.push('\n'),
                'r' => result.push('\r'),
                '"' => result.push('"'),
                '\\' => result.push('\\'),
                _ => return None,
            }
            escape = false;
            continue;
        }
        match c {
            '\\' => escape = true,
            '"' => break,
            _ => result.push(c),
        }
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_sections_and_blank_lines() {
        let content = "# comment\n\n[section]\nErrTimeout=\"timed out\"\r\n";
        let (catalog, warnings) = LocaleCatalog::from_str("en", content).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("ErrTimeout"), Some("timed out"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_parse_line_without_equals_is_ignored() {
        let (catalog, _) = LocaleCatalog::from_str("en", "not a pair\nK=\"v\"").unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("K"), Some("v"));
    }

    #[test]
    fn test_parse_escape_sequences() {
        let (catalog, _) =
            LocaleCatalog::from_str("en", r#"K="a\tb\nc\rd\"e\\f\0g""#).unwrap();
        assert_eq!(catalog.get("K"), Some("a\tb\nc\rd\"e\\f\0g"));
    }

    #[test]
    fn test_parse_unknown_escape_is_fatal_and_names_key() {
        let err = LocaleCatalog::from_str("en", r#"ErrBad="a\qb""#).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ErrBad"));
        assert!(message.contains("backslash"));
    }

    #[test]
    fn test_parse_unquoted_value_is_fatal() {
        let err = LocaleCatalog::from_str("en", "K=bare").unwrap_err();
        assert!(err.to_string().contains("double quotes"));
    }

    #[test]
    fn test_parse_empty_value_needs_no_quotes() {
        let (catalog, _) = LocaleCatalog::from_str("en", "K=").unwrap();
        assert_eq!(catalog.get("K"), Some(""));
    }

    #[test]
    fn test_parse_trailing_content_after_closing_quote_is_dropped() {
        let (catalog, _) = LocaleCatalog::from_str("en", "K=\"a\" # trailing").unwrap();
        assert_eq!(catalog.get("K"), Some("a"));
    }

    #[test]
    fn test_parse_unterminated_value_is_accepted() {
        let (catalog, _) = LocaleCatalog::from_str("en", "K=\"abc").unwrap();
        assert_eq!(catalog.get("K"), Some("abc"));
    }

    #[test]
    fn test_parse_duplicate_key_last_write_wins_with_warning() {
        let (catalog, warnings) =
            LocaleCatalog::from_str("en", "K=\"first\"\nK=\"second\"").unwrap();
        assert_eq!(catalog.get("K"), Some("second"));
        assert_eq!(warnings.len(), 1);
        match &warnings[0] {
            CatalogWarning::DuplicateKey { locale, key, .. } => {
                assert_eq!(locale, "en");
                assert_eq!(key, "K");
            }
            other => panic!("unexpected warning: {:?}", other),
        }
    }

    #[test]
    fn test_parse_strips_utf8_and_utf16_boms() {
        let mut bytes = vec![0xef, 0xbb, 0xbf];
        bytes.extend_from_slice(b"K=\"v\"");
        let (catalog, _) = LocaleCatalog::from_bytes("en", &bytes).unwrap();
        assert_eq!(catalog.get("K"), Some("v"));

        let (catalog, _) = LocaleCatalog::from_bytes("en", b"\xff\xfeK=\"v\"").unwrap();
        assert_eq!(catalog.get("K"), Some("v"));
    }

    #[test]
    fn test_parse_rejects_nul_in_leading_bytes() {
        let err = LocaleCatalog::from_bytes("en", b"K\x00=\"v\"").unwrap_err();
        assert!(matches!(err, Error::NonUtf8Catalog(_)));
    }

    #[test]
    fn test_parse_rejects_invalid_utf8() {
        let err = LocaleCatalog::from_bytes("en", b"K=\"v\xff\xff\xff\"").unwrap_err();
        assert!(matches!(err, Error::NonUtf8Catalog(_)));
    }

    #[test]
    fn test_catalog_set_add_merges_same_locale() {
        let mut set = CatalogSet::new();
        let mut first = LocaleCatalog::new("en");
        first.insert("A", "1");
        first.insert("B", "2");
        let mut second = LocaleCatalog::new("en");
        second.insert("B", "3");
        set.add(first);
        set.add(second);

        let merged = set.get("en").unwrap();
        assert_eq!(merged.get("A"), Some("1"));
        assert_eq!(merged.get("B"), Some("3"));
        assert_eq!(set.warnings().len(), 1);
    }

    #[test]
    fn test_catalog_set_locales_sorted() {
        let mut set = CatalogSet::new();
        set.add(LocaleCatalog::new("zh-hk"));
        set.add(LocaleCatalog::new("de"));
        set.add(LocaleCatalog::new("en"));
        assert_eq!(set.locales(), vec!["de", "en", "zh-hk"]);
    }

    #[test]
    fn test_language_identifier_convenience() {
        let catalog = LocaleCatalog::new("zh-HK");
        assert!(catalog.language_identifier().is_some());
        let odd = LocaleCatalog::new("not a locale");
        assert!(odd.language_identifier().is_none());
    }

    #[test]
    fn test_discover_walks_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("en.toml"), "A=\"a\"\n").unwrap();
        fs::create_dir_all(dir.path().join("de").join("nested")).unwrap();
        fs::write(dir.path().join("de").join("base.toml"), "A=\"de-a\"\n").unwrap();
        fs::write(
            dir.path().join("de").join("nested").join("more.toml"),
            "B=\"de-b\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("de").join("notes.txt"), "stray\n").unwrap();

        let set = CatalogSet::discover(dir.path()).unwrap();
        assert_eq!(set.locales(), vec!["de", "en"]);
        let de = set.get("de").unwrap();
        assert_eq!(de.get("A"), Some("de-a"));
        assert_eq!(de.get("B"), Some("de-b"));
        // The stray file nested under the locale directory is warned, not read.
        assert_eq!(set.warnings().len(), 1);
        assert!(matches!(
            &set.warnings()[0],
            CatalogWarning::SkippedFile { path } if path.ends_with("notes.txt")
        ));
    }

    #[test]
    fn test_discover_merges_file_and_directory_for_one_locale() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("en.toml"), "A=\"file\"\n").unwrap();
        fs::create_dir(dir.path().join("en")).unwrap();
        fs::write(dir.path().join("en").join("extra.toml"), "B=\"dir\"\n").unwrap();

        let set = CatalogSet::discover(dir.path()).unwrap();
        assert_eq!(set.locales(), vec!["en"]);
        let en = set.get("en").unwrap();
        assert_eq!(en.get("A"), Some("file"));
        assert_eq!(en.get("B"), Some("dir"));
    }

    #[test]
    fn test_discover_rejects_file_root() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = CatalogSet::discover(file.path()).unwrap_err();
        assert!(matches!(err, Error::NotDirectory(_)));
    }

    #[test]
    fn test_discover_missing_root_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let err = CatalogSet::discover(&missing).unwrap_err();
        assert!(err.to_string().contains("absent"));
    }

    #[test]
    fn test_extend_merges_catalogs_and_warnings() {
        let mut base = CatalogSet::new();
        let mut en = LocaleCatalog::new("en");
        en.insert("A", "base");
        base.add(en);

        let mut incoming = CatalogSet::new();
        let mut en2 = LocaleCatalog::new("en");
        en2.insert("A", "incoming");
        incoming.add(en2);
        incoming.add(LocaleCatalog::new("de"));

        base.extend(incoming);
        assert_eq!(base.locales(), vec!["de", "en"]);
        assert_eq!(base.get("en").unwrap().get("A"), Some("incoming"));
        assert_eq!(base.warnings().len(), 1);
    }
}
