//! Universe sources: where the symbols to screen come from.
//!
//! A universe is assembled from one or more named sources, either a text file
//! with one symbol per line or an inline comma-separated list. Symbols are
//! upper-cased and de-duplicated across sources, keeping first-seen order.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    /// Path to a symbol file, relative to the configuration directory.
    File(PathBuf),
    Inline(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UniverseSource {
    pub market: String,
    pub kind: SourceKind,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("universe source for {market} requires a file path")]
    MissingPath { market: String },

    #[error("inline universe source for {market} requires symbols")]
    MissingSymbols { market: String },

    #[error("unsupported universe source type for {market}: {source_type}")]
    UnsupportedType { market: String, source_type: String },

    #[error("empty token in symbol list for {market}")]
    EmptyToken { market: String },

    #[error("universe file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read universe file {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },
}

impl UniverseSource {
    /// Build a source from its raw config fields.
    pub fn from_parts(
        market: &str,
        source_type: &str,
        path: Option<&str>,
        symbols: Option<&str>,
    ) -> Result<Self, UniverseError> {
        let kind = match source_type.trim() {
            "file" => match path.map(str::trim).filter(|p| !p.is_empty()) {
                Some(p) => SourceKind::File(PathBuf::from(p)),
                None => {
                    return Err(UniverseError::MissingPath {
                        market: market.to_string(),
                    });
                }
            },
            "inline" => {
                let list = parse_symbol_list(market, symbols.unwrap_or_default())?;
                if list.is_empty() {
                    return Err(UniverseError::MissingSymbols {
                        market: market.to_string(),
                    });
                }
                SourceKind::Inline(list)
            }
            other => {
                return Err(UniverseError::UnsupportedType {
                    market: market.to_string(),
                    source_type: other.to_string(),
                });
            }
        };
        Ok(Self {
            market: market.to_string(),
            kind,
        })
    }

    /// Symbols declared by this source, in declaration order.
    pub fn load_symbols(&self, base_path: &Path) -> Result<Vec<String>, UniverseError> {
        match &self.kind {
            SourceKind::Inline(symbols) => Ok(symbols.clone()),
            SourceKind::File(path) => {
                let resolved = base_path.join(path);
                if !resolved.exists() {
                    return Err(UniverseError::FileNotFound(resolved));
                }
                let content = fs::read_to_string(&resolved).map_err(|e| UniverseError::Read {
                    path: resolved.clone(),
                    reason: e.to_string(),
                })?;
                Ok(content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty() && !line.starts_with('#'))
                    .map(str::to_string)
                    .collect())
            }
        }
    }
}

/// Parse a comma-separated list, upper-casing each symbol and dropping repeats.
/// An empty input yields an empty list; an empty token between commas is an error.
pub fn parse_symbol_list(market: &str, input: &str) -> Result<Vec<String>, UniverseError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut symbols = Vec::new();
    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken {
                market: market.to_string(),
            });
        }
        symbols.push(trimmed.to_string());
    }
    Ok(dedup_upper(symbols))
}

/// Aggregate every source in order into one upper-cased, de-duplicated list.
pub fn collect_symbols(sources: &[UniverseSource], base_path: &Path) -> Result<Vec<String>, UniverseError> {
    let mut all = Vec::new();
    for source in sources {
        all.extend(source.load_symbols(base_path)?);
    }
    Ok(dedup_upper(all))
}

fn dedup_upper(symbols: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    symbols
        .into_iter()
        .map(|s| s.to_uppercase())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_symbol_list_basic() {
        let result = parse_symbol_list("us", "AAPL,MSFT,GOOG").unwrap();
        assert_eq!(result, vec!["AAPL", "MSFT", "GOOG"]);
    }

    #[test]
    fn parse_symbol_list_trims_and_uppercases() {
        let result = parse_symbol_list("hk", "  0700.hk , 0005.HK ").unwrap();
        assert_eq!(result, vec!["0700.HK", "0005.HK"]);
    }

    #[test]
    fn parse_symbol_list_dedups() {
        let result = parse_symbol_list("us", "aapl,AAPL,msft").unwrap();
        assert_eq!(result, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn parse_symbol_list_empty_token() {
        let result = parse_symbol_list("us", "AAPL,,MSFT");
        assert!(matches!(result, Err(UniverseError::EmptyToken { .. })));
    }

    #[test]
    fn inline_source_requires_symbols() {
        let result = UniverseSource::from_parts("us", "inline", None, None);
        assert!(matches!(result, Err(UniverseError::MissingSymbols { market }) if market == "us"));
    }

    #[test]
    fn file_source_requires_path() {
        let result = UniverseSource::from_parts("us", "file", Some("  "), None);
        assert!(matches!(result, Err(UniverseError::MissingPath { .. })));
    }

    #[test]
    fn unsupported_source_type() {
        let result = UniverseSource::from_parts("us", "database", None, None);
        assert!(
            matches!(result, Err(UniverseError::UnsupportedType { source_type, .. }) if source_type == "database")
        );
    }

    #[test]
    fn file_source_skips_blanks_and_comments() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("symbols.txt"), "# US large caps\nAAPL\n\n  msft  \n").unwrap();
        let source = UniverseSource::from_parts("us", "file", Some("symbols.txt"), None).unwrap();
        assert_eq!(source.load_symbols(dir.path()).unwrap(), vec!["AAPL", "msft"]);
    }

    #[test]
    fn file_source_missing_file() {
        let dir = TempDir::new().unwrap();
        let source = UniverseSource::from_parts("us", "file", Some("nope.txt"), None).unwrap();
        assert!(matches!(source.load_symbols(dir.path()), Err(UniverseError::FileNotFound(_))));
    }

    #[test]
    fn collect_symbols_across_sources() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("symbols.txt"), "aapl\n").unwrap();
        let sources = vec![
            UniverseSource::from_parts("us", "file", Some("symbols.txt"), None).unwrap(),
            UniverseSource::from_parts("us2", "inline", None, Some("AAPL, MSFT")).unwrap(),
        ];
        assert_eq!(collect_symbols(&sources, dir.path()).unwrap(), vec!["AAPL", "MSFT"]);
    }
}
