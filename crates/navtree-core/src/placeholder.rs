//! Detection of unresolved cross-reference targets.
//!
//! A generator that has not finished resolving links leaves symbolic tokens
//! such as `@ref saa_installation` where a URL belongs. Such targets are
//! treated as absent.

use regex::Regex;

/// Default patterns for unresolved cross-references.
pub const DEFAULT_PLACEHOLDER_PATTERNS: &[&str] = &[r"^[@\\](ref|link|subpage)\s+\S+"];

/// Compiled set of placeholder patterns.
#[derive(Clone, Debug)]
pub struct PlaceholderPatterns {
    patterns: Vec<Regex>,
}

impl PlaceholderPatterns {
    /// Compile the given patterns.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Patterns that match nothing.
    #[must_use]
    pub fn none() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Whether `target` is an unresolved placeholder.
    #[must_use]
    pub fn is_placeholder(&self, target: &str) -> bool {
        let target = target.trim();
        self.patterns.iter().any(|p| p.is_match(target))
    }
}

impl Default for PlaceholderPatterns {
    fn default() -> Self {
        let patterns = DEFAULT_PLACEHOLDER_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();
        Self { patterns }
    }
}
