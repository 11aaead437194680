//! Paths that bypass authentication.

use crate::security::pattern::{PathPattern, PatternError};

/// Immutable set of compiled allow-list patterns.
///
/// Membership is a set test: any matching entry exempts a path, so entry
/// order never changes the outcome.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    patterns: Vec<PathPattern>,
}

impl AllowList {
    /// Compile every entry, failing on the first malformed one.
    pub fn from_patterns<S: AsRef<str>>(raw: &[S]) -> Result<Self, PatternError> {
        let patterns = raw
            .iter()
            .map(|p| PathPattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Returns true if requests to `path` may proceed without credentials.
    ///
    /// Paths carrying `.`/`..` segments or encoded separators are never
    /// exempt; they fall through to authentication.
    pub fn is_exempt(&self, path: &str) -> bool {
        if !is_normalized(path) {
            return false;
        }
        self.patterns.iter().any(|p| p.matches(path))
    }

    /// The first pattern that exempts `path`, for logging.
    pub fn matching_pattern(&self, path: &str) -> Option<&PathPattern> {
        if !is_normalized(path) {
            return None;
        }
        self.patterns.iter().find(|p| p.matches(path))
    }

    pub fn patterns(&self) -> &[PathPattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn is_normalized(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    if lower.contains("%2f") || lower.contains("%5c") || lower.contains("%2e") || path.contains('\\') {
        return false;
    }
    !path.split('/').any(|seg| seg == "." || seg == "..")
}
