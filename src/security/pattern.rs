//! Path pattern parsing and matching.
//!
//! # Responsibilities
//! - Parse allow-list entries once at startup
//! - Match request paths segment by segment
//!
//! # Design Decisions
//! - `*` and `?` never cross a `/` boundary
//! - `**` only as the final segment; `/docs/**` also matches `/docs`
//! - Literal segments are case-sensitive
//! - No regex to guarantee O(n) matching

use std::fmt;

/// Reasons a pattern is rejected at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,
    #[error("pattern '{0}' must start with '/'")]
    MissingLeadingSlash(String),
    #[error("pattern '{0}' contains an empty segment")]
    EmptySegment(String),
    #[error("pattern '{0}': '**' must be the last segment")]
    DoubleWildcardNotLast(String),
    #[error("pattern '{0}': '**' must occupy a whole segment")]
    DoubleWildcardInSegment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Glob(Vec<char>),
    AnyDepth,
}

impl Segment {
    fn matches(&self, candidate: &str) -> bool {
        match self {
            Segment::Literal(lit) => lit == candidate,
            Segment::Glob(glob) => glob_matches(glob, candidate),
            Segment::AnyDepth => true,
        }
    }
}

/// A compiled allow-list pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern such as `/api/health` or `/swagger-ui/**`.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if raw.is_empty() {
            return Err(PatternError::Empty);
        }
        let Some(rest) = raw.strip_prefix('/') else {
            return Err(PatternError::MissingLeadingSlash(raw.to_string()));
        };

        let parts = split_segments(rest);
        let mut segments = Vec::with_capacity(parts.len());
        for (i, part) in parts.iter().enumerate() {
            let segment = if part.is_empty() {
                return Err(PatternError::EmptySegment(raw.to_string()));
            } else if *part == "**" {
                if i + 1 != parts.len() {
                    return Err(PatternError::DoubleWildcardNotLast(raw.to_string()));
                }
                Segment::AnyDepth
            } else if part.contains("**") {
                return Err(PatternError::DoubleWildcardInSegment(raw.to_string()));
            } else if part.contains(['*', '?']) {
                Segment::Glob(part.chars().collect())
            } else {
                Segment::Literal(part.to_string())
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The pattern as written in configuration.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true if `path` (no query string) matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let Some(rest) = path.strip_prefix('/') else {
            return false;
        };
        let mut candidates = split_segments(rest).into_iter();

        for segment in &self.segments {
            if *segment == Segment::AnyDepth {
                return true;
            }
            match candidates.next() {
                Some(candidate) if segment.matches(candidate) => {}
                _ => return false,
            }
        }
        candidates.next().is_none()
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// `"a/b"` → `["a", "b"]`, `""` → `[]`, `"a/"` → `["a", ""]`.
fn split_segments(rest: &str) -> Vec<&str> {
    if rest.is_empty() {
        Vec::new()
    } else {
        rest.split('/').collect()
    }
}

/// Single-segment wildcard match: `*` is any run of characters, `?` exactly one.
fn glob_matches(glob: &[char], candidate: &str) -> bool {
    let text: Vec<char> = candidate.chars().collect();
    let (mut g, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match glob.get(g) {
            Some('*') => {
                backtrack = Some((g, t));
                g += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                g += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star_g, star_t)) => {
                    g = star_g + 1;
                    t = star_t + 1;
                    backtrack = Some((star_g, star_t + 1));
                }
                None => return false,
            },
        }
    }

    glob[g..].iter().all(|c| *c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pat(raw: &str) -> PathPattern {
        PathPattern::parse(raw).unwrap()
    }

    #[test]
    fn test_exact_pattern() {
        let p = pat("/api/health");
        assert!(p.matches("/api/health"));
        assert!(!p.matches("/api/health/"));
        assert!(!p.matches("/api/healthz"));
        assert!(!p.matches("/api"));
        assert!(!p.matches("/API/health"));
    }

    #[test]
    fn test_trailing_double_wildcard() {
        let p = pat("/swagger-ui/**");
        assert!(p.matches("/swagger-ui"));
        assert!(p.matches("/swagger-ui/"));
        assert!(p.matches("/swagger-ui/index.html"));
        assert!(p.matches("/swagger-ui/a/b/c"));
        assert!(!p.matches("/swagger-uix"));
        assert!(!p.matches("/other/swagger-ui/x"));
    }

    #[test]
    fn test_root_patterns() {
        assert!(pat("/**").matches("/"));
        assert!(pat("/**").matches("/anything/at/all"));
        assert!(pat("/").matches("/"));
        assert!(!pat("/").matches("/x"));
    }

    #[test]
    fn test_single_segment_globs() {
        let p = pat("/files/*.json");
        assert!(p.matches("/files/a.json"));
        assert!(p.matches("/files/.json"));
        assert!(!p.matches("/files/a.yaml"));
        assert!(!p.matches("/files/dir/a.json"));

        let q = pat("/v?/docs");
        assert!(q.matches("/v3/docs"));
        assert!(!q.matches("/v10/docs"));
    }

    #[test]
    fn test_glob_backtracking() {
        assert!(glob_matches(&"a*b*c".chars().collect::<Vec<_>>(), "aXbYbZc"));
        assert!(!glob_matches(&"a*b*c".chars().collect::<Vec<_>>(), "aXbYbZ"));
        assert!(glob_matches(&"**".chars().collect::<Vec<_>>(), ""));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(PathPattern::parse(""), Err(PatternError::Empty));
        assert!(matches!(
            PathPattern::parse("api/health"),
            Err(PatternError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            PathPattern::parse("/api//health"),
            Err(PatternError::EmptySegment(_))
        ));
        assert!(matches!(
            PathPattern::parse("/api/"),
            Err(PatternError::EmptySegment(_))
        ));
        assert!(matches!(
            PathPattern::parse("/a/**/b"),
            Err(PatternError::DoubleWildcardNotLast(_))
        ));
        assert!(matches!(
            PathPattern::parse("/a**"),
            Err(PatternError::DoubleWildcardInSegment(_))
        ));
    }

    #[test]
    fn test_display_round_trips_raw() {
        assert_eq!(pat("/v3/api-docs/**").to_string(), "/v3/api-docs/**");
    }
}
