//! Route pattern parsing and matching.
//!
//! Patterns consist of literal segments and `:name` dynamic segments
//! (`content/:id/edit`). A path matches when segment counts are equal,
//! every literal segment matches exactly, and every dynamic segment
//! captures a non-empty path segment.

use std::collections::HashMap;

use quill_core::AppError;

/// One segment of a parsed route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Must match the path segment exactly.
    Literal(String),
    /// Matches any non-empty path segment, binding it under the name.
    Param(String),
}

/// A parsed route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parses a pattern from its slash-separated form.
    ///
    /// The pattern is admin-base-relative; leading and trailing slashes
    /// are ignored, and the empty pattern matches the admin root.
    pub fn parse(pattern: &str) -> Result<Self, AppError> {
        let trimmed = pattern.trim_matches('/');
        let mut segments = Vec::new();

        if !trimmed.is_empty() {
            for part in trimmed.split('/') {
                if part.is_empty() {
                    return Err(AppError::validation(format!(
                        "Route pattern '{pattern}' contains an empty segment"
                    )));
                }
                if let Some(name) = part.strip_prefix(':') {
                    if name.is_empty()
                        || !name
                            .chars()
                            .all(|c| c.is_ascii_alphanumeric() || c == '_')
                    {
                        return Err(AppError::validation(format!(
                            "Route pattern '{pattern}' has an invalid parameter name ':{name}'"
                        )));
                    }
                    segments.push(Segment::Param(name.to_string()));
                } else {
                    segments.push(Segment::Literal(part.to_string()));
                }
            }
        }

        Ok(Self {
            raw: trimmed.to_string(),
            segments,
        })
    }

    /// Attempts to match the pattern against pre-split path segments,
    /// binding dynamic segments into a params map.
    pub fn matches(&self, path_segments: &[&str]) -> Option<HashMap<String, String>> {
        if path_segments.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(path_segments) {
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), (*part).to_string());
                }
            }
        }

        Some(params)
    }

    /// Number of literal (non-dynamic) segments; the specificity measure
    /// used for tie-breaking.
    pub fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    /// Whether the first segment is the given literal.
    pub fn starts_with_literal(&self, literal: &str) -> bool {
        matches!(self.segments.first(), Some(Segment::Literal(lit)) if lit == literal)
    }

    /// The normalized pattern string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Splits a normalized path into segments. The empty path yields no
/// segments (the admin root).
pub fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_and_dynamic_segments() {
        let pattern = RoutePattern::parse("content/:id/edit").unwrap();
        let params = pattern.matches(&["content", "42", "edit"]).unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));

        assert!(pattern.matches(&["content", "42"]).is_none());
        assert!(pattern.matches(&["media", "42", "edit"]).is_none());
    }

    #[test]
    fn root_pattern_matches_empty_path() {
        let pattern = RoutePattern::parse("").unwrap();
        assert!(pattern.matches(&[]).is_some());
        assert!(pattern.matches(&["content"]).is_none());
        assert_eq!(pattern.literal_count(), 0);
    }

    #[test]
    fn leading_and_trailing_slashes_are_ignored() {
        let a = RoutePattern::parse("/content/:id/").unwrap();
        let b = RoutePattern::parse("content/:id").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        assert!(RoutePattern::parse("content//edit").is_err());
        assert!(RoutePattern::parse("content/:").is_err());
        assert!(RoutePattern::parse("content/:bad-name").is_err());
    }

    #[test]
    fn literal_count_measures_specificity() {
        assert_eq!(RoutePattern::parse("a/:id").unwrap().literal_count(), 1);
        assert_eq!(RoutePattern::parse("a/literal").unwrap().literal_count(), 2);
    }
}
