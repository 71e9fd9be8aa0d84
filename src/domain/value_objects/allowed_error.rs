use serde::{Deserialize, Serialize};

/// Label of the pattern that makes an existing, populated clone target benign
pub const DESTINATION_NOT_EMPTY: &str = "destination-not-empty";

/// A stderr condition that turns a non-zero exit into a benign outcome
///
/// Matching is case-sensitive substring containment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedErrorPattern {
    pub label: String,
    pub needle: String,
}

impl AllowedErrorPattern {
    pub fn new(label: impl Into<String>, needle: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            needle: needle.into(),
        }
    }

    pub fn matches(&self, stderr: &str) -> bool {
        stderr.contains(&self.needle)
    }
}

/// Ordered set of allowed patterns; the first match wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowedErrorPatterns(Vec<AllowedErrorPattern>);

impl AllowedErrorPatterns {
    pub fn new(patterns: Vec<AllowedErrorPattern>) -> Self {
        Self(patterns)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn with(mut self, pattern: AllowedErrorPattern) -> Self {
        self.0.push(pattern);
        self
    }

    pub fn first_match(&self, stderr: &str) -> Option<&AllowedErrorPattern> {
        self.0.iter().find(|pattern| pattern.matches(stderr))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AllowedErrorPattern> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for AllowedErrorPatterns {
    fn default() -> Self {
        Self(vec![AllowedErrorPattern::new(
            DESTINATION_NOT_EMPTY,
            "already exists and is not an empty directory",
        )])
    }
}
