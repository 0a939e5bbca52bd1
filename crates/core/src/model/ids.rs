use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn is_valid_slug(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('-')
        && !s.ends_with('-')
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Error type for parsing a slug identifier from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
    raw: String,
}

impl ParseIdError {
    fn new(kind: &'static str, raw: &str) -> Self {
        Self {
            kind,
            raw: raw.to_string(),
        }
    }
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} slug: {:?}", self.kind, self.raw)
    }
}

impl std::error::Error for ParseIdError {}

/// Unique identifier for a learning module.
///
/// Modules are authored with kebab-case slugs (e.g. `business-networking`)
/// that double as persistence-key components, so the character set is
/// restricted to ASCII alphanumerics and interior hyphens.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleId(String);

impl ModuleId {
    /// Creates a `ModuleId` from a slug.
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the slug is empty or contains characters
    /// other than ASCII alphanumerics and interior hyphens.
    pub fn new(slug: impl Into<String>) -> Result<Self, ParseIdError> {
        let slug = slug.into();
        if is_valid_slug(&slug) {
            Ok(Self(slug))
        } else {
            Err(ParseIdError::new("ModuleId", &slug))
        }
    }

    /// Returns the underlying slug.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for a step within a module.
///
/// Step ids are immutable once authored and unique within their module.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StepId(String);

impl StepId {
    /// Creates a `StepId` from a slug.
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the slug is empty or contains characters
    /// other than ASCII alphanumerics and interior hyphens.
    pub fn new(slug: impl Into<String>) -> Result<Self, ParseIdError> {
        let slug = slug.into();
        if is_valid_slug(&slug) {
            Ok(Self(slug))
        } else {
            Err(ParseIdError::new("StepId", &slug))
        }
    }

    /// Returns the underlying slug.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleId({})", self.0)
    }
}

impl fmt::Debug for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StepId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Conversions ───────────────────────────────────────────────────────────────

impl FromStr for ModuleId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for StepId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ModuleId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for StepId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModuleId> for String {
    fn from(id: ModuleId) -> Self {
        id.0
    }
}

impl From<StepId> for String {
    fn from(id: StepId) -> Self {
        id.0
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_id_display() {
        let id = ModuleId::new("business-networking").unwrap();
        assert_eq!(id.to_string(), "business-networking");
    }

    #[test]
    fn test_step_id_from_str() {
        let id: StepId = "introduction-portuguese-business".parse().unwrap();
        assert_eq!(id.as_str(), "introduction-portuguese-business");
    }

    #[test]
    fn test_empty_slug_rejected() {
        assert!(ModuleId::new("").is_err());
        assert!(StepId::new("").is_err());
    }

    #[test]
    fn test_invalid_characters_rejected() {
        assert!(ModuleId::new("has spaces").is_err());
        assert!(StepId::new("trailing-").is_err());
        assert!(StepId::new("-leading").is_err());
        assert!(ModuleId::new("unicode-café").is_err());
    }

    #[test]
    fn test_id_roundtrip() {
        let original = StepId::new("step-1").unwrap();
        let serialized = original.to_string();
        let deserialized: StepId = serialized.parse().unwrap();
        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_serde_rejects_invalid_slug() {
        let result: Result<ModuleId, _> = serde_json::from_str("\"not a slug\"");
        assert!(result.is_err());
    }
}
