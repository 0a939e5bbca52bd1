use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Locale of the hosting page. The platform ships English and Portuguese.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Pt,
}

impl Locale {
    /// Returns the two-letter language code (`"en"` / `"pt"`).
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Pt => "pt",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error type for parsing a locale code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLocaleError {
    raw: String,
}

impl fmt::Display for ParseLocaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported locale: {:?}", self.raw)
    }
}

impl std::error::Error for ParseLocaleError {}

impl FromStr for Locale {
    type Err = ParseLocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Locale::En),
            "pt" => Ok(Locale::Pt),
            other => Err(ParseLocaleError {
                raw: other.to_string(),
            }),
        }
    }
}

/// A user-facing string authored in English with an optional Portuguese
/// override.
///
/// Content in the academy is authored as English/Portuguese pairs; where the
/// Portuguese text is missing, resolution falls back to English rather than
/// rendering a blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized {
    en: String,
    pt: Option<String>,
}

impl Localized {
    /// Creates a bilingual string.
    #[must_use]
    pub fn new(en: impl Into<String>, pt: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            pt: Some(pt.into()),
        }
    }

    /// Creates an English-only string.
    #[must_use]
    pub fn english(en: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            pt: None,
        }
    }

    /// Resolves the text for the given locale, falling back to English.
    #[must_use]
    pub fn resolve(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Pt => self.pt.as_deref().unwrap_or(&self.en),
        }
    }

    #[must_use]
    pub fn en(&self) -> &str {
        &self.en
    }

    #[must_use]
    pub fn pt(&self) -> Option<&str> {
        self.pt.as_deref()
    }
}
