use std::collections::HashMap;

use academy_core::model::{Locale, Localized, Step};

/// Localized view of one step, ready for the hosting page to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub tips: Vec<&'a str>,
}

/// Resolves localized content for the current locale.
///
/// A pure lookup over bilingual strings, with English fallback throughout.
#[derive(Debug, Clone, Default)]
pub struct ContentResolver {
    locale: Locale,
    table: HashMap<String, Localized>,
}

impl ContentResolver {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            table: HashMap::new(),
        }
    }

    /// Registers a keyed translation table (page chrome strings).
    #[must_use]
    pub fn with_table(mut self, table: HashMap<String, Localized>) -> Self {
        self.table = table;
        self
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Looks up a keyed string, falling back to the given default when the
    /// key is unknown.
    #[must_use]
    pub fn translate<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.table
            .get(key)
            .map_or(fallback, |text| text.resolve(self.locale))
    }

    /// Resolves a step's title, body, and tips for the current locale.
    #[must_use]
    pub fn resolve_step<'a>(&self, step: &'a Step) -> StepView<'a> {
        StepView {
            title: step.title().resolve(self.locale),
            content: step.content().resolve(self.locale),
            tips: step
                .tips()
                .iter()
                .map(|tip| tip.resolve(self.locale))
                .collect(),
        }
    }
}
