//! Lookup results and how they are rendered into a document.

use crate::query::SourceLocator;

const RULE: &str = "--------------------------------------------";

/// Extracted article text. Never empty when held by
/// [`ExtractionResult::Found`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary(String);

impl Summary {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Found {
        summary: Summary,
        locator: SourceLocator,
    },
    /// The page exists but nothing usable was extracted.
    NotFound { locator: SourceLocator },
}

impl ExtractionResult {
    pub fn locator(&self) -> &SourceLocator {
        match self {
            ExtractionResult::Found { locator, .. } | ExtractionResult::NotFound { locator } => {
                locator
            }
        }
    }

    pub fn summary(&self) -> Option<&Summary> {
        match self {
            ExtractionResult::Found { summary, .. } => Some(summary),
            ExtractionResult::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ExtractionResult::Found { .. })
    }

    /// Summary text, or the placeholder message for an empty page.
    pub fn message(&self) -> String {
        match self {
            ExtractionResult::Found { summary, .. } => summary.text().to_string(),
            ExtractionResult::NotFound { locator } => placeholder(locator),
        }
    }

    /// The block appended to a document.
    ///
    /// ```
    /// use lim_wiki::{ExtractionResult, Query, SourceLocator};
    ///
    /// let locator = SourceLocator::new("https://en.wikipedia.org", &Query::parse("Qwzx").unwrap());
    /// let empty = ExtractionResult::NotFound { locator };
    /// assert_eq!(
    ///     empty.render(),
    ///     "Could not find a relevant summary on Wikipedia. (https://en.wikipedia.org/wiki/Qwzx)"
    /// );
    /// ```
    pub fn render(&self) -> String {
        match self {
            ExtractionResult::Found { summary, locator } => format!(
                "-{}\n{RULE}\nSource: Wikipedia ({locator})",
                summary.text()
            ),
            ExtractionResult::NotFound { locator } => placeholder(locator),
        }
    }
}

fn placeholder(locator: &SourceLocator) -> String {
    format!("Could not find a relevant summary on Wikipedia. ({locator})")
}
