//! Job-scoped identifier accumulation

use std::collections::BTreeSet;

/// Deduplicating identifier set for one job
///
/// Merges are order-independent and never admit the sentinel.
#[derive(Debug, Clone)]
pub struct IdentifierAccumulator {
    identifiers: BTreeSet<String>,
    sentinel: String,
}

impl IdentifierAccumulator {
    #[must_use]
    pub fn new(sentinel: impl Into<String>) -> Self {
        Self {
            identifiers: BTreeSet::new(),
            sentinel: sentinel.into(),
        }
    }

    /// Merge one page's identifiers, skipping the sentinel
    pub fn merge<I>(&mut self, identifiers: I)
    where
        I: IntoIterator<Item = String>,
    {
        let sentinel = &self.sentinel;
        self.identifiers
            .extend(identifiers.into_iter().filter(|id| id != sentinel));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers.contains(identifier)
    }

    /// Freeze the set into a result
    #[must_use]
    pub fn finalize(mut self) -> ScrapeOutput {
        self.identifiers.remove(&self.sentinel);
        ScrapeOutput {
            identifiers: self.identifiers.into_iter().collect(),
        }
    }
}

/// Final, sorted identifier list of a finished job
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrapeOutput {
    identifiers: Vec<String>,
}

impl ScrapeOutput {
    #[must_use]
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// One identifier per line, no trailing newline
    #[must_use]
    pub fn to_text(&self) -> String {
        self.identifiers.join("\n")
    }
}
