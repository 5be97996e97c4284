//! Unique, content-derived identifiers.

use std::collections::HashSet;

/// Issues ids derived from text, unique within one parse.
///
/// A generator remembers every id it handed out. Create one per document: sharing
/// an instance across documents would make ids depend on unrelated content.
#[derive(Debug, Default)]
pub struct IdGenerator {
    generated: HashSet<String>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `prefix` followed by the alphanumeric characters of `text`,
    /// suffixed with `0`, `1`, ... until the id has not been issued before.
    ///
    /// # Panics
    ///
    /// When `prefix` is empty or not purely ASCII alphabetic: the result must be
    /// usable as an HTML id, which cannot start with a digit.
    pub fn generate_unique_id(&mut self, prefix: &str, text: &str) -> String {
        assert!(
            !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_alphabetic()),
            "id prefix [{prefix}] must be non-empty and contain only ASCII letters"
        );

        let base = format!("{prefix}{}", normalize_id(text));
        let mut id = base.clone();
        let mut occurrence = 0usize;
        while self.generated.contains(&id) {
            id = format!("{base}{occurrence}");
            occurrence += 1;
        }

        let fresh = self.generated.insert(id.clone());
        assert!(fresh, "id generator issued [{id}] twice");
        id
    }

    pub fn is_generated(&self, id: &str) -> bool {
        self.generated.contains(id)
    }

    pub fn len(&self) -> usize {
        self.generated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generated.is_empty()
    }
}

fn normalize_id(text: &str) -> String {
    text.chars().filter(char::is_ascii_alphanumeric).collect()
}
