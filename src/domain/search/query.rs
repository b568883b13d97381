/// A free-text query split into lower-cased, whitespace-separated terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
    phrase: String,
}

impl SearchQuery {
    pub fn parse(raw: &str) -> Self {
        let terms: Vec<String> = raw
            .trim()
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let phrase = terms.join(" ");

        SearchQuery { terms, phrase }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Terms joined by a single space.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }
}
