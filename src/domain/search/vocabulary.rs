use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Keyword lists the scorer gives special treatment to.
///
/// Everything here is plain data loaded from configuration, so new
/// categories, colors or combinations need no change to the scoring code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordVocabulary {
    /// Domain categories (e.g. `marine`) whose terms earn the category
    /// bonus and elevated per-term weights.
    pub categories: BTreeMap<String, BTreeSet<String>>,
    /// Recognized color names, used for the color + object bonus.
    pub colors: BTreeSet<String>,
    /// Two-term combinations rewarded when both terms are found in tags.
    pub combinations: Vec<(String, String)>,
}

const MARINE_TERMS: &[&str] = &["cruise", "ship", "boat", "vessel", "ocean", "sea", "marine"];
const COLOR_NAMES: &[&str] = &[
    "red", "blue", "green", "yellow", "black", "white", "orange", "purple", "pink",
];

impl Default for KeywordVocabulary {
    fn default() -> Self {
        let mut categories = BTreeMap::new();
        categories.insert("marine".to_string(), to_set(MARINE_TERMS));

        KeywordVocabulary {
            categories,
            colors: to_set(COLOR_NAMES),
            combinations: vec![("cruise".to_string(), "ship".to_string())],
        }
    }
}

impl KeywordVocabulary {
    /// Lower-cases and trims every keyword, dropping blanks.
    pub fn normalized(self) -> Self {
        let categories = self
            .categories
            .into_iter()
            .map(|(name, words)| (name.trim().to_lowercase(), normalize_set(words)))
            .filter(|(_, words)| !words.is_empty())
            .collect();

        let combinations = self
            .combinations
            .into_iter()
            .map(|(a, b)| (a.trim().to_lowercase(), b.trim().to_lowercase()))
            .filter(|(a, b)| !a.is_empty() && !b.is_empty() && a != b)
            .collect();

        KeywordVocabulary {
            categories,
            colors: normalize_set(self.colors),
            combinations,
        }
    }

    /// Categories the term belongs to.
    pub fn categories_of<'a>(&'a self, term: &'a str) -> impl Iterator<Item = (&'a str, &'a BTreeSet<String>)> + 'a {
        self.categories
            .iter()
            .filter(move |(_, words)| words.contains(term))
            .map(|(name, words)| (name.as_str(), words))
    }

    pub fn is_category_term(&self, term: &str) -> bool {
        self.categories_of(term).next().is_some()
    }

    pub fn is_color(&self, term: &str) -> bool {
        self.colors.contains(term)
    }
}

fn to_set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn normalize_set(words: BTreeSet<String>) -> BTreeSet<String> {
    words
        .into_iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vocabulary_knows_marine_terms_and_colors() {
        let vocabulary = KeywordVocabulary::default();
        assert!(vocabulary.is_category_term("vessel"));
        assert!(!vocabulary.is_category_term("car"));
        assert!(vocabulary.is_color("purple"));
        assert_eq!(vocabulary.combinations, vec![("cruise".into(), "ship".into())]);
    }

    #[test]
    fn normalized_cleans_up_configured_lists() {
        let mut categories = BTreeMap::new();
        categories.insert(" Aviation ".to_string(), ["Plane ", "", "JET"].iter().map(|s| s.to_string()).collect());
        categories.insert("empty".to_string(), BTreeSet::from(["  ".to_string()]));

        let vocabulary = KeywordVocabulary {
            categories,
            colors: BTreeSet::from(["Teal".to_string()]),
            combinations: vec![("Hot".into(), " Air ".into()), ("same".into(), "same".into())],
        }
        .normalized();

        assert_eq!(vocabulary.categories.len(), 1);
        assert!(vocabulary.categories["aviation"].contains("plane"));
        assert!(vocabulary.categories["aviation"].contains("jet"));
        assert!(vocabulary.is_color("teal"));
        assert_eq!(vocabulary.combinations, vec![("hot".into(), "air".into())]);
    }
}
