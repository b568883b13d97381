use crate::entities::image::{ImageRecord, ScoredRecord};

use super::{query::SearchQuery, vocabulary::KeywordVocabulary, weights::ScoreWeights};

/// Ranks image records against a free-text query by summing weighted
/// tag, object, color and text matches.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    weights: ScoreWeights,
    vocabulary: KeywordVocabulary,
    min_score: i64,
}

/// Lower-cased view of the searchable fields of one record.
struct Haystack {
    tags: Vec<String>,
    objects: Vec<String>,
    colors: Vec<String>,
    text: String,
}

impl Haystack {
    fn new(record: &ImageRecord) -> Self {
        let lower = |values: &[String]| -> Vec<String> { values.iter().map(|v| v.to_lowercase()).collect() };
        Haystack {
            tags: lower(&record.tags),
            objects: lower(&record.detected_objects),
            colors: lower(&record.dominant_colors),
            text: record.extracted_text.to_lowercase(),
        }
    }
}

fn any_contains(values: &[String], needle: &str) -> bool {
    values.iter().any(|v| v.contains(needle))
}

impl RelevanceScorer {
    pub fn new(weights: ScoreWeights, vocabulary: KeywordVocabulary, min_score: i64) -> Self {
        RelevanceScorer {
            weights,
            vocabulary: vocabulary.normalized(),
            min_score,
        }
    }

    pub fn min_score(&self) -> i64 {
        self.min_score
    }

    pub fn vocabulary(&self) -> &KeywordVocabulary {
        &self.vocabulary
    }

    /// Scores every record, keeps those reaching the threshold and sorts
    /// them by descending score. Equal scores keep their input order.
    pub fn rank(&self, query: &str, records: Vec<ImageRecord>) -> Vec<ScoredRecord> {
        let query = SearchQuery::parse(query);
        if query.is_empty() {
            return Vec::new();
        }

        let candidates = records.len();
        let mut ranked: Vec<ScoredRecord> = records
            .into_iter()
            .filter_map(|record| {
                let score = self.score(&query, &record);
                tracing::debug!(file_name = %record.file_name, score, "Scored record");
                (score >= self.min_score).then_some(ScoredRecord { record, search_score: score })
            })
            .collect();

        // `sort_by` is stable
        ranked.sort_by(|a, b| b.search_score.cmp(&a.search_score));

        tracing::info!(
            query = query.phrase(),
            candidates,
            matches = ranked.len(),
            top_score = ranked.first().map(|r| r.search_score),
            "Relevance search complete"
        );

        ranked
    }

    /// Sums every signal the record earns. Sums saturate at `i64::MAX`
    /// instead of wrapping.
    pub fn score(&self, query: &SearchQuery, record: &ImageRecord) -> i64 {
        if query.is_empty() {
            return 0;
        }

        let haystack = Haystack::new(record);

        [
            self.category_score(query, &haystack),
            self.phrase_score(query, &haystack),
            self.term_score(query, &haystack),
            self.pair_score(query, &haystack),
        ]
        .into_iter()
        .fold(0, i64::saturating_add)
    }

    fn category_score(&self, query: &SearchQuery, haystack: &Haystack) -> i64 {
        self.vocabulary
            .categories
            .iter()
            .filter(|(_, words)| query.terms().iter().any(|t| words.contains(t)))
            .filter(|(_, words)| {
                haystack
                    .tags
                    .iter()
                    .chain(haystack.objects.iter())
                    .any(|keyword| words.iter().any(|w| keyword.contains(w.as_str())))
            })
            .map(|(name, _)| {
                tracing::trace!(category = %name, "Category match");
                self.weights.category_match
            })
            .fold(0, i64::saturating_add)
    }

    fn phrase_score(&self, query: &SearchQuery, haystack: &Haystack) -> i64 {
        let phrase = query.phrase();
        let mut score: i64 = 0;

        if haystack.tags.iter().any(|t| t == phrase) {
            score = score.saturating_add(self.weights.exact_tag);
        }
        if haystack.objects.iter().any(|o| o == phrase) {
            score = score.saturating_add(self.weights.exact_object);
        }
        if haystack.text.contains(phrase) {
            score = score.saturating_add(self.weights.text_phrase);
        }

        score
    }

    fn term_score(&self, query: &SearchQuery, haystack: &Haystack) -> i64 {
        let w = &self.weights;

        query
            .terms()
            .iter()
            .map(|term| {
                let in_tags = any_contains(&haystack.tags, term);
                let in_objects = any_contains(&haystack.objects, term);
                let mut score: i64 = 0;

                if self.vocabulary.is_category_term(term) {
                    if in_tags {
                        score = score.saturating_add(w.category_tag);
                    }
                    if in_objects {
                        score = score.saturating_add(w.category_object);
                    }
                }
                if in_tags {
                    score = score.saturating_add(w.tag);
                }
                if in_objects {
                    score = score.saturating_add(w.object);
                }
                if any_contains(&haystack.colors, term) {
                    score = score.saturating_add(w.color);
                }
                if haystack.text.contains(term.as_str()) {
                    score = score.saturating_add(w.text);
                }

                score
            })
            .fold(0, i64::saturating_add)
    }

    fn pair_score(&self, query: &SearchQuery, haystack: &Haystack) -> i64 {
        if query.terms().len() < 2 {
            return 0;
        }

        let combinations: i64 = self
            .vocabulary
            .combinations
            .iter()
            .filter(|(a, b)| query.contains_term(a) && query.contains_term(b))
            .filter(|(a, b)| any_contains(&haystack.tags, a) && any_contains(&haystack.tags, b))
            .map(|_| self.weights.combination)
            .fold(0, i64::saturating_add);

        let terms = query.terms();
        let color_with_object = terms.iter().any(|color| {
            self.vocabulary.is_color(color)
                && any_contains(&haystack.colors, color)
                && terms.iter().any(|other| {
                    other != color
                        && (any_contains(&haystack.objects, other) || any_contains(&haystack.tags, other))
                })
        });

        if color_with_object {
            combinations.saturating_add(self.weights.color_object)
        } else {
            combinations
        }
    }
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        RelevanceScorer::new(ScoreWeights::default(), KeywordVocabulary::default(), 30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn record(tags: &[&str], objects: &[&str], colors: &[&str], text: &str) -> ImageRecord {
        let own = |v: &[&str]| v.iter().map(|s| s.to_string()).collect();
        ImageRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            file_name: "photo.png".into(),
            file_url: "https://example.com/photo.png".into(),
            extracted_text: text.into(),
            detected_objects: own(objects),
            dominant_colors: own(colors),
            tags: own(tags),
            file_size: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn single_signals_use_their_weights() {
        let scorer = RelevanceScorer::default();
        let w = ScoreWeights::default();
        let q = SearchQuery::parse("car");

        assert_eq!(scorer.score(&q, &record(&["sports car"], &[], &[], "")), w.tag);
        assert_eq!(scorer.score(&q, &record(&[], &["racecar"], &[], "")), w.object);
        assert_eq!(scorer.score(&q, &record(&[], &[], &[], "my car is fast")), w.text_phrase + w.text);
    }

    #[test]
    fn exact_tag_counts_phrase_and_term() {
        let scorer = RelevanceScorer::default();
        let w = ScoreWeights::default();
        let score = scorer.score(&SearchQuery::parse("Car"), &record(&["car"], &[], &[], ""));
        assert_eq!(score, w.exact_tag + w.tag);
    }

    #[test]
    fn mixed_case_record_fields_still_match() {
        let scorer = RelevanceScorer::default();
        let score = scorer.score(&SearchQuery::parse("dog"), &record(&["Dog"], &[], &[], "DOG"));
        assert!(score > 0);
    }

    #[test]
    fn empty_query_scores_zero() {
        let scorer = RelevanceScorer::default();
        assert_eq!(scorer.score(&SearchQuery::parse(""), &record(&["car"], &[], &[], "car")), 0);
    }
}
