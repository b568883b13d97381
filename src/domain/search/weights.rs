use serde::{Deserialize, Serialize};

/// Point values of every relevance signal.
///
/// Magnitudes are free parameters. Only their relative order matters and
/// is enforced by [`ScoreWeights::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub category_match: i64,
    pub exact_tag: i64,
    pub exact_object: i64,
    pub text_phrase: i64,
    pub combination: i64,
    pub color_object: i64,
    pub category_tag: i64,
    pub category_object: i64,
    pub tag: i64,
    pub object: i64,
    pub color: i64,
    pub text: i64,
}

/// Largest accepted weight. Keeps a query of many terms far from `i64::MAX`.
pub const MAX_WEIGHT: i64 = 1_000_000_000;

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            category_match: 2000,
            exact_tag: 1500,
            exact_object: 1200,
            text_phrase: 1000,
            combination: 800,
            color_object: 300,
            category_tag: 500,
            category_object: 400,
            tag: 100,
            object: 80,
            color: 60,
            text: 40,
        }
    }
}

impl ScoreWeights {
    fn named(&self) -> [(&'static str, i64); 12] {
        [
            ("category_match", self.category_match),
            ("exact_tag", self.exact_tag),
            ("exact_object", self.exact_object),
            ("text_phrase", self.text_phrase),
            ("combination", self.combination),
            ("color_object", self.color_object),
            ("category_tag", self.category_tag),
            ("category_object", self.category_object),
            ("tag", self.tag),
            ("object", self.object),
            ("color", self.color),
            ("text", self.text),
        ]
    }

    /// Checks the ranking order between signals. Returns every violation.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let chain = [
            ("category_match", self.category_match),
            ("exact_tag", self.exact_tag),
            ("exact_object", self.exact_object),
            ("text_phrase", self.text_phrase),
            ("combination", self.combination),
            ("tag", self.tag),
            ("object", self.object),
            ("color", self.color),
            ("text", self.text),
        ];

        let mut errors: Vec<String> = chain
            .windows(2)
            .filter(|pair| pair[0].1 <= pair[1].1)
            .map(|pair| format!("{} must be greater than {}", pair[0].0, pair[1].0))
            .collect();

        if self.text <= 0 {
            errors.push("text must be positive".to_string());
        }
        for (name, value) in self.named() {
            if value > MAX_WEIGHT {
                errors.push(format!("{name} cannot exceed {MAX_WEIGHT}"));
            }
        }
        if self.color_object > self.combination || self.color_object <= self.tag {
            errors.push("color_object must lie in (tag, combination]".to_string());
        }
        if self.category_tag <= self.tag {
            errors.push("category_tag must be greater than tag".to_string());
        }
        if self.category_object <= self.object {
            errors.push("category_object must be greater than object".to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
