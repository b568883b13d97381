pub mod overlap;
pub mod query;
pub mod scorer;
pub mod vocabulary;
pub mod weights;

pub use overlap::{KeywordField, SearchMode};
pub use query::SearchQuery;
pub use scorer::RelevanceScorer;
pub use vocabulary::KeywordVocabulary;
pub use weights::{ScoreWeights, MAX_WEIGHT};
