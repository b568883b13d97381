use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_FILE_NAME_LENGTH: usize = 255;
const MAX_KEYWORDS: usize = 200;
const MAX_KEYWORD_LENGTH: usize = 100;

// ───── Database Models ───────────────────────────────────────────────

/// One uploaded photo and the metadata derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ImageRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub file_url: String,
    pub extracted_text: String,
    pub detected_objects: Vec<String>,
    pub dominant_colors: Vec<String>,
    pub tags: Vec<String>,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row ready for insertion, keyword lists already normalized.
#[derive(Debug, Clone)]
pub struct ImageInsert {
    pub user_id: Uuid,
    pub file_name: String,
    pub file_url: String,
    pub extracted_text: String,
    pub detected_objects: Vec<String>,
    pub dominant_colors: Vec<String>,
    pub tags: Vec<String>,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalized set of metadata changes. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ImageChanges {
    pub file_name: Option<String>,
    pub extracted_text: Option<String>,
    pub detected_objects: Option<Vec<String>>,
    pub dominant_colors: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl ImageChanges {
    pub fn is_empty(&self) -> bool {
        self.file_name.is_none()
            && self.extracted_text.is_none()
            && self.detected_objects.is_none()
            && self.dominant_colors.is_none()
            && self.tags.is_none()
    }
}

// ───── API Response Models ──────────────────────────────────────────

/// An image record together with the relevance it earned for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: ImageRecord,
    pub search_score: i64,
}

#[derive(Debug, Serialize)]
pub struct ImageCreatedResponse {
    pub id: Uuid,
    pub tags: Vec<String>,
    pub detail_url: String,
}

// ───── Input & Validation Requests ──────────────────────────────────

/// Registers an already uploaded file together with the client-side
/// analysis results.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct NewImageRequest {
    #[validate(custom(function = "validate_file_name"))]
    pub file_name: String,

    #[validate(url(message = "file_url must be a valid URL"))]
    pub file_url: String,

    #[validate(range(min = 0, message = "file_size cannot be negative"))]
    pub file_size: i64,

    #[serde(default)]
    pub extracted_text: String,

    #[serde(default)]
    #[validate(custom(function = "validate_keywords"))]
    pub detected_objects: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_keywords"))]
    pub dominant_colors: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_keywords"))]
    pub ai_tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct UpdateImageRequest {
    #[validate(custom(function = "validate_file_name"))]
    pub file_name: Option<String>,

    pub extracted_text: Option<String>,

    #[validate(custom(function = "validate_keywords"))]
    pub detected_objects: Option<Vec<String>>,

    #[validate(custom(function = "validate_keywords"))]
    pub dominant_colors: Option<Vec<String>>,

    #[validate(custom(function = "validate_keywords"))]
    pub tags: Option<Vec<String>>,
}

impl From<UpdateImageRequest> for ImageChanges {
    fn from(request: UpdateImageRequest) -> Self {
        ImageChanges {
            file_name: request.file_name.map(|name| name.trim().to_string()),
            extracted_text: request.extracted_text.map(|text| text.trim().to_string()),
            detected_objects: request.detected_objects.map(|v| normalize_keywords(&v)),
            dominant_colors: request.dominant_colors.map(|v| normalize_keywords(&v)),
            tags: request.tags.map(|v| normalize_keywords(&v)),
        }
    }
}

/// File names are stored trimmed, so the bounds apply to the trimmed name.
fn validate_file_name(name: &str) -> Result<(), ValidationError> {
    let length = name.trim().chars().count();
    if length == 0 {
        return Err(ValidationError::new("blank_file_name")
            .with_message("file_name cannot be blank".into()));
    }
    if length > MAX_FILE_NAME_LENGTH {
        return Err(ValidationError::new("file_name_too_long")
            .with_message(format!("file_name cannot exceed {MAX_FILE_NAME_LENGTH} characters").into()));
    }
    Ok(())
}

fn validate_keywords(keywords: &Vec<String>) -> Result<(), ValidationError> {
    if keywords.len() > MAX_KEYWORDS {
        return Err(ValidationError::new("too_many_keywords")
            .with_message(format!("At most {MAX_KEYWORDS} keywords are allowed").into()));
    }
    if keywords.iter().any(|k| k.chars().count() > MAX_KEYWORD_LENGTH) {
        return Err(ValidationError::new("keyword_too_long")
            .with_message(format!("Keywords cannot exceed {MAX_KEYWORD_LENGTH} characters").into()));
    }
    Ok(())
}

/// Trims and lower-cases every keyword, drops empty entries and duplicates.
/// First occurrence wins, so the original order is kept.
pub fn normalize_keywords<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    keywords
        .iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keywords_lowercases_and_dedups_in_order() {
        let raw = vec!["  Ship ", "ocean", "", "SHIP", "Red Car"];
        assert_eq!(normalize_keywords(&raw), vec!["ship", "ocean", "red car"]);
    }

    #[test]
    fn new_image_request_rejects_bad_url() {
        let request = NewImageRequest {
            file_name: "boat.png".into(),
            file_url: "not a url".into(),
            file_size: 10,
            extracted_text: String::new(),
            detected_objects: vec![],
            dominant_colors: vec![],
            ai_tags: vec![],
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("file_url"));
    }

    #[test]
    fn update_request_normalizes_keyword_lists() {
        let changes = ImageChanges::from(UpdateImageRequest {
            tags: Some(vec!["Boat".into(), "boat".into()]),
            ..Default::default()
        });
        assert_eq!(changes.tags, Some(vec!["boat".to_string()]));
        assert!(changes.file_name.is_none());
        assert!(!changes.is_empty());
    }

    #[test]
    fn update_request_trims_text_like_inserts_do() {
        let changes = ImageChanges::from(UpdateImageRequest {
            extracted_text: Some("  Boarding pass  \n".into()),
            file_name: Some(" pass.png ".into()),
            ..Default::default()
        });
        assert_eq!(changes.extracted_text.as_deref(), Some("Boarding pass"));
        assert_eq!(changes.file_name.as_deref(), Some("pass.png"));
    }

    #[test]
    fn file_name_bounds_apply_after_trimming() {
        assert!(validate_file_name("   ").is_err());
        assert!(validate_file_name(&format!(" {} ", "a".repeat(255))).is_ok());
        assert!(validate_file_name(&"a".repeat(256)).is_err());
    }
}
