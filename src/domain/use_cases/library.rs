use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::API_PREFIX,
    domain::{
        analysis::{derive_tags, AnalysisSignals, TagRules},
        search::{KeywordField, RelevanceScorer, SearchMode, SearchQuery},
    },
    entities::image::{
        normalize_keywords, ImageChanges, ImageCreatedResponse, ImageInsert, ImageRecord,
        NewImageRequest, ScoredRecord, UpdateImageRequest,
    },
    errors::AppError,
    repositories::{image::ImageRepository, storage::ObjectStorage},
    utils::valid_uuid::valid_uuid,
};

pub struct LibraryHandler<R, S>
where
    R: ImageRepository,
    S: ObjectStorage,
{
    pub image_repo: R,
    pub storage: S,
    pub scorer: RelevanceScorer,
    pub tag_rules: TagRules,
}

impl<R, S> LibraryHandler<R, S>
where
    R: ImageRepository,
    S: ObjectStorage,
{
    pub fn new(image_repo: R, storage: S, scorer: RelevanceScorer, tag_rules: TagRules) -> Self {
        LibraryHandler {
            image_repo,
            storage,
            scorer,
            tag_rules,
        }
    }

    /// Lists the owner's images, newest first
    pub async fn list_images(&self, owner: &Uuid) -> Result<Vec<ImageRecord>, AppError> {
        self.image_repo.list_images(owner).await
    }

    /// Retrieves one image by its ID
    pub async fn get_image(&self, owner: &Uuid, id: &str) -> Result<ImageRecord, AppError> {
        let valid_id = valid_uuid(id)?;
        self.image_repo.get_image(owner, &valid_id).await
    }

    /// Stores a freshly analysed upload, deriving its tag list
    pub async fn add_image(&self, owner: &Uuid, request: NewImageRequest) -> Result<ImageCreatedResponse, AppError> {
        request.validate()?;

        let signals = AnalysisSignals {
            extracted_text: &request.extracted_text,
            detected_objects: &request.detected_objects,
            dominant_colors: &request.dominant_colors,
            ai_tags: &request.ai_tags,
        };
        let tags = derive_tags(&signals, &self.tag_rules);

        let now = Utc::now();
        let insert = ImageInsert {
            user_id: *owner,
            file_name: request.file_name.trim().to_string(),
            file_url: request.file_url.trim().to_string(),
            extracted_text: request.extracted_text.trim().to_string(),
            detected_objects: normalize_keywords(&request.detected_objects),
            dominant_colors: normalize_keywords(&request.dominant_colors),
            tags,
            file_size: request.file_size,
            created_at: now,
            updated_at: now,
        };

        let record = self.image_repo.create_image(&insert).await?;
        tracing::info!(image_id = %record.id, tags = record.tags.len(), "Image added to library");

        Ok(ImageCreatedResponse {
            id: record.id,
            detail_url: format!("{}/images/{}", API_PREFIX, record.id),
            tags: record.tags,
        })
    }

    /// Applies a metadata edit
    pub async fn update_image(&self, owner: &Uuid, id: &str, request: UpdateImageRequest) -> Result<ImageRecord, AppError> {
        request.validate()?;
        let valid_id = valid_uuid(id)?;

        let changes = ImageChanges::from(request);
        if changes.is_empty() {
            return Err(AppError::BadRequest("No changes supplied".into()));
        }

        self.image_repo.update_image(owner, &valid_id, &changes).await
    }

    /// Deletes the record and its stored file. A storage failure is logged
    /// and does not keep the record alive.
    pub async fn delete_image(&self, owner: &Uuid, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;
        let image = self.image_repo.get_image(owner, &valid_id).await?;

        if let Err(e) = self.storage.remove_object(&image.file_url).await {
            tracing::warn!(image_id = %valid_id, "Storage deletion failed: {}", e);
        }

        self.image_repo.delete_image(owner, &valid_id).await
    }

    /// Relevance search over all of the owner's images
    pub async fn search(&self, owner: &Uuid, query: &str) -> Result<Vec<ScoredRecord>, AppError> {
        if SearchQuery::parse(query).is_empty() {
            return Ok(Vec::new());
        }

        let records = self.image_repo.list_images(owner).await?;
        Ok(self.scorer.rank(query, records))
    }

    pub async fn search_by_tags(&self, owner: &Uuid, tags: &[String]) -> Result<Vec<ImageRecord>, AppError> {
        self.search_by_overlap(owner, KeywordField::Tags, tags).await
    }

    pub async fn search_by_objects(&self, owner: &Uuid, objects: &[String]) -> Result<Vec<ImageRecord>, AppError> {
        self.search_by_overlap(owner, KeywordField::Objects, objects).await
    }

    pub async fn search_by_colors(&self, owner: &Uuid, colors: &[String]) -> Result<Vec<ImageRecord>, AppError> {
        self.search_by_overlap(owner, KeywordField::Colors, colors).await
    }

    async fn search_by_overlap(&self, owner: &Uuid, field: KeywordField, values: &[String]) -> Result<Vec<ImageRecord>, AppError> {
        let values = normalize_keywords(values);
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let images = self.image_repo.find_overlapping(owner, field, &values).await?;
        tracing::info!(%field, matches = images.len(), "Overlap search complete");
        Ok(images)
    }

    /// Dispatches a query the way the search page's mode selector does.
    /// Overlap modes report a score of zero.
    pub async fn search_with_mode(&self, owner: &Uuid, query: &str, mode: SearchMode) -> Result<Vec<ScoredRecord>, AppError> {
        let parsed = SearchQuery::parse(query);
        if parsed.is_empty() {
            return Ok(Vec::new());
        }

        match mode.overlap_field() {
            Some(field) => {
                let images = self.search_by_overlap(owner, field, parsed.terms()).await?;
                Ok(images
                    .into_iter()
                    .map(|record| ScoredRecord { record, search_score: 0 })
                    .collect())
            }
            None => {
                let mut results = self.search(owner, query).await?;
                if mode == SearchMode::Text {
                    let phrase = parsed.phrase();
                    results.retain(|r| r.record.extracted_text.to_lowercase().contains(phrase));
                }
                Ok(results)
            }
        }
    }
}
