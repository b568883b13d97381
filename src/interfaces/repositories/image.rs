use async_trait::async_trait;
use uuid::Uuid;
use sqlx::{self, Postgres, QueryBuilder};

use crate::{
    domain::search::KeywordField,
    entities::image::{ImageChanges, ImageInsert, ImageRecord},
    errors::AppError,
    repositories::sqlx_repo::SqlxImageRepo,
};

const IMAGE_COLUMNS: &str = "id, user_id, file_name, file_url, extracted_text, detected_objects, \
    dominant_colors, tags, file_size, created_at, updated_at";

/// Persistence of image records. Every query is scoped to one owner.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    /// All records of the owner, newest first.
    async fn list_images(&self, owner: &Uuid) -> Result<Vec<ImageRecord>, AppError>;
    async fn get_image(&self, owner: &Uuid, id: &Uuid) -> Result<ImageRecord, AppError>;
    async fn create_image(&self, image: &ImageInsert) -> Result<ImageRecord, AppError>;
    async fn update_image(&self, owner: &Uuid, id: &Uuid, changes: &ImageChanges) -> Result<ImageRecord, AppError>;
    async fn delete_image(&self, owner: &Uuid, id: &Uuid) -> Result<(), AppError>;
    /// Records whose `field` shares at least one keyword with `values`, newest first.
    async fn find_overlapping(&self, owner: &Uuid, field: KeywordField, values: &[String]) -> Result<Vec<ImageRecord>, AppError>;
}

impl SqlxImageRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxImageRepo { pool }
    }
}

#[async_trait]
impl ImageRepository for SqlxImageRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn list_images(&self, owner: &Uuid) -> Result<Vec<ImageRecord>, AppError> {
        let images = sqlx::query_as::<_, ImageRecord>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM images WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    async fn get_image(&self, owner: &Uuid, id: &Uuid) -> Result<ImageRecord, AppError> {
        sqlx::query_as::<_, ImageRecord>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM images WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".into()))
    }

    async fn create_image(&self, image: &ImageInsert) -> Result<ImageRecord, AppError> {
        let record = sqlx::query_as::<_, ImageRecord>(&format!(
            r#"
            INSERT INTO images (
                user_id, file_name, file_url, extracted_text, detected_objects,
                dominant_colors, tags, file_size, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {IMAGE_COLUMNS}
            "#
        ))
        .bind(image.user_id)
        .bind(&image.file_name)
        .bind(&image.file_url)
        .bind(&image.extracted_text)
        .bind(&image.detected_objects)
        .bind(&image.dominant_colors)
        .bind(&image.tags)
        .bind(image.file_size)
        .bind(image.created_at)
        .bind(image.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn update_image(&self, owner: &Uuid, id: &Uuid, changes: &ImageChanges) -> Result<ImageRecord, AppError> {
        // COALESCE keeps the stored value when a change is absent
        sqlx::query_as::<_, ImageRecord>(&format!(
            r#"
            UPDATE images SET
                file_name = COALESCE($1, file_name),
                extracted_text = COALESCE($2, extracted_text),
                detected_objects = COALESCE($3, detected_objects),
                dominant_colors = COALESCE($4, dominant_colors),
                tags = COALESCE($5, tags),
                updated_at = NOW()
            WHERE id = $6 AND user_id = $7
            RETURNING {IMAGE_COLUMNS}
            "#
        ))
        .bind(&changes.file_name)
        .bind(&changes.extracted_text)
        .bind(&changes.detected_objects)
        .bind(&changes.dominant_colors)
        .bind(&changes.tags)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".into()))
    }

    async fn delete_image(&self, owner: &Uuid, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Image not found".into()));
        }

        Ok(())
    }

    async fn find_overlapping(&self, owner: &Uuid, field: KeywordField, values: &[String]) -> Result<Vec<ImageRecord>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {IMAGE_COLUMNS} FROM images WHERE user_id = "));

        builder.push_bind(*owner);
        // `field.column()` is a fixed identifier, never user input
        builder.push(format!(" AND {} && ", field.column())).push_bind(values.to_vec());
        builder.push(" ORDER BY created_at DESC");

        let query = builder.build_query_as::<ImageRecord>();
        let images: Vec<ImageRecord> = query.fetch_all(&self.pool).await?;

        Ok(images)
    }
}
