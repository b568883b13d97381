use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::image::{NewImageRequest, UpdateImageRequest},
    errors::AppError,
    use_cases::extractors::Owner,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_images(
    owner: Owner,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let images = state.library_handler.list_images(&owner.0).await?;
    Ok(HttpResponse::Ok().json(images))
}

#[instrument(skip(state, data))]
pub async fn add_image(
    owner: Owner,
    state: web::Data<AppState>,
    data: web::Json<NewImageRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.library_handler
        .add_image(&owner.0, data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state))]
pub async fn get_image(
    owner: Owner,
    image_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let image = state.library_handler.get_image(&owner.0, &image_id).await?;
    Ok(HttpResponse::Ok().json(image))
}

#[instrument(skip(state, data))]
pub async fn update_image(
    owner: Owner,
    image_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateImageRequest>,
) -> Result<impl Responder, AppError> {
    let updated = state.library_handler
        .update_image(&owner.0, &image_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

#[instrument(skip(state))]
pub async fn delete_image(
    owner: Owner,
    image_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.library_handler.delete_image(&owner.0, &image_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
