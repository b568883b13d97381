use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::instrument;

use crate::{domain::search::SearchMode, errors::AppError, use_cases::extractors::Owner, AppState};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub mode: Option<String>,
}

#[instrument(skip(state))]
pub async fn search_images(
    owner: Owner,
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> Result<impl Responder, AppError> {
    let mode: SearchMode = params.mode.as_deref().unwrap_or_default().parse()?;

    let results = state.library_handler
        .search_with_mode(&owner.0, &params.q, mode)
        .await?;

    Ok(HttpResponse::Ok().json(results))
}
