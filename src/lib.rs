mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{analysis, entities, search, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{auth, db, storage, utils};

use auth::jwt::JwtVerifier;
use errors::StorageError;
use repositories::sqlx_repo::SqlxImageRepo;
use search::RelevanceScorer;
use storage::supabase::SupabaseStorage;
use use_cases::library::LibraryHandler;

pub struct AppState {
    pub library_handler: AppLibraryHandler,
    pub token_verifier: JwtVerifier,
}

pub type AppLibraryHandler = LibraryHandler<SqlxImageRepo, SupabaseStorage>;

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Result<Self, StorageError> {
        let search = &config.search;
        let scorer = RelevanceScorer::new(search.weights, search.vocabulary.clone(), search.min_score);

        let image_repo = SqlxImageRepo::new(pool);
        let storage = SupabaseStorage::new(config)?;
        let library_handler = LibraryHandler::new(image_repo, storage, scorer, search.tag_rules.clone());

        Ok(AppState {
            library_handler,
            token_verifier: JwtVerifier::new(config),
        })
    }
}
