use std::path::PathBuf;
use std::sync::Arc;

use actix_web::web;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use thiserror::Error;
pub type DbPool = Pool<SqliteConnectionManager>;

use crate::config::Config;
use helper::classifier_helpers::{CategoryClassifier, KeywordClassifier, RemoteZeroShotClassifier};
use helper::language_helpers::{LanguageDetector, WhatlangDetector};
use helper::media_helpers::{MediaError, MediaStore};
use helper::storage_helpers::{Storage, StorageError};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Storage could not be prepared: {0}")]
    Storage(#[from] StorageError),
    #[error("Upload directory could not be prepared: {0}")]
    Media(#[from] MediaError),
}

/// Everything a request handler needs to render the map or accept a submission.
pub struct AppState {
    pub storage: Storage,
    pub media: MediaStore,
    pub detector: Arc<dyn LanguageDetector>,
    pub classifier: Arc<dyn CategoryClassifier>,
}

impl AppState {
    /// Opens and initializes the store, creates the upload directory and picks
    /// the classifier backend.
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let storage = Storage::open(&config.database_file())?;
        storage.initialize()?;
        let media = MediaStore::open(&config.upload_path())?;

        let classifier: Arc<dyn CategoryClassifier> = match &config.classifier_url {
            Some(url) => Arc::new(RemoteZeroShotClassifier::new(
                url.clone(),
                config.classifier_api_token.clone(),
            )),
            None => Arc::new(KeywordClassifier),
        };

        Ok(AppState {
            storage,
            media,
            detector: Arc::new(WhatlangDetector),
            classifier,
        })
    }
}

/// Mounts the JSON API, uploaded media and the two-tab shell.
pub fn configure_routes(cfg: &mut web::ServiceConfig, media_root: PathBuf) {
    cfg.configure(routes::public::config_api)
        .service(actix_files::Files::new("/media", media_root))
        .configure(routes::pages::config_pages);
}

pub mod config;
pub mod helper;
pub mod models;
pub mod routes;
pub mod setup;
