use crate::helper::classifier_helpers::{self, ClassifierError};
use crate::helper::form_helpers::SubmissionForm;
use crate::helper::language_helpers;
use crate::helper::media_helpers::MediaError;
use crate::helper::storage_helpers::StorageError;
use crate::models::{Category, CategoryChoice, NewContribution};
use crate::AppState;
use actix_web::error::BlockingError;
use actix_web::web;
use chrono::Local;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Category classification failed: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("Saving the media file failed: {0}")]
    Media(#[from] MediaError),
    #[error("Storing the contribution failed: {0}")]
    Storage(#[from] StorageError),
    #[error("Background task failed: {0}")]
    Blocking(#[from] BlockingError),
}

/// What the submitter sees echoed back after a successful insert.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub language: String,
    pub category: Category,
    pub media_url: Option<String>,
}

impl SubmissionOutcome {
    pub fn confirmation(&self) -> String {
        format!(
            "Contribution submitted! Detected Language: {}, Category: {}",
            self.language, self.category
        )
    }
}

/// Detect language, pick a category, save media, then insert. Only language
/// detection has a fallback; any other failure aborts before the insert.
pub async fn submit_contribution(
    state: &AppState,
    form: SubmissionForm,
) -> Result<SubmissionOutcome, SubmitError> {
    let language = language_helpers::detect_or_unknown(state.detector.as_ref(), &form.description);

    let category = match form.category {
        CategoryChoice::AutoDetect => {
            classifier_helpers::top_label(state.classifier.as_ref(), &form.description).await?
        }
        CategoryChoice::Fixed(category) => category,
    };

    let media_url = match form.media {
        Some(upload) => {
            let store = state.media.clone();
            let path = web::block(move || store.save(&upload.bytes, &upload.filename)).await??;
            Some(path.to_string_lossy().replace('\\', "/"))
        }
        None => None,
    };

    let contribution = NewContribution {
        username: form.username,
        title: form.title,
        description: form.description,
        category,
        language: language.clone(),
        latitude: form.latitude,
        longitude: form.longitude,
        media_url: media_url.clone(),
        timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
    };
    state.storage.insert(&contribution)?;

    log::info!(
        "Stored contribution '{}' ({}, {}) at ({}, {})",
        contribution.title,
        category,
        language,
        contribution.latitude,
        contribution.longitude
    );

    Ok(SubmissionOutcome {
        language,
        category,
        media_url,
    })
}
