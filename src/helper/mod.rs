pub mod classifier_helpers;
pub mod form_helpers;
pub mod language_helpers;
pub mod map_helpers;
pub mod media_helpers;
pub mod storage_helpers;
pub mod submission_helpers;
