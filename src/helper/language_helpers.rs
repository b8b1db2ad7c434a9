use crate::models::UNKNOWN_LANGUAGE;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DetectionError {
    #[error("No language features found in the text.")]
    NoFeatures,
}

pub trait LanguageDetector: Send + Sync {
    /// Best-guess language code for `text`.
    fn detect(&self, text: &str) -> Result<String, DetectionError>;
}

/// Trigram-based detection backed by `whatlang`, reporting ISO 639-1 codes
/// where one exists and the ISO 639-3 code otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Result<String, DetectionError> {
        let info = whatlang::detect(text).ok_or(DetectionError::NoFeatures)?;
        Ok(to_short_code(info.lang().code()).to_string())
    }
}

fn to_short_code(iso639_3: &str) -> &str {
    match iso639_3 {
        "eng" => "en",
        "hin" => "hi",
        "tam" => "ta",
        "ben" => "bn",
        "tel" => "te",
        "mar" => "mr",
        "guj" => "gu",
        "kan" => "kn",
        "mal" => "ml",
        "pan" => "pa",
        "ori" => "or",
        "urd" => "ur",
        "nep" => "ne",
        "sin" => "si",
        "spa" => "es",
        "fra" => "fr",
        "deu" => "de",
        "por" => "pt",
        "ita" => "it",
        "nld" => "nl",
        "rus" => "ru",
        "ukr" => "uk",
        "pol" => "pl",
        "tur" => "tr",
        "ara" => "ar",
        "pes" => "fa",
        "heb" => "he",
        "jpn" => "ja",
        "kor" => "ko",
        "cmn" => "zh-cn",
        "tha" => "th",
        "vie" => "vi",
        "ind" => "id",
        other => other,
    }
}

/// Runs the detector, substituting the `"unknown"` sentinel on failure.
pub fn detect_or_unknown(detector: &dyn LanguageDetector, text: &str) -> String {
    match detector.detect(text) {
        Ok(code) => code,
        Err(e) => {
            log::warn!("Language detection failed, storing '{}': {}", UNKNOWN_LANGUAGE, e);
            UNKNOWN_LANGUAGE.to_string()
        }
    }
}
