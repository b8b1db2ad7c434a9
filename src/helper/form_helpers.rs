use crate::helper::media_helpers::{validate_filename, MediaError, MediaUpload};
use crate::models::{CategoryChoice, DEFAULT_LATITUDE, DEFAULT_LONGITUDE};
use actix_multipart::{Multipart, MultipartError};
use actix_web::web::BytesMut;
use futures_util::StreamExt;
use thiserror::Error;

/// Text fields longer than this are rejected with 400.
pub const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Invalid UTF-8 in form field '{0}'.")]
    Utf8(String),
    #[error("Form field '{0}' is too long.")]
    FieldTooLong(String),
    #[error("{0}")]
    Media(#[from] MediaError),
    #[error("{0}")]
    Invalid(String),
}

/// The submit form as posted by the browser.
#[derive(Debug, Clone)]
pub struct SubmissionForm {
    pub username: Option<String>,
    pub title: String,
    pub description: String,
    pub category: CategoryChoice,
    pub latitude: f64,
    pub longitude: f64,
    pub media: Option<MediaUpload>,
    pub interface_language: Option<String>,
}

#[derive(Default)]
struct RawFields {
    username: String,
    title: String,
    description: String,
    category: String,
    lat: String,
    lon: String,
    lang: String,
    media: Option<MediaUpload>,
}

/// Reads the multipart submission, enforcing the upload size limit while streaming.
pub async fn parse_submission(
    mut payload: Multipart,
    max_upload_bytes: u64,
) -> Result<SubmissionForm, FormError> {
    let mut raw = RawFields::default();

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let field_name = field.content_disposition().get_name().unwrap_or_default().to_string();

        if field_name == "media" {
            let filename = field
                .content_disposition()
                .get_filename()
                .unwrap_or_default()
                .to_string();
            if !filename.is_empty() {
                validate_filename(&filename)?;
            }
            let mut data = BytesMut::new();
            while let Some(chunk) = field.next().await {
                data.extend_from_slice(&chunk?);
                if data.len() as u64 > max_upload_bytes {
                    return Err(MediaError::TooLarge(max_upload_bytes / (1024 * 1024)).into());
                }
            }
            // Browsers send an empty, nameless part when no file was picked.
            if !filename.is_empty() && !data.is_empty() {
                raw.media = Some(MediaUpload {
                    filename,
                    bytes: data.to_vec(),
                });
            }
            continue;
        }

        let mut data = BytesMut::new();
        while let Some(chunk) = field.next().await {
            data.extend_from_slice(&chunk?);
            if data.len() > MAX_TEXT_FIELD_BYTES {
                return Err(FormError::FieldTooLong(field_name));
            }
        }
        let value = String::from_utf8(data.to_vec()).map_err(|_| FormError::Utf8(field_name.clone()))?;

        match field_name.as_str() {
            "username" => raw.username = value,
            "title" => raw.title = value,
            "description" => raw.description = value,
            "category" => raw.category = value,
            "lat" => raw.lat = value,
            "lon" => raw.lon = value,
            "lang" => raw.lang = value,
            _ => (),
        }
    }

    raw.into_form()
}

impl RawFields {
    fn into_form(self) -> Result<SubmissionForm, FormError> {
        let title = self.title.trim().to_string();
        let category = self
            .category
            .parse::<CategoryChoice>()
            .map_err(|e| FormError::Invalid(e.to_string()))?;
        let latitude = parse_coordinate(&self.lat, "Latitude", DEFAULT_LATITUDE, 90.0)?;
        let longitude = parse_coordinate(&self.lon, "Longitude", DEFAULT_LONGITUDE, 180.0)?;
        let username = Some(self.username.trim().to_string()).filter(|u| !u.is_empty());
        let interface_language = Some(self.lang.trim().to_string()).filter(|l| !l.is_empty());

        Ok(SubmissionForm {
            username,
            title,
            description: self.description,
            category,
            latitude,
            longitude,
            media: self.media,
            interface_language,
        })
    }
}

/// Blank input means the widget's default; anything else must be a finite number within `±bound`.
pub fn parse_coordinate(raw: &str, label: &str, default: f64, bound: f64) -> Result<f64, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| FormError::Invalid(format!("{} must be a number.", label)))?;
    if !value.is_finite() || value < -bound || value > bound {
        return Err(FormError::Invalid(format!(
            "{} must be between {} and {}.",
            label, -bound, bound
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use rstest::rstest;

    fn raw(lat: &str, lon: &str) -> RawFields {
        RawFields {
            title: "  River Spirit ".to_string(),
            description: "A tale of a spirit guarding the river".to_string(),
            category: "Auto-detect".to_string(),
            lat: lat.to_string(),
            lon: lon.to_string(),
            ..RawFields::default()
        }
    }

    #[rstest]
    #[case("90", 90.0)]
    #[case("-90", -90.0)]
    #[case("26.9124", 26.9124)]
    #[case("", 20.5937)]
    fn accepts_latitudes_in_bounds(#[case] input: &str, #[case] expected: f64) {
        assert_eq!(parse_coordinate(input, "Latitude", DEFAULT_LATITUDE, 90.0).unwrap(), expected);
    }

    #[rstest]
    #[case("90.000001")]
    #[case("-91")]
    #[case("north")]
    #[case("NaN")]
    #[case("inf")]
    fn rejects_latitudes_out_of_bounds(#[case] input: &str) {
        assert!(parse_coordinate(input, "Latitude", DEFAULT_LATITUDE, 90.0).is_err());
    }

    #[test]
    fn builds_form_with_defaults() {
        let form = raw("", "").into_form().unwrap();
        assert_eq!(form.title, "River Spirit");
        assert_eq!(form.username, None);
        assert_eq!(form.category, CategoryChoice::AutoDetect);
        assert_eq!((form.latitude, form.longitude), (20.5937, 78.9629));
    }

    #[test]
    fn keeps_explicit_category() {
        let mut fields = raw("1", "2");
        fields.category = "Song".to_string();
        assert_eq!(fields.into_form().unwrap().category, CategoryChoice::Fixed(Category::Song));
    }

    #[test]
    fn accepts_a_blank_title() {
        let mut fields = raw("1", "2");
        fields.title = "   ".to_string();
        assert_eq!(fields.into_form().unwrap().title, "");
    }

    #[test]
    fn rejects_longitude_beyond_180() {
        assert!(raw("0", "180.5").into_form().is_err());
    }
}
