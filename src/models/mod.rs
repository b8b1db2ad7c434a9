use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The fixed label set, used both for manual selection and as classifier candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Story,
    Legend,
    Song,
    #[serde(rename = "Historical Fact")]
    HistoricalFact,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Story,
        Category::Legend,
        Category::Song,
        Category::HistoricalFact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Story => "Story",
            Category::Legend => "Legend",
            Category::Song => "Song",
            Category::HistoricalFact => "Historical Fact",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not one of the contribution categories")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

pub const AUTO_DETECT: &str = "Auto-detect";

/// What the submitter picked in the category dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryChoice {
    AutoDetect,
    Fixed(Category),
}

impl FromStr for CategoryChoice {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(AUTO_DETECT) {
            return Ok(CategoryChoice::AutoDetect);
        }
        trimmed.parse().map(CategoryChoice::Fixed)
    }
}

/// Sentinel stored when language detection fails.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Geographic center of India; the map's initial view and the form's default point.
pub const DEFAULT_LATITUDE: f64 = 20.5937;
pub const DEFAULT_LONGITUDE: f64 = 78.9629;
pub const DEFAULT_ZOOM: u8 = 5;

/// A row as stored in the `contributions` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub id: i64,
    pub username: Option<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub language: String,
    pub latitude: f64,
    pub longitude: f64,
    pub media_url: Option<String>,
    pub timestamp: String,
}

/// A fully populated contribution that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContribution {
    pub username: Option<String>,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub language: String,
    pub latitude: f64,
    pub longitude: f64,
    pub media_url: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Notification {
    pub message: String,
    pub r#type: String, // 'success' or 'error'
}

pub mod db_operations;
