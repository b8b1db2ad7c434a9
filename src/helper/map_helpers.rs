use crate::helper::media_helpers::public_media_url;
use crate::models::{Contribution, DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_ZOOM};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lon: f64,
    pub popup_html: String,
}

/// Everything the map template needs: initial view plus one marker per contribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

/// Builds the popup shown for a marker. User text is escaped; only our own tags survive.
pub fn popup_html(contribution: &Contribution) -> String {
    let mut html = format!(
        "<b>{}</b><br>{}<br><i>{} ({})</i>",
        encode_text(&contribution.title),
        encode_text(&contribution.description),
        encode_text(&contribution.category),
        encode_text(&contribution.language),
    );
    if let Some(media_url) = contribution.media_url.as_deref().filter(|m| !m.is_empty()) {
        html.push_str(&format!(
            "<br><a href=\"{}\" target=\"_blank\">Media</a>",
            encode_double_quoted_attribute(&public_media_url(media_url))
        ));
    }
    html
}

/// No clustering or paging: every row becomes a marker.
pub fn render_map(contributions: &[Contribution]) -> MapView {
    MapView {
        center: [DEFAULT_LATITUDE, DEFAULT_LONGITUDE],
        zoom: DEFAULT_ZOOM,
        markers: contributions
            .iter()
            .map(|c| MapMarker {
                lat: c.latitude,
                lon: c.longitude,
                popup_html: popup_html(c),
            })
            .collect(),
    }
}

/// Serializes the markers for embedding inside an inline `<script>` block.
pub fn markers_json(view: &MapView) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(&view.markers)?;
    Ok(json.replace("</", "<\\/"))
}
