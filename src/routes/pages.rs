use crate::config::Config;
use crate::helper::{form_helpers, map_helpers, submission_helpers};
use crate::models::{
    Category, Notification, AUTO_DETECT, DEFAULT_LATITUDE, DEFAULT_LONGITUDE,
};
use crate::AppState;
use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use tera::{Context, Tera};

/// Display-only interface languages; choosing one does not translate anything.
pub const INTERFACE_LANGUAGES: [&str; 4] = ["English", "Hindi", "Tamil", "Bengali"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Map,
    Submit,
}

impl Tab {
    fn from_query(raw: Option<&str>) -> Self {
        match raw {
            Some("submit") => Tab::Submit,
            _ => Tab::Map,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Tab::Map => "map",
            Tab::Submit => "submit",
        }
    }
}

#[derive(Deserialize)]
pub struct ShellQuery {
    tab: Option<String>,
    lang: Option<String>,
}

pub fn config_pages(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(show_shell))
        .route("/submit", web::post().to(handle_submit));
}

fn interface_language(raw: Option<&str>) -> &'static str {
    raw.and_then(|l| INTERFACE_LANGUAGES.iter().copied().find(|known| *known == l))
        .unwrap_or(INTERFACE_LANGUAGES[0])
}

async fn show_shell(
    query: web::Query<ShellQuery>,
    tera: web::Data<Tera>,
    state: web::Data<AppState>,
) -> impl Responder {
    let tab = Tab::from_query(query.tab.as_deref());
    let lang = interface_language(query.lang.as_deref());
    render_shell(&tera, &state, tab, lang, None)
}

async fn handle_submit(
    tera: web::Data<Tera>,
    state: web::Data<AppState>,
    config: web::Data<Config>,
    payload: Multipart,
) -> impl Responder {
    let form = match form_helpers::parse_submission(payload, config.max_upload_bytes()).await {
        Ok(form) => form,
        Err(e) => {
            log::warn!("Rejected submission: {}", e);
            return render_error(&tera, StatusCode::BAD_REQUEST, &e.to_string());
        }
    };
    let lang = interface_language(form.interface_language.as_deref());

    match submission_helpers::submit_contribution(&state, form).await {
        Ok(outcome) => {
            let notification = Notification {
                message: outcome.confirmation(),
                r#type: "success".to_string(),
            };
            render_shell(&tera, &state, Tab::Submit, lang, Some(notification))
        }
        Err(e) => {
            log::error!("Submission failed: {}", e);
            render_error(
                &tera,
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Your contribution could not be submitted: {}", e),
            )
        }
    }
}

fn render_shell(
    tera: &Tera,
    state: &AppState,
    tab: Tab,
    lang: &str,
    notification: Option<Notification>,
) -> HttpResponse {
    let contributions = match state.storage.list_all() {
        Ok(rows) => rows,
        Err(e) => {
            log::error!("Failed to load contributions for the map: {}", e);
            return render_error(tera, StatusCode::INTERNAL_SERVER_ERROR, "Error loading contributions.");
        }
    };
    let view = map_helpers::render_map(&contributions);
    let markers_json = match map_helpers::markers_json(&view) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Failed to serialize map markers: {}", e);
            return render_error(tera, StatusCode::INTERNAL_SERVER_ERROR, "Error rendering the map.");
        }
    };

    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();

    let mut ctx = Context::new();
    ctx.insert("active_tab", tab.as_str());
    ctx.insert("interface_languages", &INTERFACE_LANGUAGES);
    ctx.insert("selected_language", lang);
    ctx.insert("auto_detect", AUTO_DETECT);
    ctx.insert("categories", &categories);
    ctx.insert("default_lat", &format!("{:.6}", DEFAULT_LATITUDE));
    ctx.insert("default_lon", &format!("{:.6}", DEFAULT_LONGITUDE));
    ctx.insert("map_center", &view.center);
    ctx.insert("map_zoom", &view.zoom);
    ctx.insert("markers_json", &markers_json);
    ctx.insert("contribution_count", &view.markers.len());
    if let Some(notification) = notification {
        ctx.insert("notification", &notification);
    }

    match tera.render("index.html", &ctx) {
        Ok(rendered) => HttpResponse::Ok().content_type("text/html; charset=utf-8").body(rendered),
        Err(err) => {
            log::error!("Template rendering error: {}", err);
            HttpResponse::InternalServerError().body("Error rendering page.")
        }
    }
}

fn render_error(tera: &Tera, status: StatusCode, message: &str) -> HttpResponse {
    let mut ctx = Context::new();
    ctx.insert("message", message);
    ctx.insert("status", &status.as_u16());
    match tera.render("error.html", &ctx) {
        Ok(rendered) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(rendered),
        Err(err) => {
            log::error!("Template rendering error for error page: {}", err);
            HttpResponse::build(status).body(message.to_string())
        }
    }
}
