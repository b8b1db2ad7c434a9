use crate::models::Category;
use crate::AppState;
use actix_web::{web, HttpResponse, Responder};

pub fn config_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/is_server_active", web::get().to(is_server_active))
            .route("/contributions", web::get().to(get_all_contributions))
            .route("/categories", web::get().to(get_categories)),
    );
}

async fn is_server_active() -> impl Responder {
    HttpResponse::Ok().body("active")
}

async fn get_all_contributions(state: web::Data<AppState>) -> impl Responder {
    match state.storage.list_all() {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => {
            log::error!("Failed to fetch contributions: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

async fn get_categories() -> impl Responder {
    HttpResponse::Ok().json(Category::ALL)
}
