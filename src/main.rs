use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware::{Logger, DefaultHeaders}};
use clap::Parser;
use heritage_explorer::{config::Config, configure_routes, AppState};
use std::path::PathBuf;
use tera::Tera;

#[derive(Parser, Debug)]
#[command(name = "heritage_server", author, version, about = "Starts the Heritage Explorer web server.")]
struct Cli {
    /// Path to a .env configuration file. Falls back to ./.env when present.
    #[arg(long, value_name = "FILE")]
    env_file: Option<PathBuf>,
}

fn build_cors(allowed_origins: &str) -> Cors {
    let cors = if allowed_origins.trim() == "*" {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };
    cors.allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![actix_web::http::header::ACCEPT, actix_web::http::header::CONTENT_TYPE])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env(cli.env_file.as_deref())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Failed to load configuration: {}", e)))?;

    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&config.log_level));

    let tera = Tera::new("templates/**/*.html")
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, format!("Template initialization failed: {}", e)))?;

    let state = AppState::from_config(&config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    log::info!("Database: '{}'", state.storage.path().display());
    log::info!("Upload directory: '{}'", state.media.root().display());
    log::info!("Category classifier: {}", state.classifier.name());

    let media_root = state.media.root().to_path_buf();
    let app_state = web::Data::new(state);
    let config_data = web::Data::new(config.clone());
    let tera_data = web::Data::new(tera);

    let server_address = format!("{}:{}", config.web.host, config.web.port);
    log::info!("Server starting at http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&config.allowed_origins))
            .wrap(Logger::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY"))
            )
            .app_data(config_data.clone())
            .app_data(tera_data.clone())
            .app_data(app_state.clone())
            .configure(|cfg| configure_routes(cfg, media_root.clone()))
    })
    .bind(server_address)?
    .run()
    .await
}
