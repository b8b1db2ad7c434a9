use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub web: WebConfig,
    pub database_path: String,
    pub upload_dir: String,
    pub max_upload_mb: u64,
    pub allowed_origins: String,
    pub log_level: String,
    pub classifier_url: Option<String>,
    pub classifier_api_token: Option<String>,
}

impl Config {
    /// Loads the optional `.env` file, then layers `config/default.toml` and
    /// the environment on top of built-in defaults.
    pub fn from_env(env_path: Option<&Path>) -> Result<Self, config::ConfigError> {
        match env_path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| {
                    config::ConfigError::Message(format!(
                        "Failed to load .env file from '{}'. Error: {}",
                        path.display(),
                        e
                    ))
                })?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "heritage_explorer.db".to_string());
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
        let allowed_origins = env::var("ALLOWED_ORIGINS").unwrap_or_default();
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let max_upload_mb = match env::var("MAX_UPLOAD_MB") {
            Ok(raw) => parse_upload_limit(&raw)?,
            Err(_) => 200,
        };

        let classifier_url = env::var("CLASSIFIER_URL")
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        if let Some(url) = &classifier_url {
            validate_classifier_url(url)?;
        }
        let classifier_api_token = env::var("CLASSIFIER_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let mut builder = config::Config::builder()
            .set_default("web.host", "127.0.0.1")?
            .set_default("web.port", 8080)?
            .add_source(
                config::File::new("config/default.toml", config::FileFormat::Toml).required(false),
            )
            .set_override("database_path", database_path)?
            .set_override("upload_dir", upload_dir)?
            .set_override("max_upload_mb", i64::try_from(max_upload_mb).unwrap_or(i64::MAX))?
            .set_override("allowed_origins", allowed_origins)?
            .set_override("log_level", log_level)?;

        if let Some(url) = classifier_url {
            builder = builder.set_override("classifier_url", url)?;
        }
        if let Some(token) = classifier_api_token {
            builder = builder.set_override("classifier_api_token", token)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn database_file(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
    }

    pub fn upload_path(&self) -> PathBuf {
        PathBuf::from(&self.upload_dir)
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

fn parse_upload_limit(raw: &str) -> Result<u64, config::ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(mb) if mb > 0 => Ok(mb),
        _ => Err(config::ConfigError::Message(format!(
            "'MAX_UPLOAD_MB' must be a positive whole number of megabytes, got '{}'.",
            raw
        ))),
    }
}

fn validate_classifier_url(raw: &str) -> Result<(), config::ConfigError> {
    let valid = match url::Url::parse(raw) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
                && parsed.host_str().map_or(false, |host| !host.is_empty())
        }
        Err(_) => false,
    };
    if valid {
        Ok(())
    } else {
        Err(config::ConfigError::Message(format!(
            "'CLASSIFIER_URL' must be an http(s) URL with a host, got '{}'.",
            raw
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn upload_limit_rejects_zero_and_garbage() {
        assert!(parse_upload_limit("0").is_err());
        assert!(parse_upload_limit("ten").is_err());
        assert_eq!(parse_upload_limit(" 25 ").ok(), Some(25));
    }

    #[rstest]
    #[case("https://api-inference.huggingface.co/models/x")]
    #[case("http://127.0.0.1:9000/classify")]
    fn accepts_http_classifier_urls(#[case] raw: &str) {
        assert!(validate_classifier_url(raw).is_ok());
    }

    #[rstest]
    #[case("ftp://example.org")]
    #[case("http://")]
    #[case("https:// bad host")]
    #[case("not a url")]
    fn rejects_classifier_urls_without_http_host(#[case] raw: &str) {
        assert!(validate_classifier_url(raw).is_err());
    }
}
