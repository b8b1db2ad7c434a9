#![allow(dead_code)]

use async_trait::async_trait;
use heritage_explorer::config::{Config, WebConfig};
use heritage_explorer::helper::classifier_helpers::{CategoryClassifier, ClassifierError, RankedLabel};
use heritage_explorer::helper::language_helpers::{DetectionError, LanguageDetector};
use heritage_explorer::helper::media_helpers::MediaStore;
use heritage_explorer::helper::storage_helpers::Storage;
use heritage_explorer::models::Category;
use heritage_explorer::AppState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

pub struct FixedDetector(pub &'static str);

impl LanguageDetector for FixedDetector {
    fn detect(&self, _text: &str) -> Result<String, DetectionError> {
        Ok(self.0.to_string())
    }
}

pub struct FailingDetector;

impl LanguageDetector for FailingDetector {
    fn detect(&self, _text: &str) -> Result<String, DetectionError> {
        Err(DetectionError::NoFeatures)
    }
}

/// Returns a fixed ranking and counts how often it was asked.
pub struct StubClassifier {
    pub ranking: Vec<Category>,
    pub calls: AtomicUsize,
}

impl StubClassifier {
    pub fn ranking(ranking: Vec<Category>) -> Arc<Self> {
        Arc::new(StubClassifier {
            ranking,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CategoryClassifier for StubClassifier {
    async fn classify(
        &self,
        _text: &str,
        _candidates: &[Category],
    ) -> Result<Vec<RankedLabel>, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let n = self.ranking.len() as f64;
        Ok(self
            .ranking
            .iter()
            .enumerate()
            .map(|(i, label)| RankedLabel {
                label: *label,
                score: (n - i as f64) / n,
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

pub struct UnreachableClassifier;

#[async_trait]
impl CategoryClassifier for UnreachableClassifier {
    async fn classify(
        &self,
        _text: &str,
        _candidates: &[Category],
    ) -> Result<Vec<RankedLabel>, ClassifierError> {
        Err(ClassifierError::Malformed("model is not loaded".to_string()))
    }

    fn name(&self) -> &'static str {
        "unreachable"
    }
}

pub struct Fixture {
    pub dir: TempDir,
    pub state: AppState,
}

impl Fixture {
    pub fn new(
        detector: Arc<dyn LanguageDetector>,
        classifier: Arc<dyn CategoryClassifier>,
    ) -> Self {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(&dir.path().join("heritage_explorer.db")).unwrap();
        storage.initialize().unwrap();
        let media = MediaStore::open(&dir.path().join("uploads")).unwrap();
        Fixture {
            state: AppState {
                storage,
                media,
                detector,
                classifier,
            },
            dir,
        }
    }

    pub fn config(&self) -> Config {
        Config {
            web: WebConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database_path: self.dir.path().join("heritage_explorer.db").display().to_string(),
            upload_dir: self.dir.path().join("uploads").display().to_string(),
            max_upload_mb: 1,
            allowed_origins: String::new(),
            log_level: "info".to_string(),
            classifier_url: None,
            classifier_api_token: None,
        }
    }
}
