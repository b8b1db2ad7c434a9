use crate::models::Category;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Classifier request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Classifier response was malformed: {0}")]
    Malformed(String),
    #[error("Classifier returned label '{0}' outside the candidate set")]
    UnexpectedLabel(String),
    #[error("Classifier returned no labels")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedLabel {
    pub label: Category,
    pub score: f64,
}

#[async_trait]
pub trait CategoryClassifier: Send + Sync {
    /// Ranks `candidates` by how well they describe `text`, best first.
    async fn classify(
        &self,
        text: &str,
        candidates: &[Category],
    ) -> Result<Vec<RankedLabel>, ClassifierError>;

    fn name(&self) -> &'static str;
}

/// Highest-ranked label, accepted regardless of its score.
pub async fn top_label(
    classifier: &dyn CategoryClassifier,
    text: &str,
) -> Result<Category, ClassifierError> {
    let ranked = classifier.classify(text, &Category::ALL).await?;
    ranked
        .first()
        .map(|r| r.label)
        .ok_or(ClassifierError::Empty)
}

// --- Remote zero-shot inference ---

#[derive(Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: Vec<&'a str>,
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Inference servers answer either in the pipeline shape or as a list of pairs.
#[derive(Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Pipeline { labels: Vec<String>, scores: Vec<f64> },
    Pairs(Vec<LabelScore>),
}

impl ZeroShotResponse {
    fn into_pairs(self) -> Result<Vec<(String, f64)>, ClassifierError> {
        match self {
            ZeroShotResponse::Pipeline { labels, scores } => {
                if labels.len() != scores.len() {
                    return Err(ClassifierError::Malformed(format!(
                        "{} labels but {} scores",
                        labels.len(),
                        scores.len()
                    )));
                }
                Ok(labels.into_iter().zip(scores).collect())
            }
            ZeroShotResponse::Pairs(pairs) => {
                Ok(pairs.into_iter().map(|p| (p.label, p.score)).collect())
            }
        }
    }
}

/// Zero-shot classification through a hosted NLI model
/// (Hugging Face inference API request/response shape).
pub struct RemoteZeroShotClassifier {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
}

impl RemoteZeroShotClassifier {
    pub fn new(endpoint: impl Into<String>, api_token: Option<String>) -> Self {
        RemoteZeroShotClassifier {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_token,
        }
    }
}

#[async_trait]
impl CategoryClassifier for RemoteZeroShotClassifier {
    async fn classify(
        &self,
        text: &str,
        candidates: &[Category],
    ) -> Result<Vec<RankedLabel>, ClassifierError> {
        let body = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters {
                candidate_labels: candidates.iter().map(|c| c.as_str()).collect(),
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        let response: ZeroShotResponse = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut ranked = Vec::new();
        for (label, score) in response.into_pairs()? {
            let category = label
                .parse::<Category>()
                .ok()
                .filter(|c| candidates.contains(c))
                .ok_or_else(|| ClassifierError::UnexpectedLabel(label.clone()))?;
            ranked.push(RankedLabel { label: category, score });
        }
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(ranked)
    }

    fn name(&self) -> &'static str {
        "remote-zero-shot"
    }
}

// --- Offline fallback ---

/// Scores each label by how many of its cue words appear in the text.
/// Ties keep the candidate order, so an uninformative text ranks the first candidate on top.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

fn cue_words(category: Category) -> &'static [&'static str] {
    match category {
        Category::Story => &[
            "story", "stories", "tale", "tales", "told", "tell", "once", "upon", "grandmother",
            "grandfather", "village", "journey", "family", "childhood", "memory", "remember",
        ],
        Category::Legend => &[
            "legend", "legends", "myth", "myths", "spirit", "spirits", "god", "gods", "goddess",
            "demon", "ghost", "curse", "sacred", "miracle", "deity", "divine", "guarding",
            "guardian", "haunted", "magic",
        ],
        Category::Song => &[
            "song", "songs", "sing", "sung", "singing", "music", "melody", "lyrics", "verse",
            "chorus", "folk", "lullaby", "rhythm", "dance", "bhajan", "ballad", "tune",
        ],
        Category::HistoricalFact => &[
            "history", "historical", "fact", "built", "century", "year", "king", "queen",
            "empire", "dynasty", "battle", "fort", "war", "ruled", "founded", "independence",
            "british", "mughal", "archaeological", "monument", "temple",
        ],
    }
}

#[async_trait]
impl CategoryClassifier for KeywordClassifier {
    async fn classify(
        &self,
        text: &str,
        candidates: &[Category],
    ) -> Result<Vec<RankedLabel>, ClassifierError> {
        if candidates.is_empty() {
            return Err(ClassifierError::Empty);
        }

        let lowered = text.to_lowercase();
        let words: HashSet<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let hits: Vec<usize> = candidates
            .iter()
            .map(|c| cue_words(*c).iter().filter(|cue| words.contains(*cue)).count())
            .collect();
        // Add-one smoothing keeps every label with a non-zero share.
        let total: usize = hits.iter().map(|h| h + 1).sum();

        let mut ranked: Vec<RankedLabel> = candidates
            .iter()
            .zip(&hits)
            .map(|(c, h)| RankedLabel {
                label: *c,
                score: (h + 1) as f64 / total as f64,
            })
            .collect();
        // Stable sort keeps candidate order among equal scores.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(ranked)
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}
