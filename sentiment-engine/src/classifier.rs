use crate::cleaner::clean_text;
use pulse_core::{ClassifierError, ErrorExt, SentimentLabel, SentimentResult};

/// A three-class sentiment model returning one score per class.
pub trait SentimentModel {
    fn name(&self) -> &str;

    async fn scores(&self, text: &str) -> Result<Vec<SentimentResult>, ClassifierError>;
}

#[derive(Debug, Clone)]
pub enum DefaultReason {
    EmptyText,
    ModelFailed(ClassifierError),
}

/// Outcome of classifying one text.
///
/// `Defaulted` carries the neutral default but keeps why it was used, so a
/// genuinely neutral post can be told apart from a failed model call.
#[derive(Debug, Clone)]
pub enum Classification {
    Scored(SentimentResult),
    Defaulted(DefaultReason),
}

impl Classification {
    pub fn result(&self) -> SentimentResult {
        match self {
            Classification::Scored(result) => result.clone(),
            Classification::Defaulted(_) => SentimentResult::neutral_default(),
        }
    }

    pub fn label(&self) -> SentimentLabel {
        match self {
            Classification::Scored(result) => result.normalized(),
            Classification::Defaulted(_) => SentimentLabel::Neutral,
        }
    }

    pub fn is_model_failure(&self) -> bool {
        matches!(
            self,
            Classification::Defaulted(DefaultReason::ModelFailed(_))
        )
    }
}

pub struct Classifier<M> {
    model: M,
}

impl<M: SentimentModel> Classifier<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Cleans `text` and classifies it. Never fails: empty text and model
    /// errors both fall back to the neutral default.
    pub async fn classify(&self, text: &str) -> Classification {
        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            return Classification::Defaulted(DefaultReason::EmptyText);
        }

        let outcome = match self.model.scores(&cleaned).await {
            Ok(scores) => best_score(scores).ok_or_else(|| ClassifierError::EmptyScores {
                model: self.model.name().to_string(),
            }),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(best) => Classification::Scored(best),
            Err(e) => {
                e.log_warn();
                Classification::Defaulted(DefaultReason::ModelFailed(e))
            }
        }
    }
}

/// Highest-scoring class; the first one wins a tie.
fn best_score(scores: Vec<SentimentResult>) -> Option<SentimentResult> {
    scores
        .into_iter()
        .reduce(|best, candidate| {
            if candidate.score > best.score {
                candidate
            } else {
                best
            }
        })
}
