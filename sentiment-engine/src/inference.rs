use crate::classifier::SentimentModel;
use pulse_core::{
    ClassifierError, ConfigError, CoreError, InferenceConfig, SentimentResult, SENTIMENT_ENDPOINT,
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

/// Hosted text-classification APIs answer either with one score list per
/// input or, for a single input, with the bare list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batched(Vec<Vec<SentimentResult>>),
    Single(Vec<SentimentResult>),
    Error { error: String },
}

/// Sentiment model served over HTTP by a hosted inference endpoint.
#[derive(Debug)]
pub struct HostedInference {
    http_client: Client,
    model_url: Url,
    model: String,
    api_token: Option<String>,
}

impl HostedInference {
    pub fn new(config: &InferenceConfig) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Self::with_client(http_client, config)
    }

    pub fn with_client(http_client: Client, config: &InferenceConfig) -> Result<Self, CoreError> {
        let joined = format!(
            "{}/{}",
            config.endpoint.trim_end_matches('/'),
            config.model.trim_start_matches('/')
        );
        let model_url = Url::parse(&joined).map_err(|_| ConfigError::InvalidValue {
            field: SENTIMENT_ENDPOINT.to_string(),
            value: config.endpoint.clone(),
        })?;

        info!("Using sentiment model {} at {}", config.model, model_url);
        Ok(Self {
            http_client,
            model_url,
            model: config.model.clone(),
            api_token: config.api_token.clone(),
        })
    }

    pub fn model_url(&self) -> &Url {
        &self.model_url
    }

    fn request_failed(&self, reason: impl Into<String>) -> ClassifierError {
        ClassifierError::RequestFailed {
            model: self.model.clone(),
            reason: reason.into(),
        }
    }
}

impl SentimentModel for HostedInference {
    fn name(&self) -> &str {
        &self.model
    }

    async fn scores(&self, text: &str) -> Result<Vec<SentimentResult>, ClassifierError> {
        let body = InferenceRequest {
            inputs: text,
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.http_client.post(self.model_url.clone()).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.request_failed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            warn!("Sentiment model {} is not ready", self.model);
            return Err(ClassifierError::ModelLoading {
                model: self.model.clone(),
            });
        }

        let payload = response
            .text()
            .await
            .map_err(|e| self.request_failed(e.to_string()))?;

        if !status.is_success() {
            debug!("Inference returned {}: {}", status, payload);
            return Err(self.request_failed(format!("status {}", status)));
        }

        parse_scores(&self.model, &payload)
    }
}

pub(crate) fn parse_scores(model: &str, payload: &str) -> Result<Vec<SentimentResult>, ClassifierError> {
    let response: InferenceResponse =
        serde_json::from_str(payload).map_err(|e| ClassifierError::InvalidResponseFormat {
            model: model.to_string(),
            details: e.to_string(),
        })?;

    match response {
        InferenceResponse::Batched(batches) => Ok(batches.into_iter().next().unwrap_or_default()),
        InferenceResponse::Single(scores) => Ok(scores),
        InferenceResponse::Error { error } => Err(ClassifierError::RequestFailed {
            model: model.to_string(),
            reason: error,
        }),
    }
}
