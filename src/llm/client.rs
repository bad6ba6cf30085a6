use crate::config::{AssistantConfig, CredentialSource};
use crate::dispatch::AnalysisDispatcher;
use crate::error::{Result, StatementError};
use crate::llm::types::*;
use crate::schema::ConversationTurn;
use log::{debug, warn};
use reqwest::blocking::Client;
use std::time::Duration;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT_SECS: u64 = 120;
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Blocking Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    credential: CredentialSource,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(credential: CredentialSource, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            credential,
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        Self::new(config.credential.clone(), config.model.clone())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn generate_content(&self, payload: &GenerateContentRequest) -> Result<String> {
        // Resolved per call: a missing key only fails this request.
        let api_key = self.credential.resolve()?;
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        debug!(
            "Sending {} content item(s) to model {}",
            payload.contents.len(),
            self.model
        );
        let res = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(payload)
            .send()?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().unwrap_or_default();
            warn!("Gemini API returned status {}", status);
            return Err(StatementError::UpstreamAnalysis(format!(
                "Gemini API Error (status {}): {}",
                status, err_text
            )));
        }

        let body: GenerateContentResponse = res.json()?;
        body.first_text()
            .ok_or_else(|| StatementError::Unknown("Model returned no text content".to_string()))
    }
}

impl AnalysisDispatcher for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let payload = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: None,
        };
        self.generate_content(&payload)
    }

    fn converse(&self, system_instruction: &str, turns: &[ConversationTurn]) -> Result<String> {
        let payload = GenerateContentRequest {
            contents: turns.iter().map(Content::from).collect(),
            system_instruction: Some(Content::system(system_instruction)),
        };
        self.generate_content(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_fails_before_request() {
        let client = GeminiClient::new(
            CredentialSource::Env("STATEMENT_INSIGHT_TEST_UNSET_KEY".to_string()),
            "gemini-2.5-flash",
        )
        .unwrap()
        .with_base_url("http://127.0.0.1:9");

        let result = client.generate("hello");

        assert!(matches!(result, Err(StatementError::CredentialMissing(_))));
    }

    #[test]
    fn test_transport_error_hides_api_key() {
        let client = GeminiClient::new(
            CredentialSource::Static("SECRET-KEY-123".to_string()),
            "gemini-2.5-flash",
        )
        .unwrap()
        .with_base_url("http://127.0.0.1:9");

        let err = client.generate("hi").unwrap_err();

        assert!(matches!(err, StatementError::Unknown(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"));
        assert!(!format!("{:?}", err).contains("SECRET-KEY-123"));
    }
}
