use crate::error::{Result, StatementError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "GEMINI_MODEL";

/// Labels used to locate the anchor and liquidity rows. Matching is a
/// case-insensitive substring test, so these are keywords rather than exact
/// row names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RowLabels {
    #[schemars(description = "Keyword of the total assets row (composition denominator)")]
    pub total_assets: String,
    #[schemars(description = "Keyword of the current assets row (ratio numerator)")]
    pub current_assets: String,
    #[schemars(description = "Keyword of the current liabilities row (ratio denominator)")]
    pub current_liabilities: String,
}

impl Default for RowLabels {
    fn default() -> Self {
        Self {
            total_assets: "TOTAL ASSETS".to_string(),
            current_assets: "CURRENT ASSETS".to_string(),
            current_liabilities: "CURRENT LIABILITIES".to_string(),
        }
    }
}

impl RowLabels {
    /// Labels of the Vietnamese balance sheet layout (VAS form B01-DN).
    pub fn vietnamese() -> Self {
        Self {
            total_assets: "TỔNG CỘNG TÀI SẢN".to_string(),
            current_assets: "TÀI SẢN NGẮN HẠN".to_string(),
            current_liabilities: "NỢ NGẮN HẠN".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Vietnamese,
}

/// Where the API key comes from. Resolved on every call, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "source", content = "value")]
pub enum CredentialSource {
    Static(String),
    Env(String),
}

impl Default for CredentialSource {
    fn default() -> Self {
        CredentialSource::Env(API_KEY_VAR.to_string())
    }
}

impl CredentialSource {
    pub fn resolve(&self) -> Result<String> {
        let key = match self {
            CredentialSource::Static(key) => Some(key.clone()),
            CredentialSource::Env(var) => std::env::var(var).ok(),
        };

        match key {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(StatementError::CredentialMissing(self.describe())),
        }
    }

    fn describe(&self) -> String {
        match self {
            CredentialSource::Static(_) => "static key is empty".to_string(),
            CredentialSource::Env(var) => format!("set the '{}' environment variable", var),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AssistantConfig {
    pub model: String,
    pub labels: RowLabels,
    pub language: Language,
    pub credential: CredentialSource,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            labels: RowLabels::default(),
            language: Language::default(),
            credential: CredentialSource::default(),
        }
    }
}

impl AssistantConfig {
    /// Defaults with the model taken from `GEMINI_MODEL` when set. The key is
    /// still read lazily from `GEMINI_API_KEY`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(model) = std::env::var(MODEL_VAR) {
            if !model.trim().is_empty() {
                config.model = model.trim().to_string();
            }
        }
        config
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Vietnamese statement labels with Vietnamese output.
    pub fn vietnamese() -> Self {
        Self {
            labels: RowLabels::vietnamese(),
            language: Language::Vietnamese,
            ..Self::default()
        }
    }
}
