use std::borrow::Cow;
use std::str::FromStr;
use std::time::Duration;

use adaquiz_utils::args::llm::LlmArgs;
use async_openai::config::OpenAIConfig;
use url::Url;

use crate::llm_config::error::ConfigError;

pub mod error;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LlmProvider {
    #[default]
    Groq,
    OpenAI,
    Custom(Url),
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(LlmProvider::Groq),
            "openai" => Ok(LlmProvider::OpenAI),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

impl LlmProvider {
    #[must_use]
    pub fn get_base(&self) -> Cow<'_, str> {
        match self {
            LlmProvider::Groq => "https://api.groq.com/openai/v1".into(),
            LlmProvider::OpenAI => "https://api.openai.com/v1".into(),
            LlmProvider::Custom(url) => Cow::from(url.as_str().trim_end_matches('/')),
        }
    }

    #[must_use]
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Groq | LlmProvider::Custom(_) => "llama-3.1-70b-versatile",
            LlmProvider::OpenAI => "gpt-4.1-mini",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: String,
    model: Option<String>,
    temperature: Option<f32>,
    request_timeout: Duration,
}

impl TryFrom<LlmArgs> for LlmConfig {
    type Error = ConfigError;

    fn try_from(args: LlmArgs) -> Result<Self, Self::Error> {
        let api_key = args
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let provider = match args.api_base {
            Some(url) => LlmProvider::Custom(url),
            None => args.provider.parse()?,
        };

        Ok(Self {
            provider,
            api_key,
            model: args.model,
            temperature: args.temperature,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
        })
    }
}

impl LlmConfig {
    #[must_use]
    pub fn new(provider: LlmProvider, api_key: String) -> Self {
        Self {
            provider,
            api_key,
            model: None,
            temperature: None,
            request_timeout: Duration::from_secs(120),
        }
    }

    #[must_use]
    pub fn provider(&self) -> &LlmProvider {
        &self.provider
    }

    #[must_use]
    pub fn get_model(&self) -> &str {
        if let Some(model) = &self.model {
            model.as_str()
        } else {
            self.provider.default_model()
        }
    }

    #[must_use]
    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    #[must_use]
    pub fn get_openai_config(&self) -> OpenAIConfig {
        OpenAIConfig::default()
            .with_api_base(self.provider.get_base())
            .with_api_key(self.api_key.as_str())
    }
}
