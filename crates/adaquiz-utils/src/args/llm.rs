use clap::Args;
use url::Url;

#[derive(Debug, Clone, Args)]
pub struct LlmArgs {
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true, help = "API key of the LLM provider")]
    pub api_key: Option<String>,

    #[arg(long, env = "LLM_PROVIDER", default_value = "groq", help = "Either groq or openai")]
    pub provider: String,

    #[arg(long, env = "LLM_API_BASE", help = "Custom OpenAI compatible endpoint, overrides the provider")]
    pub api_base: Option<Url>,

    #[arg(long, env = "LLM_MODEL")]
    pub model: Option<String>,

    #[arg(long, env = "LLM_TEMPERATURE")]
    pub temperature: Option<f32>,

    #[arg(long, env = "LLM_REQUEST_TIMEOUT_SECS", default_value_t = 120)]
    pub request_timeout_secs: u64,
}
