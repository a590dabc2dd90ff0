//! Environment-driven configuration.

use std::time::Duration;

/// Server and hosted-model settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub default_question_count: usize,
    /// Fixed seed for reproducible quizzes; random when unset.
    pub quiz_seed: Option<u64>,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub generate_model: String,
    pub feedback_model: String,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            generate_model: "gpt-5-mini".to_string(),
            feedback_model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            default_question_count: 20,
            quiz_seed: None,
            llm: LlmConfig::default(),
        }
    }
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: std::str::FromStr>(name: &str) -> anyhow::Result<Option<T>> {
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", name, raw)),
        None => Ok(None),
    }
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// Env vars:
    /// - HOST, PORT: listen address (default 0.0.0.0:3000)
    /// - DEFAULT_QUESTION_COUNT: quiz length when a request omits it (default 20)
    /// - QUIZ_SEED: fixed RNG seed
    /// - OPENAI_API_KEY: enables the hosted-model routes
    /// - OPENAI_BASE_URL, GENERATE_MODEL, FEEDBACK_MODEL, LLM_TIMEOUT_SECS
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let llm_defaults = LlmConfig::default();

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: parsed("PORT")?.unwrap_or(defaults.port),
            default_question_count: parsed::<usize>("DEFAULT_QUESTION_COUNT")?
                .unwrap_or(defaults.default_question_count)
                .max(1),
            quiz_seed: parsed("QUIZ_SEED")?,
            llm: LlmConfig {
                api_key: var("OPENAI_API_KEY"),
                base_url: var("OPENAI_BASE_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or(llm_defaults.base_url),
                generate_model: var("GENERATE_MODEL").unwrap_or(llm_defaults.generate_model),
                feedback_model: var("FEEDBACK_MODEL").unwrap_or(llm_defaults.feedback_model),
                timeout: parsed("LLM_TIMEOUT_SECS")?
                    .map(Duration::from_secs)
                    .unwrap_or(llm_defaults.timeout),
            },
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
