use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub openai_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub call_timeout_secs: u64,
    pub ptt_base_url: String,
    pub ptt_board: String,
    pub user_agent: String,
    pub rate_limit_ms: u64,
    pub max_retries: u32,
    pub request_timeout_secs: u64,
    pub dictionary_path: Option<PathBuf>,
    pub known_brands: Vec<String>,
}

impl AppConfig {
    /// Whether the classifier services can be used at all.
    #[must_use]
    pub fn classifier_enabled(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("call_timeout_secs", &self.call_timeout_secs)
            .field("ptt_base_url", &self.ptt_base_url)
            .field("ptt_board", &self.ptt_board)
            .field("user_agent", &self.user_agent)
            .field("rate_limit_ms", &self.rate_limit_ms)
            .field("max_retries", &self.max_retries)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("dictionary_path", &self.dictionary_path)
            .field("known_brands", &self.known_brands)
            .finish()
    }
}
