use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};

use super::{
    FarmError,
    Language,
};
use crate::{
    persistence::{
        get_data_file_path,
        load_json_or_default,
        save_json_to,
    },
    speech::VoiceSettings,
};

pub const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_CHAT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the hosted database service, e.g. `https://xyz.supabase.co`.
    pub database_url: String,
    pub database_key: String,
    /// Deployed chat proxy endpoint the dashboard talks to.
    pub chat_endpoint: String,
    /// Upstream chat-completion API used by `serve`.
    pub chat_api_url: String,
    pub chat_api_key: String,
    pub chat_model: String,
    pub language: Language,
    pub voice: VoiceSettings,
    pub server_host: String,
    pub server_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            database_key: String::new(),
            chat_endpoint: String::new(),
            chat_api_url: DEFAULT_CHAT_API_URL.to_string(),
            chat_api_key: String::new(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            language: Language::English,
            voice: VoiceSettings::default(),
            server_host: "127.0.0.1".to_string(),
            server_port: 8787,
        }
    }
}

impl AppConfig {
    pub fn default_path() -> PathBuf {
        get_data_file_path(CONFIG_FILE)
    }

    /// Loads the config file (defaults when absent or unreadable) and applies
    /// `FARMGUARD_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        let mut config: AppConfig = load_json_or_default(&path);
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    pub fn save(&self, path: Option<&Path>) -> Result<(), FarmError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        save_json_to(self, &path)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("FARMGUARD_DATABASE_URL") {
            self.database_url = v;
        }
        if let Some(v) = non_empty("FARMGUARD_DATABASE_KEY") {
            self.database_key = v;
        }
        if let Some(v) = non_empty("FARMGUARD_CHAT_ENDPOINT") {
            self.chat_endpoint = v;
        }
        if let Some(v) = non_empty("FARMGUARD_CHAT_API_URL") {
            self.chat_api_url = v;
        }
        if let Some(v) = non_empty("FARMGUARD_CHAT_API_KEY").or_else(|| non_empty("OPENAI_API_KEY"))
        {
            self.chat_api_key = v;
        }
        if let Some(v) = non_empty("FARMGUARD_CHAT_MODEL") {
            self.chat_model = v;
        }
        if let Some(v) = non_empty("FARMGUARD_LANGUAGE") {
            match v.parse() {
                Ok(language) => self.language = language,
                Err(e) => tracing::warn!("Ignoring FARMGUARD_LANGUAGE: {}", e),
            }
        }
    }

    pub fn require_database(&self) -> Result<(), FarmError> {
        if self.database_url.is_empty() || self.database_key.is_empty() {
            return Err(FarmError::Config(
                "database_url and database_key must be set (FARMGUARD_DATABASE_URL / FARMGUARD_DATABASE_KEY)"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
