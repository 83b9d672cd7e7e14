use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::ai::chat::ChatError;
use crate::gemini::{DEFAULT_API_HOSTNAME, DEFAULT_MODEL, GeminiModel};

/// Value shipped in the sample secrets file. Treated as missing.
pub const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

const DEFAULT_SECRETS_PATH: &str = "./secrets.toml";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub gemini_api_hostname: String,
    pub gemini_model: String,
    pub request_timeout_secs: u64,
    pub web_ui_path: String,
}

impl AppConfig {
    /// Reads the config from the environment. The API key comes from
    /// `GEMINI_API_KEY` or `GOOGLE_API_KEY`, falling back to the
    /// secrets file at `GEMCHAT_SECRETS_PATH`.
    pub fn from_env() -> Result<Self, ChatError> {
        let secrets_path =
            env::var("GEMCHAT_SECRETS_PATH").unwrap_or_else(|_| DEFAULT_SECRETS_PATH.to_string());
        let env_api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("GOOGLE_API_KEY"))
            .ok();
        let gemini_api_key = resolve_api_key(env_api_key, Path::new(&secrets_path))?;

        let gemini_api_hostname = env::var("GEMCHAT_API_HOSTNAME")
            .unwrap_or_else(|_| DEFAULT_API_HOSTNAME.to_string());
        let gemini_model =
            env::var("GEMCHAT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let request_timeout_secs = match env::var("GEMCHAT_REQUEST_TIMEOUT_SECS") {
            Ok(secs) => parse_timeout_secs(&secs)?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };
        let web_ui_path = env::var("GEMCHAT_WEB_UI_PATH").unwrap_or_else(|_| "./web-ui".to_string());

        Ok(Self {
            gemini_api_key,
            gemini_api_hostname,
            gemini_model,
            request_timeout_secs,
            web_ui_path,
        })
    }

    /// Builds the configured Gemini model
    pub fn model(&self) -> Result<GeminiModel, ChatError> {
        GeminiModel::new(
            &self.gemini_api_hostname,
            &self.gemini_api_key,
            &self.gemini_model,
            Duration::from_secs(self.request_timeout_secs),
        )
    }
}

/// A zero timeout would fail every request, so it is refused
fn parse_timeout_secs(raw: &str) -> Result<u64, ChatError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ChatError::Configuration(format!(
            "GEMCHAT_REQUEST_TIMEOUT_SECS must be a positive whole number of seconds, got {}",
            raw
        ))),
    }
}

#[derive(Deserialize)]
struct Secrets {
    #[serde(rename = "GOOGLE_API_KEY")]
    google_api_key: Option<String>,
}

/// Picks the API key from the environment first, then the secrets
/// file. Missing and placeholder keys are configuration errors.
pub fn resolve_api_key(env_api_key: Option<String>, secrets_path: &Path) -> Result<String, ChatError> {
    let api_key = match env_api_key.filter(|k| !k.trim().is_empty()) {
        Some(key) => Some(key),
        None => read_secrets(secrets_path)?,
    };

    let Some(api_key) = api_key else {
        return Err(ChatError::Configuration(format!(
            "GOOGLE_API_KEY is not set. Export GEMINI_API_KEY or add it to {}",
            secrets_path.display()
        )));
    };

    let api_key = api_key.trim();
    if api_key.is_empty() || api_key == PLACEHOLDER_API_KEY {
        return Err(ChatError::Configuration(
            "Set a valid Google API key".to_string(),
        ));
    }

    Ok(api_key.to_string())
}

fn read_secrets(path: &Path) -> Result<Option<String>, ChatError> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path).map_err(|e| {
        ChatError::Configuration(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let secrets: Secrets = toml::from_str(&raw).map_err(|e| {
        ChatError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    Ok(secrets.google_api_key)
}
