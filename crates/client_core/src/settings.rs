//! Client settings: defaults, then `exam_client.toml`, then environment.
//! Command-line flags are applied on top by each binary.

use std::{fs, path::Path, sync::Arc, time::Duration};

use serde::Deserialize;
use shared::domain::UserId;
use tracing::{info, warn};

use crate::{
    exam::DEFAULT_QUANTITY, http::DEFAULT_API_URL, ClientResult, ExamService, HttpExamService,
    MockExamService,
};

pub const DEFAULT_SETTINGS_FILE: &str = "exam_client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_url: String,
    pub user_id: UserId,
    pub poll_interval_ms: u64,
    pub request_timeout_secs: u64,
    pub use_mock_data: bool,
    pub default_quantity: u32,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            user_id: UserId(1),
            poll_interval_ms: 2_000,
            request_timeout_secs: 30,
            use_mock_data: false,
            default_quantity: DEFAULT_QUANTITY,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    user_id: Option<i64>,
    poll_interval_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
    use_mock_data: Option<bool>,
    default_quantity: Option<u32>,
}

impl ClientSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    fn apply_file(&mut self, raw: &str) -> Result<(), toml::de::Error> {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.api_url {
            self.api_url = v;
        }
        if let Some(v) = file_cfg.user_id {
            self.user_id = UserId(v);
        }
        if let Some(v) = file_cfg.poll_interval_ms {
            self.poll_interval_ms = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file_cfg.use_mock_data {
            self.use_mock_data = v;
        }
        if let Some(v) = file_cfg.default_quantity {
            self.default_quantity = v;
        }
        Ok(())
    }

    /// Applies environment overrides read through `lookup`. `APP__*` names
    /// win over the short aliases.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("EXAM_API_URL") {
            self.api_url = v;
        }
        if let Some(v) = lookup("APP__API_URL") {
            self.api_url = v;
        }

        if let Some(v) = lookup("APP__USER_ID") {
            match v.trim().parse::<i64>() {
                Ok(parsed) => self.user_id = UserId(parsed),
                Err(err) => warn!("ignoring APP__USER_ID={v}: {err}"),
            }
        }
        if let Some(v) = lookup("APP__POLL_INTERVAL_MS") {
            match v.trim().parse::<u64>() {
                Ok(parsed) => self.poll_interval_ms = parsed,
                Err(err) => warn!("ignoring APP__POLL_INTERVAL_MS={v}: {err}"),
            }
        }
        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            match v.trim().parse::<u64>() {
                Ok(parsed) => self.request_timeout_secs = parsed,
                Err(err) => warn!("ignoring APP__REQUEST_TIMEOUT_SECS={v}: {err}"),
            }
        }
        if let Some(v) = lookup("APP__USE_MOCK_DATA") {
            match parse_flag(&v) {
                Some(flag) => self.use_mock_data = flag,
                None => warn!("ignoring APP__USE_MOCK_DATA={v}: expected true/false"),
            }
        }
        if let Some(v) = lookup("APP__DEFAULT_QUANTITY") {
            match v.trim().parse::<u32>() {
                Ok(parsed) => self.default_quantity = parsed,
                Err(err) => warn!("ignoring APP__DEFAULT_QUANTITY={v}: {err}"),
            }
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Loads settings from `path` (or [`DEFAULT_SETTINGS_FILE`]) and the process
/// environment. A missing file is fine; a malformed one is logged and skipped.
pub fn load_settings(path: Option<&Path>) -> ClientSettings {
    let mut settings = ClientSettings::default();
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));

    if let Ok(raw) = fs::read_to_string(path) {
        if let Err(err) = settings.apply_file(&raw) {
            warn!("ignoring malformed settings file '{}': {err}", path.display());
        }
    }
    settings.apply_env(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()));
    settings
}

/// Builds the exam service the settings ask for.
pub fn build_service(settings: &ClientSettings) -> ClientResult<Arc<dyn ExamService>> {
    if settings.use_mock_data {
        info!("using in-memory mock exam service");
        return Ok(Arc::new(
            MockExamService::new()
                .with_latency(Duration::from_millis(500))
                .with_polls_until_complete(2),
        ));
    }
    let service = HttpExamService::with_timeout(&settings.api_url, settings.request_timeout())?;
    info!(api_url = %service.base_url(), "using exam service");
    Ok(Arc::new(service))
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
