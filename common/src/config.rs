//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub remote_url: String,
    pub remote_api_key: String,
    pub remote_model: String,
    pub provider_timeout_secs: u64,
    pub provider_max_retries: u32,
    pub max_concurrent_jobs: usize,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// This method is used internally to populate the singleton. Every value
    /// has a default so a bare environment still produces a usable config;
    /// provider keys default to empty and fail at the provider call instead.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "ai-feedback".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "feedback=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "feedback.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".into()),
            remote_url: env::var("REMOTE_URL").unwrap_or_default(),
            remote_api_key: env::var("REMOTE_API_KEY").unwrap_or_default(),
            remote_model: env::var("REMOTE_MODEL").unwrap_or_else(|_| "gpt-oss:120b".into()),
            provider_timeout_secs: env::var("PROVIDER_TIMEOUT_SECS")
                .unwrap_or("60".into())
                .parse()
                .unwrap(),
            provider_max_retries: env::var("PROVIDER_MAX_RETRIES")
                .unwrap_or("2".into())
                .parse()
                .unwrap(),
            max_concurrent_jobs: env::var("MAX_CONCURRENT_JOBS")
                .unwrap_or("4".into())
                .parse()
                .unwrap(),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().unwrap();
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
    ///
    /// Used by public per-field setter methods.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    /// Override `env` value.
    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_project_name(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.project_name = value.into());
    }

    pub fn set_log_level(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_level = value.into());
    }

    pub fn set_log_file(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_file = value.into());
    }

    pub fn set_log_to_stdout(value: bool) {
        AppConfig::set_field(|cfg| cfg.log_to_stdout = value);
    }

    pub fn set_gemini_api_key(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.gemini_api_key = value.into());
    }

    pub fn set_gemini_model(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.gemini_model = value.into());
    }

    pub fn set_remote_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.remote_url = value.into());
    }

    pub fn set_remote_api_key(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.remote_api_key = value.into());
    }

    pub fn set_remote_model(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.remote_model = value.into());
    }

    pub fn set_provider_timeout_secs(value: u64) {
        AppConfig::set_field(|cfg| cfg.provider_timeout_secs = value);
    }

    pub fn set_provider_max_retries(value: u32) {
        AppConfig::set_field(|cfg| cfg.provider_max_retries = value);
    }

    pub fn set_max_concurrent_jobs(value: usize) {
        AppConfig::set_field(|cfg| cfg.max_concurrent_jobs = value);
    }
}

// --- Free accessor functions ---
//
// Convenience wrappers so callers can write `config::gemini_api_key()`
// instead of threading the guard around.

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn gemini_api_key() -> String {
    AppConfig::global().gemini_api_key.clone()
}

pub fn gemini_model() -> String {
    AppConfig::global().gemini_model.clone()
}

pub fn remote_url() -> String {
    AppConfig::global().remote_url.clone()
}

pub fn remote_api_key() -> String {
    AppConfig::global().remote_api_key.clone()
}

pub fn remote_model() -> String {
    AppConfig::global().remote_model.clone()
}

pub fn provider_timeout_secs() -> u64 {
    AppConfig::global().provider_timeout_secs
}

pub fn provider_max_retries() -> u32 {
    AppConfig::global().provider_max_retries
}

pub fn max_concurrent_jobs() -> usize {
    AppConfig::global().max_concurrent_jobs
}
