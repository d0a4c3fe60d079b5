use std::time::Duration;

/// Console configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the task backend (default: `http://localhost:3000`).
    pub api_base_url: String,
    /// Application slug segment used in task endpoints (default: `transcription`).
    pub app_slug: String,
    /// Directory where per-task draft files are kept (default: `drafts`).
    pub draft_dir: String,
    /// Path of the persisted UI preferences file (default: `prefs.json`).
    pub prefs_path: String,
    /// Autosave settle delay in milliseconds (default: `500`).
    pub autosave_delay_ms: u64,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ConsoleConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// Reads a `.env` file first if one is present.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `API_BASE_URL`         | `http://localhost:3000`  |
    /// | `APP_SLUG`             | `transcription`          |
    /// | `DRAFT_DIR`            | `drafts`                 |
    /// | `PREFS_PATH`           | `prefs.json`             |
    /// | `AUTOSAVE_DELAY_MS`    | `500`                    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                     |
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".into());

        let app_slug = std::env::var("APP_SLUG").unwrap_or_else(|_| "transcription".into());

        let draft_dir = std::env::var("DRAFT_DIR").unwrap_or_else(|_| "drafts".into());

        let prefs_path = std::env::var("PREFS_PATH").unwrap_or_else(|_| "prefs.json".into());

        let autosave_delay_ms: u64 = std::env::var("AUTOSAVE_DELAY_MS")
            .unwrap_or_else(|_| "500".into())
            .parse()
            .expect("AUTOSAVE_DELAY_MS must be a valid u64");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            api_base_url,
            app_slug,
            draft_dir,
            prefs_path,
            autosave_delay_ms,
            request_timeout_secs,
        }
    }

    /// Autosave settle delay as a [`Duration`].
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    /// HTTP request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
