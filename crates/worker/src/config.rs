/// Worker configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Path of the local store database file.
    pub database_path: String,
    /// Base URL of the platform API (catalog, progress, download status).
    pub api_base_url: String,
    /// User the download-status mirror is reported under.
    pub user_id: String,
    /// Tours untouched for this many days are evicted.
    pub retention_days: u32,
    /// How often the retention cleanup runs, in seconds.
    pub cleanup_interval_secs: u64,
    /// How often the connectivity probe checks the API, in seconds.
    pub probe_interval_secs: u64,
    /// Per-request timeout for catalog, asset, and sink calls.
    pub request_timeout_secs: u64,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                      |
    /// |-------------------------|------------------------------|
    /// | `OFFLINE_DB_PATH`       | `tourcast-offline.db`        |
    /// | `API_BASE_URL`          | `http://localhost:3000/api`  |
    /// | `OFFLINE_USER_ID`       | `local`                      |
    /// | `RETENTION_DAYS`        | `30`                         |
    /// | `CLEANUP_INTERVAL_SECS` | `3600`                       |
    /// | `PROBE_INTERVAL_SECS`   | `30`                         |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                         |
    pub fn from_env() -> Self {
        let database_path =
            std::env::var("OFFLINE_DB_PATH").unwrap_or_else(|_| "tourcast-offline.db".into());

        let api_base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000/api".into());

        let user_id = std::env::var("OFFLINE_USER_ID").unwrap_or_else(|_| "local".into());

        let retention_days: u32 = std::env::var("RETENTION_DAYS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("RETENTION_DAYS must be a valid u32");

        let cleanup_interval_secs: u64 = std::env::var("CLEANUP_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("CLEANUP_INTERVAL_SECS must be a valid u64");

        let probe_interval_secs: u64 = std::env::var("PROBE_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("PROBE_INTERVAL_SECS must be a valid u64");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            database_path,
            api_base_url,
            user_id,
            retention_days,
            cleanup_interval_secs,
            probe_interval_secs,
            request_timeout_secs,
        }
    }
}
