use std::env;

/// Default collection the telemetry sink appends to.
pub const DEFAULT_TELEMETRY_TABLE: &str = "nano_logs";

/// Connection settings for the telemetry store (a PostgREST/Supabase endpoint).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub base_url: String,
    pub api_key: String,
    pub table: String,
}

impl TelemetryConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: DEFAULT_TELEMETRY_TABLE.to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Read telemetry settings from the environment.
    ///
    /// Returns `None` unless both `SUPABASE_URL` and a key are set; the
    /// service key is preferred over the anon key.
    pub fn from_env() -> Option<Self> {
        let base_url = non_empty_var("SUPABASE_URL")?;
        let api_key = non_empty_var("SUPABASE_SERVICE_ROLE_KEY")
            .or_else(|| non_empty_var("SUPABASE_ANON_KEY"))?;
        let table =
            non_empty_var("TELEMETRY_TABLE").unwrap_or_else(|| DEFAULT_TELEMETRY_TABLE.to_string());

        Some(Self::new(base_url, api_key).with_table(table))
    }
}

/// Read an environment variable, treating blank values as unset.
pub(crate) fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
