use crate::components::event_times::RepairMode;
use crate::components::sync::FailurePolicy;
use crate::error::{config_error, env_error, AppResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default first part of every index page URL; the page number is appended
pub const DEFAULT_INDEX_BASE_URL: &str = "http://chem.uic.edu/seminars";
/// Default prefix an href must start with to count as an event page
pub const DEFAULT_EVENTS_PREFIX: &str = "http://chem.uic.edu/events/";
/// Default text marking the end of the listing
pub const DEFAULT_TERMINATION_PHRASE: &str = "no future events";
/// Default provenance title attached to every imported event
pub const DEFAULT_PROVENANCE_TITLE: &str =
    "This event was automatically created from chem.uic.edu/seminars";
/// Default civil time zone of the published times
pub const DEFAULT_TIMEZONE: &str = "America/Chicago";
/// Default upper bound on index pages walked in one run
pub const DEFAULT_MAX_INDEX_PAGES: u32 = 200;
/// Default per-request timeout for page fetches
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
/// Default location of the stored OAuth token
pub const DEFAULT_TOKEN_PATH: &str = ".credentials/calendar-token.json";
pub const DEFAULT_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_OAUTH_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Optional override file, relative to the working directory
pub const CONFIG_FILE: &str = "config/seminar_sync.toml";

/// Runtime configuration, built once and handed to the sync driver
#[derive(Debug, Clone)]
pub struct Config {
    /// Index pages are fetched from `<index_base_url>/<n>`
    pub index_base_url: String,
    /// Links starting with this prefix are event pages
    pub events_prefix: String,
    /// A paragraph containing this text ends discovery
    pub termination_phrase: String,
    /// Upper bound on index pages; `None` walks until the termination phrase
    pub max_index_pages: Option<u32>,
    /// Civil zone the published times are interpreted in
    pub timezone: Tz,
    /// Google Calendar ID to import into
    pub calendar_id: String,
    /// Provenance title attached to every event
    pub provenance_title: String,
    /// How the repair pass treats an end time that is too late
    pub repair_mode: RepairMode,
    /// What happens when a single event fails
    pub failure_policy: FailurePolicy,
    /// Timeout for each page fetch
    pub fetch_timeout_secs: u64,
    /// Google OAuth client ID, used for token refresh
    pub google_client_id: String,
    /// Google OAuth client secret, used for token refresh
    pub google_client_secret: String,
    /// Where the OAuth token is stored
    pub token_path: PathBuf,
    pub calendar_api_base: String,
    pub oauth_token_url: String,
}

/// Values read from the optional TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileOverrides {
    pub index_base_url: Option<String>,
    pub events_prefix: Option<String>,
    pub termination_phrase: Option<String>,
    pub max_index_pages: Option<u32>,
    pub timezone: Option<String>,
    pub calendar_id: Option<String>,
    pub provenance_title: Option<String>,
    pub repair_mode: Option<String>,
    pub failure_policy: Option<String>,
    pub fetch_timeout_secs: Option<u64>,
    pub token_path: Option<PathBuf>,
    pub calendar_api_base: Option<String>,
    pub oauth_token_url: Option<String>,
}

impl FileOverrides {
    /// Parse overrides from TOML text
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl Config {
    /// Create a configuration with every optional setting at its default
    pub fn new(calendar_id: &str, google_client_id: &str, google_client_secret: &str) -> Self {
        Self {
            index_base_url: DEFAULT_INDEX_BASE_URL.to_string(),
            events_prefix: DEFAULT_EVENTS_PREFIX.to_string(),
            termination_phrase: DEFAULT_TERMINATION_PHRASE.to_string(),
            max_index_pages: Some(DEFAULT_MAX_INDEX_PAGES),
            timezone: chrono_tz::America::Chicago,
            calendar_id: calendar_id.to_string(),
            provenance_title: DEFAULT_PROVENANCE_TITLE.to_string(),
            repair_mode: RepairMode::default(),
            failure_policy: FailurePolicy::default(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            google_client_id: google_client_id.to_string(),
            google_client_secret: google_client_secret.to_string(),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            calendar_api_base: DEFAULT_CALENDAR_API_BASE.to_string(),
            oauth_token_url: DEFAULT_OAUTH_TOKEN_URL.to_string(),
        }
    }

    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let calendar_id =
            env::var("GOOGLE_CALENDAR_ID").map_err(|_| env_error("GOOGLE_CALENDAR_ID"))?;
        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;

        let mut config = Self::new(&calendar_id, &google_client_id, &google_client_secret);

        // The file sits between the defaults and the environment
        if Path::new(CONFIG_FILE).exists() {
            let content = fs::read_to_string(CONFIG_FILE)?;
            config.apply_overrides(FileOverrides::from_toml_str(&content)?)?;
        }

        config.apply_env()?;
        Ok(config)
    }

    /// Apply values from the override file on top of the current ones
    pub fn apply_overrides(&mut self, overrides: FileOverrides) -> AppResult<()> {
        if let Some(value) = overrides.index_base_url {
            self.index_base_url = value;
        }
        if let Some(value) = overrides.events_prefix {
            self.events_prefix = value;
        }
        if let Some(value) = overrides.termination_phrase {
            self.termination_phrase = value;
        }
        if let Some(value) = overrides.max_index_pages {
            self.max_index_pages = page_limit(value);
        }
        if let Some(value) = overrides.timezone {
            self.timezone = parse_timezone(&value)?;
        }
        if let Some(value) = overrides.calendar_id {
            self.calendar_id = value;
        }
        if let Some(value) = overrides.provenance_title {
            self.provenance_title = value;
        }
        if let Some(value) = overrides.repair_mode {
            self.repair_mode = value.parse()?;
        }
        if let Some(value) = overrides.failure_policy {
            self.failure_policy = value.parse()?;
        }
        if let Some(value) = overrides.fetch_timeout_secs {
            self.fetch_timeout_secs = value;
        }
        if let Some(value) = overrides.token_path {
            self.token_path = value;
        }
        if let Some(value) = overrides.calendar_api_base {
            self.calendar_api_base = value;
        }
        if let Some(value) = overrides.oauth_token_url {
            self.oauth_token_url = value;
        }
        Ok(())
    }

    /// Apply optional environment variables
    fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(value) = env::var("INDEX_BASE_URL") {
            self.index_base_url = value;
        }
        if let Ok(value) = env::var("EVENTS_PREFIX") {
            self.events_prefix = value;
        }
        if let Ok(value) = env::var("TERMINATION_PHRASE") {
            self.termination_phrase = value;
        }
        if let Ok(value) = env::var("MAX_INDEX_PAGES") {
            let pages = value
                .parse::<u32>()
                .map_err(|_| config_error("Invalid MAX_INDEX_PAGES format"))?;
            self.max_index_pages = page_limit(pages);
        }
        if let Ok(value) = env::var("TIMEZONE") {
            self.timezone = parse_timezone(&value)?;
        }
        if let Ok(value) = env::var("PROVENANCE_TITLE") {
            self.provenance_title = value;
        }
        if let Ok(value) = env::var("TIME_REPAIR_MODE") {
            self.repair_mode = value.parse()?;
        }
        if let Ok(value) = env::var("FAILURE_POLICY") {
            self.failure_policy = value.parse()?;
        }
        if let Ok(value) = env::var("FETCH_TIMEOUT_SECS") {
            self.fetch_timeout_secs = value
                .parse::<u64>()
                .map_err(|_| config_error("Invalid FETCH_TIMEOUT_SECS format"))?;
        }
        if let Ok(value) = env::var("TOKEN_PATH") {
            self.token_path = PathBuf::from(value);
        }
        if let Ok(value) = env::var("CALENDAR_API_BASE") {
            self.calendar_api_base = value;
        }
        if let Ok(value) = env::var("OAUTH_TOKEN_URL") {
            self.oauth_token_url = value;
        }
        Ok(())
    }
}

/// Zero means no page limit
fn page_limit(pages: u32) -> Option<u32> {
    (pages > 0).then_some(pages)
}

/// Parse an IANA zone name such as `America/Chicago`
pub fn parse_timezone(name: &str) -> AppResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| config_error(&format!("Unknown time zone: {}", name)))
}
