// ABOUTME: Provider identifiers, endpoint URLs, and default values
// ABOUTME: Centralizes constants to eliminate hardcoded strings across modules

//! Gateway constants

/// Provider identifiers
pub mod providers {
    /// Hevy workout tracking provider identifier
    pub const HEVY: &str = "hevy";

    /// WHOOP recovery/sleep/strain provider identifier
    pub const WHOOP: &str = "whoop";

    /// Twilio SMS provider identifier
    pub const TWILIO: &str = "twilio";
}

/// Provider endpoint URLs
pub mod endpoints {
    /// Hevy REST API base URL
    pub const HEVY_API_BASE: &str = "https://api.hevyapp.com/v1";

    /// WHOOP OAuth authorization URL
    pub const WHOOP_AUTH_URL: &str = "https://api.prod.whoop.com/oauth/oauth2/auth";

    /// WHOOP OAuth token URL
    pub const WHOOP_TOKEN_URL: &str = "https://api.prod.whoop.com/oauth/oauth2/token";

    /// WHOOP developer API base URL
    pub const WHOOP_API_BASE: &str = "https://api.prod.whoop.com/developer/v2";

    /// Twilio REST API base URL
    pub const TWILIO_API_BASE: &str = "https://api.twilio.com";
}

/// OAuth scope defaults
pub mod oauth {
    /// WHOOP default scopes (space-separated as per WHOOP API requirements)
    pub const WHOOP_DEFAULT_SCOPES: &str =
        "read:recovery read:sleep read:workout read:cycles read:body_measurement";
}

/// Default values for timeouts, margins, and pagination
pub mod defaults {
    /// Default HTTP listen port
    pub const HTTP_PORT: u16 = 8001;

    /// Proactive refresh margin: a token within this window of expiry refreshes
    pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

    /// Token lifetime assumed when a token response omits `expires_in`
    pub const TOKEN_EXPIRES_IN_SECS: i64 = 3600;

    /// Trailing window applied when a WHOOP query supplies no dates
    pub const LOOKBACK_DAYS: i64 = 7;

    /// Hevy workout listing page size
    pub const HEVY_WORKOUTS_PAGE_SIZE: u32 = 10;

    /// Hevy routine listing page size
    pub const HEVY_ROUTINES_PAGE_SIZE: u32 = 50;

    /// Request timeout for credential validation probes, in seconds
    pub const PROBE_TIMEOUT_SECS: u64 = 5;
}

/// Environment variable names read by `ServerConfig::from_env`
pub mod env_config {
    /// HTTP listen port override
    pub const HTTP_PORT: &str = "HTTP_PORT";

    /// WHOOP OAuth client id
    pub const WHOOP_CLIENT_ID: &str = "WHOOP_CLIENT_ID";

    /// WHOOP OAuth client secret
    pub const WHOOP_CLIENT_SECRET: &str = "WHOOP_CLIENT_SECRET";

    /// WHOOP OAuth redirect URI
    pub const WHOOP_REDIRECT_URI: &str = "WHOOP_REDIRECT_URI";

    /// Hevy API key fallback
    pub const HEVY_API_KEY: &str = "HEVY_API_KEY";

    /// Twilio account SID
    pub const TWILIO_ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";

    /// Twilio auth token
    pub const TWILIO_AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";

    /// Twilio sender phone number
    pub const TWILIO_PHONE_NUMBER: &str = "TWILIO_PHONE_NUMBER";
}

/// Names of the files persisted under the gateway's dot directory
pub mod storage {
    /// Directory under the user's home for all persisted state
    pub const BASE_DIR: &str = ".pulse-gateway";

    /// Hevy API key document
    pub const HEVY_KEY_FILE: &str = "hevy_api_key.json";

    /// WHOOP OAuth token document
    pub const WHOOP_TOKEN_FILE: &str = "whoop_token.json";

    /// WHOOP OAuth state nonce
    pub const WHOOP_STATE_FILE: &str = "whoop_oauth_state.txt";

    /// Twilio SMS configuration document
    pub const SMS_CONFIG_FILE: &str = "sms_config.json";
}
