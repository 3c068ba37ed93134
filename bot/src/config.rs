//! Bot configuration.

use eagle_core::UserId;

/// Whether group membership is required before the bot will serve a user.
///
/// This is an explicit option: an unset or zero group id disables the check
/// entirely, and no placeholder value is ever compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupCheck {
    /// No group is configured; every non-blacklisted user passes the gate.
    Disabled,

    /// Users must be members of the given group chat.
    Enabled {
        /// The group's chat id.
        chat_id: UserId,
        /// Public handle for the join prompt, if the group has one.
        handle: Option<String>,
    },
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    /// An environment variable could not be parsed.
    #[error("invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

/// Bot configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Chat platform bot credential.
    pub bot_token: String,

    /// Lookup Service endpoint URL.
    pub lookup_url: String,

    /// Lookup Service credential.
    pub lookup_token: String,

    /// The primary admin's user id.
    pub admin_user_id: UserId,

    /// Handle users are pointed at to buy credits (without the `@`).
    pub admin_contact: String,

    /// Group membership requirement.
    pub group: GroupCheck,

    /// Result language passed to the Lookup Service.
    pub lang: String,

    /// Per-query result limit passed to the Lookup Service.
    pub result_limit: u32,

    /// Credits granted to a brand-new account.
    pub initial_credits: i64,

    /// Successful referrals needed per credit reward.
    pub referrals_per_credit: u32,

    /// Path to the `RocksDB` data directory.
    pub data_dir: String,

    /// Lookup Service request timeout in seconds.
    pub lookup_timeout_seconds: u64,

    /// Gateway long-poll timeout in seconds.
    pub poll_timeout_seconds: u64,
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required credential is missing or a numeric
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = require("BOT_TOKEN")?;
        let lookup_token = require("API_TOKEN")?;

        let admin_user_id = parse_var("ADMIN_USER_ID")?.unwrap_or(0);

        let group = match parse_var::<i64>("GROUP_ID")?.unwrap_or(0) {
            0 => GroupCheck::Disabled,
            id => GroupCheck::Enabled {
                chat_id: UserId::new(id),
                handle: std::env::var("GROUP_USERNAME").ok().filter(|s| !s.is_empty()),
            },
        };

        Ok(Self {
            bot_token,
            lookup_url: std::env::var("LOOKUP_URL")
                .unwrap_or_else(|_| "https://leakosintapi.com/".into()),
            lookup_token,
            admin_user_id: UserId::new(admin_user_id),
            admin_contact: std::env::var("ADMIN_CONTACT").unwrap_or_default(),
            group,
            lang: std::env::var("RESULT_LANG").unwrap_or_else(|_| "en".into()),
            result_limit: parse_var("RESULT_LIMIT")?.unwrap_or(300),
            initial_credits: parse_var("INITIAL_FREE_CREDITS")?.unwrap_or(4),
            referrals_per_credit: parse_var("REFERRALS_FOR_CREDIT")?.unwrap_or(5),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "bot_data".into()),
            lookup_timeout_seconds: parse_var("LOOKUP_TIMEOUT_SECONDS")?.unwrap_or(30),
            poll_timeout_seconds: parse_var("POLL_TIMEOUT_SECONDS")?.unwrap_or(30),
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) if !raw.is_empty() => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name)),
        _ => Ok(None),
    }
}
