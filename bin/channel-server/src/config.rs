//! Server configuration, loaded from environment variables at startup.

use std::path::PathBuf;

/// Runtime configuration for channel-server.
///
/// Built once in `main` and shared read-only through [`crate::state::AppState`].
/// Every field has a default so the channel runs without any environment
/// variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:5001"`).
    pub bind_address: String,

    /// Display name reported by `/health` and sent to the hub.
    pub channel_name: String,

    /// Shared secret clients must send as `Authorization: authkey <secret>`.
    pub channel_authkey: String,

    /// Public URL the hub uses to reach this channel.
    pub channel_endpoint: String,

    /// Service type announced to the hub on registration.
    pub type_of_service: String,

    /// JSON file holding the message window.
    pub channel_file: PathBuf,

    /// Text of the synthetic first entry of every listing.
    pub welcome_text: String,

    /// Pool of ordinary bot replies, one per line.
    pub responses_file: PathBuf,

    /// Pool of replies to moderated messages, one per line.
    pub profanity_responses_file: PathBuf,

    /// Censor word list; `None` uses the list bundled with channel-core.
    pub censor_words_file: Option<PathBuf>,

    /// Comma-separated CORS allow-list; `None` allows any origin.
    pub cors_allowed_origins: Option<String>,

    /// Base URL of the hub.
    pub hub_url: String,

    /// Secret sent to the hub when registering.
    pub hub_authkey: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build [`Config`] from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());
        Self {
            bind_address: get("CHANNEL_BIND", "0.0.0.0:5001"),
            channel_name: get("CHANNEL_NAME", "Coxi Movies"),
            channel_authkey: get("CHANNEL_AUTHKEY", "0987654321"),
            channel_endpoint: get("CHANNEL_ENDPOINT", "http://localhost:5001"),
            type_of_service: get("CHANNEL_TYPE_OF_SERVICE", "aiweb24:chat"),
            channel_file: get("CHANNEL_FILE", "messages.json").into(),
            welcome_text: get(
                "CHANNEL_WELCOME",
                "Welcome to Coxi Movies! Tell us about your favorite coxi related movie.",
            ),
            responses_file: get("CHANNEL_RESPONSES_FILE", "resources/responses.txt").into(),
            profanity_responses_file: get(
                "CHANNEL_PROFANITY_RESPONSES_FILE",
                "resources/profanity_responses.txt",
            )
            .into(),
            censor_words_file: non_empty(lookup("CHANNEL_CENSOR_WORDS_FILE")).map(PathBuf::from),
            cors_allowed_origins: non_empty(lookup("CHANNEL_CORS_ORIGINS")),
            hub_url: get("HUB_URL", "http://localhost:5555"),
            hub_authkey: get("HUB_AUTHKEY", "1234567890"),
            log_level: get("CHANNEL_LOG", "info"),
            log_json: lookup("CHANNEL_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Exact `Authorization` header value accepted on protected routes.
    pub fn expected_authorization(&self) -> String {
        format!("authkey {}", self.channel_authkey)
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn config_with(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = config_with(&[]);
        assert_eq!(cfg.bind_address, "0.0.0.0:5001");
        assert_eq!(cfg.channel_name, "Coxi Movies");
        assert_eq!(cfg.channel_file, PathBuf::from("messages.json"));
        assert_eq!(cfg.expected_authorization(), "authkey 0987654321");
        assert!(cfg.censor_words_file.is_none());
        assert!(cfg.cors_allowed_origins.is_none());
        assert!(!cfg.log_json);
    }

    #[test]
    fn environment_overrides_defaults() {
        let cfg = config_with(&[
            ("CHANNEL_AUTHKEY", "s3cret"),
            ("CHANNEL_FILE", "/var/lib/channel/messages.json"),
            ("CHANNEL_CENSOR_WORDS_FILE", "words.txt"),
            ("CHANNEL_CORS_ORIGINS", "  "),
            ("CHANNEL_LOG_JSON", "TRUE"),
        ]);
        assert_eq!(cfg.expected_authorization(), "authkey s3cret");
        assert_eq!(cfg.channel_file, PathBuf::from("/var/lib/channel/messages.json"));
        assert_eq!(cfg.censor_words_file, Some(PathBuf::from("words.txt")));
        assert!(cfg.cors_allowed_origins.is_none());
        assert!(cfg.log_json);
    }
}
