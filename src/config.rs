use std::fmt;

use thiserror::Error;
use url::Url;

/// Value shipped in the sample `.env`; a bot started with it can never log in.
pub const TOKEN_PLACEHOLDER: &str = "YOUR_BOT_TOKEN_HERE";

pub const DEFAULT_WEBAPP_URL: &str = "http://localhost:3000";

/// Host used by the deployment template before the web app is actually deployed.
const PLACEHOLDER_HOST: &str = "your-app.vercel.app";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "BOT_TOKEN is not set. Create a .env file with BOT_TOKEN=<your token> \
         (get one from @BotFather)"
    )]
    MissingToken,
    #[error(
        "BOT_TOKEN is still the placeholder \"YOUR_BOT_TOKEN_HERE\". \
         Replace it with the token issued by @BotFather"
    )]
    PlaceholderToken,
    #[error("Invalid web app URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub webapp_url: Url,
    pub dev_mode: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("webapp_url", &self.webapp_url.as_str())
            .field("dev_mode", &self.dev_mode)
            .finish()
    }
}

impl Config {
    /// Load from the process environment (after `.env` has been applied).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary key lookup.
    ///
    /// `BOT_TOKEN` is required. `WEBAPP_URL` is the web app address unless
    /// `DEV_MODE=true`, in which case `NGROK_URL` is used instead. Both URLs
    /// default to `http://localhost:3000`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("BOT_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;
        if bot_token == TOKEN_PLACEHOLDER {
            return Err(ConfigError::PlaceholderToken);
        }

        let dev_mode = lookup("DEV_MODE")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let url_key = if dev_mode { "NGROK_URL" } else { "WEBAPP_URL" };
        let raw_url = lookup(url_key)
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_WEBAPP_URL.to_string());
        let webapp_url = Url::parse(&raw_url).map_err(|source| ConfigError::InvalidUrl {
            url: raw_url.clone(),
            source,
        })?;

        Ok(Self {
            bot_token,
            webapp_url,
            dev_mode,
        })
    }

    /// True while the web app URL still points at the deployment template host.
    pub fn has_placeholder_url(&self) -> bool {
        self.webapp_url.as_str().contains(PLACEHOLDER_HOST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_missing_token_is_rejected() {
        let err = load(&[("WEBAPP_URL", "https://example.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));
    }

    #[test]
    fn test_blank_token_is_rejected() {
        let err = load(&[("BOT_TOKEN", "   ")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));
    }

    #[test]
    fn test_placeholder_token_is_rejected() {
        let err = load(&[("BOT_TOKEN", TOKEN_PLACEHOLDER)]).unwrap_err();
        assert!(matches!(err, ConfigError::PlaceholderToken));
        assert!(err.to_string().contains("@BotFather"));
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("BOT_TOKEN", "123:abc")]).unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.webapp_url.as_str(), "http://localhost:3000/");
        assert!(!config.dev_mode);
    }

    #[test]
    fn test_webapp_url_used_outside_dev_mode() {
        let config = load(&[
            ("BOT_TOKEN", "123:abc"),
            ("WEBAPP_URL", "https://gifts.example.com/app"),
            ("NGROK_URL", "https://abcd.ngrok.io"),
        ])
        .unwrap();
        assert_eq!(config.webapp_url.as_str(), "https://gifts.example.com/app");
    }

    #[test]
    fn test_dev_mode_uses_override_url() {
        let config = load(&[
            ("BOT_TOKEN", "123:abc"),
            ("DEV_MODE", "True"),
            ("WEBAPP_URL", "https://gifts.example.com/app"),
            ("NGROK_URL", "https://abcd.ngrok.io"),
        ])
        .unwrap();
        assert!(config.dev_mode);
        assert_eq!(config.webapp_url.as_str(), "https://abcd.ngrok.io/");
    }

    #[test]
    fn test_dev_mode_without_override_falls_back_to_localhost() {
        let config = load(&[
            ("BOT_TOKEN", "123:abc"),
            ("DEV_MODE", "true"),
            ("WEBAPP_URL", "https://gifts.example.com/app"),
        ])
        .unwrap();
        assert_eq!(config.webapp_url.as_str(), "http://localhost:3000/");
    }

    #[test]
    fn test_non_true_dev_flag_is_off() {
        let config = load(&[("BOT_TOKEN", "123:abc"), ("DEV_MODE", "1")]).unwrap();
        assert!(!config.dev_mode);
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let err = load(&[("BOT_TOKEN", "123:abc"), ("WEBAPP_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_placeholder_url_detected() {
        let config = load(&[
            ("BOT_TOKEN", "123:abc"),
            ("WEBAPP_URL", "https://your-app.vercel.app"),
        ])
        .unwrap();
        assert!(config.has_placeholder_url());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = load(&[("BOT_TOKEN", "123:secret")]).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret"));
    }
}
