//! Mail configuration
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `MAIL_` prefix)
//! 2. `./mail.toml`, or an explicit file passed to [`MailConfig::load_from`]
//! 3. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # mail.toml
//! email = "no-reply@acme.com"
//! from = "Acme"
//! host = "smtp.acme.com"
//! port = "587"
//! username = "mailer"
//! password = "secret"
//! ```
//!
//! Leaving `host` empty selects the echo transport, which logs messages
//! instead of delivering them.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{MailError, Result};

/// Port used when none is configured
pub const DEFAULT_PORT: &str = "25";

/// File read by [`MailConfig::load`] when present
pub const DEFAULT_CONFIG_FILE: &str = "mail.toml";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "MAIL_";

/// Dispatcher configuration
///
/// `host` decides the transport: empty means echo, anything else means an
/// SMTP relay at `host:port`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Sender address
    pub email: String,

    /// Sender display name
    pub from: String,

    /// SMTP relay host, empty for the echo transport
    pub host: String,

    /// SMTP relay port (default: 25)
    #[serde(deserialize_with = "lenient_string")]
    pub port: Option<String>,

    /// SMTP username
    pub username: Option<String>,

    /// SMTP password
    pub password: Option<String>,
}

impl MailConfig {
    /// Create a configuration for the given sender and relay host
    #[must_use]
    pub fn new(email: impl Into<String>, from: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            from: from.into(),
            host: host.into(),
            ..Self::default()
        }
    }

    /// Set the relay port
    #[must_use]
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Set relay credentials
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Load configuration from `./mail.toml` (if present) and `MAIL_*` variables
    pub fn load() -> Result<Self> {
        let local_config = Path::new(DEFAULT_CONFIG_FILE);
        let mut figment = Self::base_figment()?;
        if local_config.exists() {
            figment = figment.merge(Toml::file(local_config));
        }

        Self::extract(figment.merge(env_layer()))
    }

    /// Load configuration from a specific file, then apply `MAIL_*` variables
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MailError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let figment = Self::base_figment()?
            .merge(Toml::file(path))
            .merge(env_layer());

        Self::extract(figment)
    }

    fn base_figment() -> Result<Figment> {
        let defaults = toml::to_string(&Self::default())
            .map_err(|e| MailError::config(format!("failed to serialize defaults: {e}")))?;
        Ok(Figment::new().merge(Toml::string(&defaults)))
    }

    fn extract(figment: Figment) -> Result<Self> {
        figment
            .extract()
            .map_err(|e| MailError::config(format!("failed to load mail configuration: {e}")))
    }

    /// Check the fields a dispatcher cannot work without
    ///
    /// Only presence is checked; addresses are not validated here.
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(MailError::config("sender email is required"));
        }
        if self.from.trim().is_empty() {
            return Err(MailError::config("sender name (from) is required"));
        }
        Ok(())
    }

    /// Whether messages will be echoed instead of relayed
    #[must_use]
    pub fn is_echo(&self) -> bool {
        self.host.is_empty()
    }

    /// Configured port, or `"25"` when absent or empty
    #[must_use]
    pub fn effective_port(&self) -> &str {
        self.port
            .as_deref()
            .filter(|port| !port.is_empty())
            .unwrap_or(DEFAULT_PORT)
    }

    /// Username and password, only when both are non-empty
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|u| !u.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((username, password))
    }

    /// Sender identity in `"Name" <address>` form
    #[must_use]
    pub fn sender_identity(&self) -> String {
        format!("\"{}\" <{}>", self.from, self.email)
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("email", &self.email)
            .field("from", &self.from)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// `MAIL_*` variables as raw strings
///
/// `Env` would parse values first, turning `MAIL_PASSWORD=007` into `7` and
/// rejecting `MAIL_PASSWORD=true` for a string field.
fn env_layer() -> Serialized<BTreeMap<String, String>> {
    let values = Env::prefixed(ENV_PREFIX)
        .iter()
        .map(|(key, value)| (key.as_str().to_ascii_lowercase(), value))
        .collect();

    Serialized::defaults(values)
}

/// Accept strings or bare numbers, so `port = 587` works in TOML
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(Option::<Lenient>::deserialize(deserializer)?.map(|value| match value {
        Lenient::Text(text) => text,
        Lenient::Unsigned(n) => n.to_string(),
        Lenient::Signed(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use proptest::prelude::*;

    #[test]
    fn test_default_port() {
        let config = MailConfig::new("a@b.com", "B", "smtp.example.com");
        assert_eq!(config.effective_port(), "25");

        let config = config.with_port("");
        assert_eq!(config.effective_port(), "25");
    }

    #[test]
    fn test_explicit_port() {
        let config = MailConfig::new("a@b.com", "B", "smtp.example.com").with_port("587");
        assert_eq!(config.effective_port(), "587");
    }

    #[test]
    fn test_credentials_require_both_fields() {
        let config = MailConfig::new("a@b.com", "B", "smtp.example.com");
        assert_eq!(config.credentials(), None);

        let config = config.with_credentials("u", "p");
        assert_eq!(config.credentials(), Some(("u", "p")));

        let mut missing_password = config.clone();
        missing_password.password = Some(String::new());
        assert_eq!(missing_password.credentials(), None);

        let mut missing_username = config;
        missing_username.username = None;
        assert_eq!(missing_username.credentials(), None);
    }

    #[test]
    fn test_sender_identity() {
        let config = MailConfig::new("no-reply@acme.com", "Acme", "");
        assert_eq!(config.sender_identity(), "\"Acme\" <no-reply@acme.com>");
    }

    #[test]
    fn test_validate_requires_sender() {
        assert!(MailConfig::new("a@b.com", "B", "").validate().is_ok());
        assert!(matches!(
            MailConfig::new("", "B", "").validate(),
            Err(MailError::Configuration(_))
        ));
        assert!(matches!(
            MailConfig::new("a@b.com", " ", "").validate(),
            Err(MailError::Configuration(_))
        ));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = MailConfig::new("a@b.com", "B", "smtp.example.com")
            .with_credentials("u", "hunter2");
        let debug = format!("{config:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_load_from_file_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "mail.toml",
                r#"
                email = "no-reply@acme.com"
                from = "Acme"
                host = "smtp.acme.com"
                port = 2525
                "#,
            )?;
            jail.set_env("MAIL_USERNAME", "mailer");
            jail.set_env("MAIL_PASSWORD", "12345");

            let config = MailConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.host, "smtp.acme.com");
            assert_eq!(config.effective_port(), "2525");
            assert_eq!(config.credentials(), Some(("mailer", "12345")));
            Ok(())
        });
    }

    #[test]
    fn test_env_secrets_are_kept_verbatim() {
        Jail::expect_with(|jail| {
            jail.set_env("MAIL_EMAIL", "a@b.com");
            jail.set_env("MAIL_FROM", "B");
            jail.set_env("MAIL_HOST", "smtp.example.com");
            jail.set_env("MAIL_PORT", "0587");
            jail.set_env("MAIL_USERNAME", "true");
            jail.set_env("MAIL_PASSWORD", "007");

            let config = MailConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.effective_port(), "0587");
            assert_eq!(config.credentials(), Some(("true", "007")));
            Ok(())
        });
    }

    #[test]
    fn test_env_values_that_look_like_other_types() {
        Jail::expect_with(|jail| {
            jail.create_file("relay.toml", "email = \"a@b.com\"\nfrom = \"B\"\n")?;
            jail.set_env("MAIL_USERNAME", "1.5");
            jail.set_env("MAIL_PASSWORD", "[x]");

            let config = MailConfig::load_from("relay.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.username.as_deref(), Some("1.5"));
            assert_eq!(config.password.as_deref(), Some("[x]"));
            Ok(())
        });
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("MAIL_EMAIL", "dev@localhost");
            jail.set_env("MAIL_FROM", "Dev");

            let config = MailConfig::load().map_err(|e| e.to_string())?;
            assert!(config.is_echo());
            assert_eq!(config.effective_port(), DEFAULT_PORT);
            assert_eq!(config.email, "dev@localhost");
            Ok(())
        });
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = MailConfig::load_from("/nonexistent/mail.toml");
        assert!(matches!(result, Err(MailError::Configuration(_))));
    }

    proptest! {
        #[test]
        fn prop_non_empty_port_is_kept(port in "[0-9]{1,5}") {
            let config = MailConfig::new("a@b.com", "B", "relay").with_port(port.clone());
            prop_assert_eq!(config.effective_port(), port.as_str());
        }
    }
}
