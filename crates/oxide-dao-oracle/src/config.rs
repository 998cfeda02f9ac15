//! Connection configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Errors raised while loading an [`OracleConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration text is not valid JSON for this shape.
    #[error("invalid Oracle configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration parsed but is unusable.
    #[error("invalid Oracle configuration: {0}")]
    Invalid(String),
}

/// Where and how to connect to an Oracle server.
///
/// Field names also accept the `Server`, `User`, `Password` and
/// `Connect_Timeout` spellings used by older component configuration.
///
/// ```rust
/// use oxide_dao_oracle::OracleConfig;
///
/// let config = OracleConfig::from_json(
///     r#"{"Server": "gisdb", "User": "gis", "Password": "secret", "Connect_Timeout": 30}"#,
/// )
/// .unwrap();
/// assert_eq!(
///     config.clean_connection_string(),
///     "Data Source=gisdb;Connect Timeout=30;User ID=gis;"
/// );
/// assert!(!format!("{config:?}").contains("secret"));
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// TNS name or `host:port/service` data source.
    #[serde(alias = "Server")]
    pub server: Option<String>,
    /// Login user.
    #[serde(alias = "User")]
    pub user: Option<String>,
    /// Login password. Decrypting it is the host's job.
    #[serde(alias = "Password")]
    pub password: Option<String>,
    /// Connect timeout in seconds.
    #[serde(alias = "Connect_Timeout", alias = "connectTimeout")]
    pub connect_timeout: Option<u32>,
}

impl OracleConfig {
    /// Creates a configuration for `server` with the given credentials.
    #[must_use]
    pub fn new(server: &str, user: &str, password: &str) -> Self {
        Self {
            server: Some(server.to_string()),
            user: Some(user.to_string()),
            password: Some(password.to_string()),
            connect_timeout: None,
        }
    }

    /// Sets the connect timeout in seconds.
    #[must_use]
    pub const fn with_connect_timeout(mut self, seconds: u32) -> Self {
        self.connect_timeout = Some(seconds);
        self
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] if no server is named.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that a server is named.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the server is missing or blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if is_blank(self.server.as_deref()) {
            return Err(ConfigError::Invalid(String::from("no server configured")));
        }
        Ok(())
    }

    /// The full client connection string, password included.
    #[must_use]
    pub fn connection_string(&self) -> String {
        self.build_connection_string(self.password.as_deref())
    }

    /// The connection string without the password, safe to log.
    #[must_use]
    pub fn clean_connection_string(&self) -> String {
        self.build_connection_string(None)
    }

    fn build_connection_string(&self, password: Option<&str>) -> String {
        let mut s = String::new();
        if let Some(server) = non_blank(self.server.as_deref()) {
            s.push_str("Data Source=");
            s.push_str(server);
            s.push(';');
        }
        if let Some(timeout) = self.connect_timeout {
            s.push_str(&format!("Connect Timeout={timeout};"));
        }
        if let Some(user) = non_blank(self.user.as_deref()) {
            s.push_str("User ID=");
            s.push_str(user);
            s.push(';');
        }
        if let Some(password) = non_blank(password) {
            s.push_str("Password=");
            s.push_str(password);
        }
        s
    }
}

impl fmt::Debug for OracleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleConfig")
            .field("server", &self.server)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn is_blank(value: Option<&str>) -> bool {
    non_blank(value).is_none()
}
