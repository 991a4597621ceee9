/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for in-flight events, in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub geofence: GeofenceConfig,
}

/// Webhook and presence settings.
#[derive(Debug, Clone)]
pub struct GeofenceConfig {
    /// Basic auth username; empty together with `pass` disables auth.
    pub user: String,
    pub pass: String,
    /// Location name tracked by the `atHome` roster.
    pub at_home: String,
    /// Drop leave events without touching any state.
    pub ignore_leaving: bool,
    /// Start the HTTP listener. When off only the inbox is served.
    pub activate_server: bool,
    /// Require decoded `name`/`latitude`/`longitude` parameters instead of
    /// the substring check alone.
    pub strict_validation: bool,
    /// Read inbox messages as JSON lines from stdin.
    pub stdin_inbox: bool,
}

impl Default for GeofenceConfig {
    fn default() -> Self {
        Self {
            user: String::new(),
            pass: String::new(),
            at_home: "Home".into(),
            ignore_leaving: false,
            activate_server: true,
            strict_validation: false,
            stdin_inbox: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default   |
    /// |-----------------------------|-----------|
    /// | `HOST`                      | `0.0.0.0` |
    /// | `PORT`                      | `3000`    |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`      |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `30`      |
    /// | `GEOZONE_USER`              | empty     |
    /// | `GEOZONE_PASS`              | empty     |
    /// | `GEOZONE_AT_HOME`           | `Home`    |
    /// | `GEOZONE_IGNORE_LEAVING`    | `false`   |
    /// | `GEOZONE_ACTIVATE_SERVER`   | `true`    |
    /// | `GEOZONE_STRICT_VALIDATION` | `false`   |
    /// | `GEOZONE_STDIN_INBOX`       | `false`   |
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Panics on malformed numbers or flags so misconfiguration fails at
    /// startup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port: u16 = var("PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let defaults = GeofenceConfig::default();
        let flag = |key: &str, default: bool| -> bool {
            var(key)
                .map(|v| parse_flag(&v).unwrap_or_else(|| panic!("{key} must be a boolean")))
                .unwrap_or(default)
        };

        let geofence = GeofenceConfig {
            user: var("GEOZONE_USER").unwrap_or_default(),
            pass: var("GEOZONE_PASS").unwrap_or_default(),
            at_home: var("GEOZONE_AT_HOME").unwrap_or(defaults.at_home),
            ignore_leaving: flag("GEOZONE_IGNORE_LEAVING", defaults.ignore_leaving),
            activate_server: flag("GEOZONE_ACTIVATE_SERVER", defaults.activate_server),
            strict_validation: flag("GEOZONE_STRICT_VALIDATION", defaults.strict_validation),
            stdin_inbox: flag("GEOZONE_STDIN_INBOX", defaults.stdin_inbox),
        };

        Self {
            host,
            port,
            request_timeout_secs,
            shutdown_timeout_secs,
            geofence,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
