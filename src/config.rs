use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_SECRET_KEY: &str = "a-very-secret-key";

#[derive(Debug)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    Invalid { name: &'static str, value: String },
    /// A variable parsed but is outside its allowed range.
    OutOfRange { name: &'static str, detail: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Invalid { name, value } => {
                write!(f, "{} has an invalid value: {:?}", name, value)
            }
            ConfigError::OutOfRange { name, detail } => write!(f, "{} {}", name, detail),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Seed account created by the bootstrap operation.
#[derive(Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AdminSeed")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct Config {
    /// `None` selects the in-memory user store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub secret_key: String,
    pub static_dir: PathBuf,
    pub bcrypt_cost: u32,
    pub session_ttl_hours: i64,
    pub session_cookie_secure: bool,
    pub admin: Option<AdminSeed>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            database_max_connections: 5,
            server_port: 8080,
            server_host: "127.0.0.1".to_string(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            static_dir: PathBuf::from("frontend/dist"),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            session_ttl_hours: 24,
            session_cookie_secure: false,
            admin: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("database_max_connections", &self.database_max_connections)
            .field("server_port", &self.server_port)
            .field("server_host", &self.server_host)
            .field("static_dir", &self.static_dir)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("session_ttl_hours", &self.session_ttl_hours)
            .field("session_cookie_secure", &self.session_cookie_secure)
            .field("admin", &self.admin)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let secret_key = match non_empty_var("SECRET_KEY") {
            Some(key) => key,
            None => {
                log::warn!("SECRET_KEY is not set; falling back to the built-in development key");
                defaults.secret_key
            }
        };

        let bcrypt_cost = parse_var("BCRYPT_COST")?.unwrap_or(defaults.bcrypt_cost);
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::OutOfRange {
                name: "BCRYPT_COST",
                detail: format!("must be between 4 and 31, got {}", bcrypt_cost),
            });
        }

        let session_ttl_hours =
            parse_var("SESSION_TTL_HOURS")?.unwrap_or(defaults.session_ttl_hours);
        if session_ttl_hours <= 0 {
            return Err(ConfigError::OutOfRange {
                name: "SESSION_TTL_HOURS",
                detail: format!("must be positive, got {}", session_ttl_hours),
            });
        }

        // PORT is what most hosting platforms inject.
        let server_port = match parse_var("SERVER_PORT")? {
            Some(port) => port,
            None => parse_var("PORT")?.unwrap_or(defaults.server_port),
        };

        let admin = match (non_empty_var("ADMIN_USERNAME"), non_empty_var("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminSeed { username, password }),
            (Some(_), None) | (None, Some(_)) => {
                log::warn!("ADMIN_USERNAME and ADMIN_PASSWORD must both be set; no seed admin");
                None
            }
            (None, None) => None,
        };

        Ok(Self {
            database_url: non_empty_var("DATABASE_URL").map(|url| normalize_database_url(&url)),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                .unwrap_or(defaults.database_max_connections),
            server_port,
            server_host: non_empty_var("SERVER_HOST").unwrap_or(defaults.server_host),
            secret_key,
            static_dir: non_empty_var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            bcrypt_cost,
            session_ttl_hours,
            session_cookie_secure: parse_bool_var("SESSION_COOKIE_SECURE")?
                .unwrap_or(defaults.session_cookie_secure),
            admin,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

/// Rewrites the legacy `postgres://` scheme some platforms hand out to `postgresql://`.
pub fn normalize_database_url(url: &str) -> String {
    match url.strip_prefix("postgres://") {
        Some(rest) => format!("postgresql://{}", rest),
        None => url.to_string(),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match non_empty_var(name) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(None),
    }
}

fn parse_bool_var(name: &'static str) -> Result<Option<bool>, ConfigError> {
    match non_empty_var(name) {
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::Invalid { name, value }),
        },
        None => Ok(None),
    }
}
