//! Configuration loading and management
//!
//! Configuration is read once at startup from an optional YAML file, then
//! selected values may be overridden from the environment:
//!
//! | Variable | Field |
//! |---|---|
//! | `SHELF_CONFIG` | path of the YAML file |
//! | `SHELF_BIND` | `server.bind` |
//! | `SHELF_JWT_SECRET` | `auth.secret` |
//! | `SHELF_TOKEN_TTL_HOURS` | `auth.token_ttl_hours` |

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::core::token::DEFAULT_TOKEN_TTL_HOURS;
use crate::core::{Book, Role};

pub const CONFIG_PATH_ENV: &str = "SHELF_CONFIG";
pub const BIND_ENV: &str = "SHELF_BIND";
pub const SECRET_ENV: &str = "SHELF_JWT_SECRET";
pub const TOKEN_TTL_ENV: &str = "SHELF_TOKEN_TTL_HOURS";

/// Upper bound on token lifetime (ten years)
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind (e.g. "0.0.0.0:8080")
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Token signing settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Symmetric HS256 secret
    #[serde(skip_serializing)]
    pub secret: String,

    /// Token lifetime in hours
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: "secret".to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"[REDACTED]")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish()
    }
}

/// A registered user
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl UserConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
        }
    }
}

impl fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Seed content for both partitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooksConfig {
    pub base: Vec<Book>,
    pub privileged: Vec<Book>,
}

impl Default for BooksConfig {
    fn default() -> Self {
        Self {
            base: vec![
                Book::new("Book 1", "Author 1", 2020),
                Book::new("Book 2", "Author 2", 2019),
            ],
            privileged: vec![
                Book::new("Book 3", "Author 3", 2018),
                Book::new("Book 4", "Author 4", 2017),
            ],
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub users: Vec<UserConfig>,
    pub books: BooksConfig,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl ShelfConfig {
    /// Built-in configuration: two users and four seed books
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            users: vec![
                UserConfig::new("admin", "admin123", Role::Admin),
                UserConfig::new("user", "user123", Role::Regular),
            ],
            books: BooksConfig::default(),
        }
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path))?;
        Self::from_yaml_str(&content).with_context(|| format!("invalid config file '{}'", path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load from `SHELF_CONFIG` (or defaults), apply env overrides, validate
    pub fn load() -> Result<Self> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default_config(),
        };
        let config = config.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(bind) = lookup(BIND_ENV) {
            self.server.bind = bind;
        }
        if let Some(secret) = lookup(SECRET_ENV) {
            self.auth.secret = secret;
        }
        if let Some(ttl) = lookup(TOKEN_TTL_ENV) {
            self.auth.token_ttl_hours = ttl
                .trim()
                .parse()
                .with_context(|| format!("{} must be an integer, got '{}'", TOKEN_TTL_ENV, ttl))?;
        }
        Ok(self)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.auth.secret.is_empty() {
            bail!("auth.secret must not be empty");
        }
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.auth.token_ttl_hours) {
            bail!(
                "auth.token_ttl_hours must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_HOURS,
                self.auth.token_ttl_hours
            );
        }

        let mut seen = HashSet::new();
        for user in &self.users {
            if user.username.is_empty() {
                bail!("users: username must not be empty");
            }
            if !seen.insert(user.username.as_str()) {
                bail!("users: duplicate username '{}'", user.username);
            }
        }

        for (partition, books) in [
            ("base", &self.books.base),
            ("privileged", &self.books.privileged),
        ] {
            for book in books {
                book.validate()
                    .with_context(|| format!("books.{}: invalid seed '{}'", partition, book.name))?;
            }
        }

        Ok(())
    }
}
