// src/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Forum site layout and URLs
    #[serde(default)]
    pub site: SiteConfig,

    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// SMTP digest delivery settings
    #[serde(default)]
    pub mail: MailConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.site.board_url.trim().is_empty() {
            return Err(AppError::validation("site.board_url is empty"));
        }
        if !self.site.board_url.starts_with("http") {
            return Err(AppError::validation("site.board_url must be an http(s) URL"));
        }
        if self.site.base_url.trim().is_empty() {
            return Err(AppError::validation("site.base_url is empty"));
        }
        if self.site.login_url.trim().is_empty() {
            return Err(AppError::validation("site.login_url is empty"));
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.mail.smtp_host.trim().is_empty() {
            return Err(AppError::validation("mail.smtp_host is empty"));
        }
        if self.mail.from_addr.trim().is_empty() {
            return Err(AppError::validation("mail.from_addr is empty"));
        }
        Ok(())
    }
}

/// Forum site layout: URLs and the markup conventions tied to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Root of the forum site, used to resolve relative links
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Board to scan for new threads
    #[serde(default = "defaults::board_url")]
    pub board_url: String,

    /// Login form endpoint
    #[serde(default = "defaults::login_url")]
    pub login_url: String,

    /// User profile URL template; `{user}` is replaced with the target name
    #[serde(default = "defaults::profile_url")]
    pub profile_url: String,

    /// Fixed suffix the site appends to thread page titles
    #[serde(default = "defaults::title_suffix")]
    pub title_suffix: String,
}

impl SiteConfig {
    /// Profile page URL for a given user name.
    pub fn profile_url_for(&self, user: &str) -> String {
        self.profile_url.replace("{user}", user)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            board_url: defaults::board_url(),
            login_url: defaults::login_url(),
            profile_url: defaults::profile_url(),
            title_suffix: defaults::title_suffix(),
        }
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// SMTP settings for digest delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// SMTP relay host
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    /// SMTP submission port (STARTTLS)
    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    /// Sender address, also the SMTP username
    #[serde(default = "defaults::from_addr")]
    pub from_addr: String,

    /// Subject line for the digest email
    #[serde(default = "defaults::subject")]
    pub subject: String,

    /// SMTP password; the SMTP_PASSWORD environment variable is the
    /// fallback when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: defaults::smtp_host(),
            smtp_port: defaults::smtp_port(),
            from_addr: defaults::from_addr(),
            subject: defaults::subject(),
            password: None,
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://gamefaqs.gamespot.com".to_string()
    }

    pub fn board_url() -> String {
        "https://gamefaqs.gamespot.com/boards/400-current-events".to_string()
    }

    pub fn login_url() -> String {
        "https://gamefaqs.gamespot.com/user/login".to_string()
    }

    pub fn profile_url() -> String {
        "https://gamefaqs.gamespot.com/users/{user}/boards".to_string()
    }

    pub fn title_suffix() -> String {
        " - Current Events Message Board - GameFAQs".to_string()
    }

    pub fn user_agent() -> String {
        format!("boardwatch/{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn timeout() -> u64 {
        30
    }

    pub fn request_delay() -> u64 {
        0
    }

    pub fn smtp_host() -> String {
        "smtp.gmail.com".to_string()
    }

    pub fn smtp_port() -> u16 {
        587
    }

    pub fn from_addr() -> String {
        "boardwatch@localhost".to_string()
    }

    pub fn subject() -> String {
        "Boardwatch digest".to_string()
    }
}
