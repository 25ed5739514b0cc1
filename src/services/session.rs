// src/services/session.rs

//! Authenticated forum session.
//!
//! Login is a single credential exchange: fetch the login form, lift its
//! hidden anti-CSRF key, and post the form back. The resulting cookies ride
//! along on every subsequent fetch. Authentication failure is fatal; fetch
//! failures are not retried and propagate to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::parse_selector;

/// Marker the site renders on a rejected login.
const LOGIN_ERROR_MARKER: &str = "There was an error while logging you in";

/// Authenticated page retrieval.
///
/// `Session` is the real implementation; tests use a map-backed fake so the
/// listing and extraction stages can run against synthetic fixtures.
#[async_trait(?Send)]
pub trait Fetch {
    async fn fetch(&self, url: &str) -> Result<Html>;
}

/// An authenticated HTTP session against the forum.
pub struct Session {
    client: Client,
    request_delay: Duration,
}

impl Session {
    /// Log in and return a session whose cookie store carries the
    /// authenticated context.
    pub async fn login(config: &Config, username: &str, password: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.crawler.user_agent)
            .timeout(Duration::from_secs(config.crawler.timeout_secs))
            .cookie_store(true)
            .build()?;

        let login_url = &config.site.login_url;

        // The login form embeds a one-shot hidden key that must be echoed back.
        let form_html = client.get(login_url).send().await?.text().await?;
        let key = {
            let doc = Html::parse_document(&form_html);
            let key_sel = parse_selector("input.hidden")?;
            doc.select(&key_sel)
                .next()
                .and_then(|input| input.value().attr("value"))
                .map(str::to_string)
        }
        .ok_or_else(|| AppError::Login(format!("{username}: login form key not found")))?;

        let form = [
            ("EMAILADDR", username),
            ("PASSWORD", password),
            ("path", config.site.base_url.as_str()),
            ("key", key.as_str()),
        ];
        let response = client
            .post(login_url)
            .form(&form)
            .send()
            .await?
            .text()
            .await?;

        if response.contains(LOGIN_ERROR_MARKER) {
            return Err(AppError::Login(username.to_string()));
        }

        log::debug!("{} successfully logged in", username);

        Ok(Self {
            client,
            request_delay: Duration::from_millis(config.crawler.request_delay_ms),
        })
    }
}

#[async_trait(?Send)]
impl Fetch for Session {
    async fn fetch(&self, url: &str) -> Result<Html> {
        let text = self.client.get(url).send().await?.text().await?;
        if self.request_delay.as_millis() > 0 {
            tokio::time::sleep(self.request_delay).await;
        }
        Ok(Html::parse_document(&text))
    }
}
