// src/notify/mod.rs

//! Digest rendering and delivery.
//!
//! The digest is one HTML document: an optional score line followed by one
//! block per extracted post (linked title, timestamp, post fragment). It is
//! sent over SMTP with STARTTLS; delivery happens only when there is
//! something to report.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::MailConfig;
use crate::error::{AppError, Result};
use crate::models::PostRecord;
use crate::pipeline::CrawlOutcome;

/// Decide whether a run's outcome warrants a digest, and render it if so.
///
/// A digest goes out when the run found posts or the score rose above
/// `last_score`; a score increase alone is enough, even with no posts. An
/// unchanged score and an empty post list yield `None` and nothing is sent.
pub fn digest_for(outcome: &CrawlOutcome, target: &str, last_score: i64) -> Option<String> {
    let score_increased = outcome.score > last_score;
    if outcome.posts.is_empty() && !score_increased {
        return None;
    }

    let note = score_increased.then(|| {
        format!(
            "{} karma increased from {} to {}",
            target, last_score, outcome.score
        )
    });
    Some(render_digest(&outcome.posts, note.as_deref()))
}

/// Render the digest body for a run's extracted posts.
///
/// `score_note` is prepended when the reputation score increased; it may be
/// the only content when the post list is empty.
pub fn render_digest(posts: &[PostRecord], score_note: Option<&str>) -> String {
    let mut blocks = String::new();

    if let Some(note) = score_note {
        blocks.push_str(&format!("<p>{note}</p>\n"));
    }

    for post in posts {
        blocks.push_str(&format!(
            "<h2><a href=\"{url}\">{title}</a></h2>\n<h3>{time}</h3>\n{body}\n",
            url = post.thread_url,
            title = post.thread_title,
            time = post.posted_at_display,
            body = post.body_fragment,
        ));
    }

    format!("<html>\n<head></head>\n<body>\n{blocks}</body>\n</html>\n")
}

/// SMTP digest sender.
pub struct Mailer {
    config: MailConfig,
    password: String,
}

impl Mailer {
    pub fn new(config: MailConfig, password: String) -> Self {
        Self { config, password }
    }

    /// Send the rendered digest to every recipient in one message.
    pub fn send(&self, recipients: &[String], html: &str) -> Result<()> {
        if recipients.is_empty() {
            return Err(AppError::config("no digest recipients configured"));
        }

        let mut builder = Message::builder()
            .from(self.config.from_addr.parse().map_err(AppError::mail)?)
            .subject(self.config.subject.clone())
            .header(ContentType::TEXT_HTML);
        for recipient in recipients {
            builder = builder.to(recipient.parse().map_err(AppError::mail)?);
        }
        let message = builder.body(html.to_string()).map_err(AppError::mail)?;

        let transport = SmtpTransport::starttls_relay(&self.config.smtp_host)
            .map_err(AppError::mail)?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(
                self.config.from_addr.clone(),
                self.password.clone(),
            ))
            .build();

        transport.send(&message).map_err(AppError::mail)?;
        log::info!("Digest sent to {} recipient(s)", recipients.len());
        Ok(())
    }
}
