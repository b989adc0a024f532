//! Outbound mail delivery via SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport behind the three
//! terminal send paths a run can take: the HTML report, the plain-text
//! validation notice, and the plain-text error notice. Transport
//! configuration is loaded from environment variables; if `SMTP_HOST` is
//! not set, [`SmtpConfig::from_env`] returns `None` and the run must not
//! start.

use chrono::{DateTime, Local, NaiveDate};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::validation::ValidationOutcome;

/// Error type for mail delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Configuration for the SMTP transport.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server hostname.
    pub host: String,
    /// SMTP server port (defaults to 587).
    pub port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub user: Option<String>,
    /// Optional SMTP password.
    pub password: Option<String>,
}

impl SmtpConfig {
    /// Load transport configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that mail
    /// delivery is not configured.
    ///
    /// | Variable        | Required | Default |
    /// |-----------------|----------|---------|
    /// | `SMTP_HOST`     | yes      | —       |
    /// | `SMTP_PORT`     | no       | `587`   |
    /// | `SMTP_FROM`     | yes      | —       |
    /// | `SMTP_USER`     | no       | —       |
    /// | `SMTP_PASSWORD` | no       | —       |
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok()?;
        let from_address = std::env::var("SMTP_FROM").ok()?;
        Some(Self {
            host,
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address,
            user: std::env::var("SMTP_USER").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Builds the report subject line: configured label plus the report date
/// in the configured format.
pub fn report_subject(label: &str, date_format: &str, date: NaiveDate) -> String {
    format!("{} - {}", label, date.format(date_format))
}

/// Plain-text body for the validation-failure notice.
pub fn validation_body(outcome: &ValidationOutcome) -> String {
    let detail = outcome
        .message
        .as_deref()
        .unwrap_or("daily total does not match the expected total");
    format!(
        "The daily report was not sent because hour validation failed.\n\n{}\n\nComputed total: {} h",
        detail,
        outcome.total_hours.normalize()
    )
}

/// Plain-text body for the error notice.
pub fn error_body(description: &str, at: DateTime<Local>) -> String {
    format!(
        "An error occurred while generating the daily report:\n\n{}\n\nTime: {}",
        description,
        at.format("%Y-%m-%d %H:%M:%S %z")
    )
}

/// Assembles the HTML report message for the recipient list plus cc.
fn build_report_message(
    from: Mailbox,
    recipients: &[String],
    cc: &[String],
    subject: &str,
    html: String,
) -> Result<Message, MailError> {
    let mut builder = Message::builder().from(from).subject(subject);
    for recipient in recipients {
        builder = builder.to(recipient.parse()?);
    }
    for copy in cc {
        builder = builder.cc(copy.parse()?);
    }
    builder
        .header(ContentType::TEXT_HTML)
        .body(html)
        .map_err(|err| MailError::Build(err.to_string()))
}

/// Assembles a plain-text notice for the operator only.
fn build_notice_message(
    from: Mailbox,
    operator: &str,
    subject: &str,
    body: String,
) -> Result<Message, MailError> {
    Message::builder()
        .from(from)
        .to(operator.parse()?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body)
        .map_err(|err| MailError::Build(err.to_string()))
}

/// Sends report and notice mail over SMTP.
pub struct Mailer {
    config: SmtpConfig,
    sender_name: Option<String>,
}

impl Mailer {
    /// Creates a mailer with the given transport configuration and
    /// optional sender display name.
    pub fn new(config: SmtpConfig, sender_name: Option<String>) -> Self {
        Self {
            config,
            sender_name,
        }
    }

    /// Delivers the rendered HTML report to the recipient list plus cc.
    pub async fn send_report(
        &self,
        recipients: &[String],
        cc: &[String],
        subject: &str,
        html: String,
    ) -> Result<(), MailError> {
        let message =
            build_report_message(self.from_mailbox()?, recipients, cc, subject, html)?;
        self.deliver(message).await?;
        info!(recipients = recipients.len(), cc = cc.len(), subject, "report email sent");
        Ok(())
    }

    /// Delivers the validation-failure notice to the operator only.
    pub async fn send_validation_notice(
        &self,
        operator: &str,
        outcome: &ValidationOutcome,
    ) -> Result<(), MailError> {
        let message = build_notice_message(
            self.from_mailbox()?,
            operator,
            "Daily report hour validation failed",
            validation_body(outcome),
        )?;
        self.deliver(message).await?;
        info!(operator, "validation notice sent");
        Ok(())
    }

    /// Delivers the error notice to the operator only.
    pub async fn send_error_notice(
        &self,
        operator: &str,
        description: &str,
    ) -> Result<(), MailError> {
        let message = build_notice_message(
            self.from_mailbox()?,
            operator,
            "Error in Redmine daily report",
            error_body(description, Local::now()),
        )?;
        self.deliver(message).await?;
        info!(operator, "error notice sent");
        Ok(())
    }

    fn from_mailbox(&self) -> Result<Mailbox, MailError> {
        let address = self.config.from_address.parse()?;
        Ok(Mailbox::new(self.sender_name.clone(), address))
    }

    async fn deliver(&self, message: Message) -> Result<(), MailError> {
        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
                .port(self.config.port);

        if let (Some(user), Some(password)) = (&self.config.user, &self.config.password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(message).await?;
        Ok(())
    }
}
