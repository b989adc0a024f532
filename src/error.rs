//! Error model for a single report run.

use thiserror::Error;

use crate::mailer::MailError;

pub type Result<T> = std::result::Result<T, ReportError>;

/// Faults that abort a run and route to the operator error notice.
/// Per-issue lookup failures are not represented here: the enricher
/// recovers from them locally and the affected rows render blank.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("tracker request failed: {0}")]
    Api(#[from] redmine_api::RedmineError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("no mail signature is configured")]
    MissingSignature,
    #[error("mail delivery failed: {0}")]
    Mail(#[from] MailError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
