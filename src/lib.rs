//! Daily Redmine time report pipeline: fetch a user's logged entries,
//! enrich them with issue details, validate the daily total, render an
//! HTML report and mail it.

pub mod config;
pub mod enrich;
pub mod error;
pub mod mailer;
pub mod pipeline;
pub mod report;
pub mod signature;
pub mod validation;

pub use config::ReportConfig;
pub use enrich::EnrichedEntry;
pub use error::{ReportError, Result};
pub use mailer::{Mailer, SmtpConfig};
pub use pipeline::{RunOutcome, RunPlan};
pub use validation::ValidationOutcome;
