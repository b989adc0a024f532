//! One report run: fetch, filter, validate, enrich, render, notify.
//!
//! The run is split into [`assemble`], which performs every stage up to
//! but excluding delivery, and [`run`], which dispatches exactly one
//! outward send per run based on the assembled plan. Nothing is retried
//! and no partial report is ever sent.

use chrono::NaiveDate;
use tracing::info;

use redmine_api::{NamedRef, RedmineClient, TimeEntry};

use crate::config::ReportConfig;
use crate::enrich::enrich_entries;
use crate::error::{ReportError, Result};
use crate::mailer::{report_subject, Mailer};
use crate::report::{render_report, ReportOptions};
use crate::signature;
use crate::validation::{check_daily_total, ValidationOutcome};

/// Terminal state of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// No entries for the day (or none left after filtering); nothing sent.
    NoEntries,
    /// Hour validation failed; the operator was notified, no report sent.
    ValidationFailed,
    /// The report was rendered and delivered.
    ReportSent,
}

/// The single outward action a run decided on, produced before any mail
/// goes out.
#[derive(Debug)]
pub enum RunPlan {
    NoEntries,
    ValidationFailed(ValidationOutcome),
    Report { subject: String, html: String },
}

/// Runs every pipeline stage short of delivery.
pub async fn assemble(
    config: &ReportConfig,
    client: &RedmineClient,
    date: NaiveDate,
) -> Result<RunPlan> {
    info!(%date, user_id = %config.user_id, "fetching time entries");
    let entries = client.list_time_entries(&config.user_id, date).await?;
    let entries = filter_by_project(entries, &config.project_filters);

    if entries.is_empty() {
        info!(%date, "no time entries to report");
        return Ok(RunPlan::NoEntries);
    }

    if config.validate_hours {
        let outcome = check_daily_total(&entries, config.expected_hours);
        if !outcome.is_valid {
            return Ok(RunPlan::ValidationFailed(outcome));
        }
    }

    // Resolve the signature before spending N issue lookups on a run
    // that cannot send anyway.
    let signature = signature::resolve(config)?.ok_or(ReportError::MissingSignature)?;

    let enriched = enrich_entries(client, entries).await;
    let options = ReportOptions::from_config(config);
    let html = render_report(&enriched, date, &options, &signature);
    let subject = report_subject(&config.subject_label, &config.subject_date_format, date);

    Ok(RunPlan::Report { subject, html })
}

/// Assembles the run and fires its single outward notification.
pub async fn run(
    config: &ReportConfig,
    client: &RedmineClient,
    mailer: &Mailer,
    date: NaiveDate,
) -> Result<RunOutcome> {
    match assemble(config, client, date).await? {
        RunPlan::NoEntries => Ok(RunOutcome::NoEntries),
        RunPlan::ValidationFailed(outcome) => {
            mailer
                .send_validation_notice(&config.operator_email, &outcome)
                .await?;
            Ok(RunOutcome::ValidationFailed)
        }
        RunPlan::Report { subject, html } => {
            mailer
                .send_report(&config.recipients, &config.cc, &subject, html)
                .await?;
            info!(%date, "report sent");
            Ok(RunOutcome::ReportSent)
        }
    }
}

/// Keeps entries whose project id or name equals one of the filter terms.
/// An empty filter list keeps everything.
fn filter_by_project(entries: Vec<TimeEntry>, filters: &[String]) -> Vec<TimeEntry> {
    if filters.is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|entry| matches_filter(&entry.project, filters))
        .collect()
}

fn matches_filter(project: &NamedRef, filters: &[String]) -> bool {
    filters.iter().any(|term| {
        let term = term.trim();
        let id_match = project
            .id
            .map(|id| id.to_string() == term)
            .unwrap_or(false);
        let name_match = project.label().map(|name| name == term).unwrap_or(false);
        id_match || name_match
    })
}
