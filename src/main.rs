use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redmine_api::RedmineClient;
use redmine_reporter::config::ReportConfig;
use redmine_reporter::error::ReportError;
use redmine_reporter::mailer::{Mailer, SmtpConfig};
use redmine_reporter::pipeline::{self, RunOutcome};

/// Sends the daily Redmine time report for one date. Meant to be invoked
/// once per day by an external scheduler.
#[derive(Parser, Debug)]
#[command(name = "redmine-reporter", version, about)]
struct Cli {
    /// Path to the JSON configuration file; defaults to the platform
    /// config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report date as YYYY-MM-DD; defaults to today.
    #[arg(long)]
    date: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match execute(cli).await {
        Ok(outcome) => {
            info!(?outcome, "run finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "run failed");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<RunOutcome, ReportError> {
    let config_path = match cli.config {
        Some(path) => path,
        None => ReportConfig::default_path()?,
    };
    let config = ReportConfig::load(&config_path)?;
    let date = resolve_date(cli.date.as_deref())?;

    let smtp = SmtpConfig::from_env().ok_or_else(|| {
        ReportError::Config("SMTP_HOST and SMTP_FROM must be set".to_string())
    })?;
    let mailer = Mailer::new(smtp, config.sender_name.clone());
    let client = RedmineClient::new(config.redmine_config())?;

    match pipeline::run(&config, &client, &mailer, date).await {
        Ok(outcome) => Ok(outcome),
        // A failing transport is terminal: notifying the operator about a
        // notification failure would use the same broken transport.
        Err(err @ ReportError::Mail(_)) => Err(err),
        Err(err) => {
            if let Err(notice_err) = mailer
                .send_error_notice(&config.operator_email, &err.to_string())
                .await
            {
                error!(error = %notice_err, "error notice could not be delivered");
            }
            Err(err)
        }
    }
}

fn resolve_date(arg: Option<&str>) -> Result<NaiveDate, ReportError> {
    match arg {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|err| ReportError::Config(format!("invalid --date '{text}': {err}"))),
        None => Ok(Local::now().date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_date;
    use chrono::NaiveDate;

    #[test]
    fn explicit_date_is_parsed() {
        let date = resolve_date(Some("2024-01-15")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn malformed_date_is_a_config_error() {
        assert!(resolve_date(Some("15.01.2024")).is_err());
    }

    #[test]
    fn missing_date_defaults_to_today() {
        assert!(resolve_date(None).is_ok());
    }
}
