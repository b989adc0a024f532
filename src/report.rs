//! Report document model and HTML rendering.
//!
//! Rendering is split in two: entries are first lowered into typed
//! [`ReportRow`] values (join, placeholder handling, completed-status
//! classification, decimal totals), then the rows are serialized to HTML.
//! Every user-controlled string is escaped at the serialization step;
//! only the configured signature block passes through as markup.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::ReportConfig;
use crate::enrich::EnrichedEntry;

const CELL_STYLE: &str = "border: 1px solid #ddd; padding: 8px;";
const HEADER_ROW_STYLE: &str = "background-color: #f2f2f2;";
const FOOTER_ROW_STYLE: &str = "background-color: #f9f9f9; font-weight: bold;";
const COMPLETED_ROW_STYLE: &str = "background-color: #e8f5e9;";
const BAR_OUTER_STYLE: &str =
    "background-color: #eeeeee; border: 1px solid #ddd; width: 100px; height: 10px;";
const BAR_INNER_STYLE: &str = "background-color: #4caf50; height: 10px;";

const COLUMNS: [&str; 12] = [
    "Project", "Issue", "Tracker", "Status", "Priority", "Author", "Assignee", "Subject",
    "Activity", "Comment", "Time", "Done",
];

/// Display settings the renderer needs from the configuration.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub date_format: String,
    pub customer_name: Option<String>,
    pub completed_statuses: HashSet<String>,
}

impl ReportOptions {
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            date_format: config.subject_date_format.clone(),
            customer_name: config.customer_name.clone(),
            completed_statuses: config.completed_status_set(),
        }
    }
}

/// One rendered table row. Optional cells stay optional here; the
/// placeholder substitution happens during serialization.
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub project: Option<String>,
    pub issue_id: Option<u64>,
    pub tracker: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub author: Option<String>,
    pub assignee: Option<String>,
    pub subject: Option<String>,
    pub activity: Option<String>,
    pub comments: Option<String>,
    pub hours: Decimal,
    pub done_ratio: u8,
    pub completed: bool,
}

/// Lowers enriched entries into rows, in input order, and accumulates the
/// footer total. The total is the exact decimal sum of the row hours, the
/// same arithmetic the validator uses.
pub fn build_rows(
    entries: &[EnrichedEntry],
    completed_statuses: &HashSet<String>,
) -> (Vec<ReportRow>, Decimal) {
    let mut total = Decimal::ZERO;
    let mut rows = Vec::with_capacity(entries.len());

    for item in entries {
        total += item.entry.hours;

        let status = item
            .issue
            .as_ref()
            .and_then(|issue| issue.status.as_ref())
            .and_then(|status| status.label())
            .map(str::to_string);
        let completed = status
            .as_deref()
            .map(|name| completed_statuses.contains(&name.to_lowercase()))
            .unwrap_or(false);

        let issue = item.issue.as_ref();
        rows.push(ReportRow {
            project: item.entry.project.label().map(str::to_string),
            issue_id: item.entry.issue.map(|issue| issue.id),
            tracker: named_label(issue.and_then(|issue| issue.tracker.as_ref())),
            status,
            priority: named_label(issue.and_then(|issue| issue.priority.as_ref())),
            author: named_label(issue.and_then(|issue| issue.author.as_ref())),
            assignee: named_label(issue.and_then(|issue| issue.assigned_to.as_ref())),
            subject: issue.and_then(|issue| issue.subject.clone()),
            activity: item.entry.activity.label().map(str::to_string),
            comments: item.entry.comments.clone(),
            hours: item.entry.hours,
            done_ratio: issue.map(|issue| issue.done_ratio.min(100)).unwrap_or(0),
            completed,
        });
    }

    (rows, total)
}

fn named_label(named: Option<&redmine_api::NamedRef>) -> Option<String> {
    named.and_then(|named| named.label()).map(str::to_string)
}

/// Renders the full report document. Pure and deterministic: identical
/// input yields byte-identical output.
pub fn render_report(
    entries: &[EnrichedEntry],
    date: NaiveDate,
    options: &ReportOptions,
    signature: &str,
) -> String {
    let (rows, total) = build_rows(entries, &options.completed_statuses);
    let date_text = date.format(&options.date_format).to_string();

    let mut html = String::new();
    html.push_str("<html>\n<body style=\"font-family: Arial, sans-serif;\">\n");
    html.push_str(&format!("<h2>Report for {}</h2>\n", escape_html(&date_text)));

    if let Some(customer) = &options.customer_name {
        html.push_str(&format!("<p>Hello {},</p>\n", escape_html(customer)));
    }

    html.push_str(
        "<table style=\"border-collapse: collapse; width: 100%; margin: 20px 0;\">\n<thead>\n",
    );
    html.push_str(&format!("<tr style=\"{}\">\n", HEADER_ROW_STYLE));
    for column in COLUMNS {
        html.push_str(&format!(
            "<th style=\"{} text-align: left;\">{}</th>\n",
            CELL_STYLE, column
        ));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in &rows {
        html.push_str(&render_row(row));
    }

    html.push_str("</tbody>\n<tfoot>\n");
    html.push_str(&format!(
        "<tr style=\"{}\">\n<td colspan=\"10\" style=\"{} text-align: right;\">Total:</td>\n<td style=\"{} text-align: right;\">{}</td>\n<td style=\"{}\"></td>\n</tr>\n",
        FOOTER_ROW_STYLE,
        CELL_STYLE,
        CELL_STYLE,
        format_hours(total),
        CELL_STYLE
    ));
    html.push_str("</tfoot>\n</table>\n");

    html.push_str(signature);
    html.push_str("\n</body>\n</html>\n");
    html
}

fn render_row(row: &ReportRow) -> String {
    let style = if row.completed {
        COMPLETED_ROW_STYLE
    } else {
        ""
    };
    let issue_text = row.issue_id.map(|id| format!("#{}", id));

    let mut cells = String::new();
    for value in [
        row.project.as_deref(),
        issue_text.as_deref(),
        row.tracker.as_deref(),
        row.status.as_deref(),
        row.priority.as_deref(),
        row.author.as_deref(),
        row.assignee.as_deref(),
        row.subject.as_deref(),
        row.activity.as_deref(),
        row.comments.as_deref(),
    ] {
        cells.push_str(&format!(
            "<td style=\"{}\">{}</td>\n",
            CELL_STYLE,
            escape_html(value.unwrap_or("-"))
        ));
    }
    cells.push_str(&format!(
        "<td style=\"{} text-align: right;\">{}</td>\n",
        CELL_STYLE,
        format_hours(row.hours)
    ));
    cells.push_str(&format!(
        "<td style=\"{}\">{}</td>\n",
        CELL_STYLE,
        render_done_bar(row.done_ratio)
    ));

    format!("<tr style=\"{}\">\n{}</tr>\n", style, cells)
}

fn render_done_bar(done_ratio: u8) -> String {
    let ratio = done_ratio.min(100);
    format!(
        "<div style=\"{}\"><div style=\"{} width: {}%;\"></div></div>{}%",
        BAR_OUTER_STYLE, BAR_INNER_STYLE, ratio, ratio
    )
}

fn format_hours(hours: Decimal) -> String {
    format!("{} h", hours.normalize())
}

/// Escapes text for safe interpolation into HTML element content and
/// attribute values. Entry comments and issue subjects are free text from
/// the tracker and must never reach the document unescaped.
fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
