//! Joins time entries with the issue records they reference.

use std::collections::HashMap;

use tracing::warn;

use redmine_api::{IssueDetail, RedmineClient, TimeEntry};

/// A time entry together with the referenced issue's detail record, when
/// one exists and its lookup succeeded.
#[derive(Debug, Clone)]
pub struct EnrichedEntry {
    pub entry: TimeEntry,
    pub issue: Option<IssueDetail>,
}

/// Fetches issue details for every entry carrying an issue reference.
/// Lookups run sequentially in entry order and are memoized by issue id,
/// so entries sharing an issue cost one request. A failed lookup is
/// logged and leaves that entry without detail; it never aborts the run.
pub async fn enrich_entries(
    client: &RedmineClient,
    entries: Vec<TimeEntry>,
) -> Vec<EnrichedEntry> {
    let mut fetched: HashMap<u64, Option<IssueDetail>> = HashMap::new();
    let mut enriched = Vec::with_capacity(entries.len());

    for entry in entries {
        let issue = match entry.issue {
            Some(issue_ref) => lookup(client, &mut fetched, issue_ref.id).await,
            None => None,
        };
        enriched.push(EnrichedEntry { entry, issue });
    }

    enriched
}

async fn lookup(
    client: &RedmineClient,
    fetched: &mut HashMap<u64, Option<IssueDetail>>,
    issue_id: u64,
) -> Option<IssueDetail> {
    if let Some(known) = fetched.get(&issue_id) {
        return known.clone();
    }

    let detail = match client.get_issue(issue_id).await {
        Ok(issue) => Some(issue),
        Err(err) => {
            warn!(issue_id, error = %err, "issue lookup failed, rendering entry without detail");
            None
        }
    };
    fetched.insert(issue_id, detail.clone());
    detail
}
