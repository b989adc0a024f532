mod issue;
mod named_ref;
mod time_entry;

pub use issue::{IssueDetail, IssueEnvelope};
pub use named_ref::NamedRef;
pub use time_entry::{IssueRef, TimeEntry, TimeEntryList};
