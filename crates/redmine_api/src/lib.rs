//! Typed Redmine REST API client crate used by the report pipeline.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pacing;

pub use client::RedmineClient;
pub use config::RedmineConfig;
pub use error::{RedmineError, Result};
pub use models::{IssueDetail, IssueRef, NamedRef, TimeEntry};
