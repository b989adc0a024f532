use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::RedmineConfig;
use crate::error::{RedmineError, Result};
use crate::models::{IssueDetail, IssueEnvelope, TimeEntry, TimeEntryList};
use crate::pacing::RequestPacer;

#[derive(Clone)]
pub struct RedmineClient {
    http: HttpClient,
    config: RedmineConfig,
    pacer: RequestPacer,
}

impl RedmineClient {
    pub fn new(config: RedmineConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        let pacer = RequestPacer::new(config.cooldown);
        Ok(Self {
            http,
            config,
            pacer,
        })
    }

    pub fn new_with_pacer(config: RedmineConfig, pacer: RequestPacer) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self {
            http,
            config,
            pacer,
        })
    }

    pub fn config(&self) -> &RedmineConfig {
        &self.config
    }

    pub fn pacer(&self) -> &RequestPacer {
        &self.pacer
    }

    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.get_with_query(path, None).await
    }

    pub async fn get_with_query<T>(
        &self,
        path: &str,
        query: Option<&[(&str, &str)]>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.pacer.pause().await;
        let mut request = self.http.get(self.url_for(path));
        if let Some(params) = query {
            request = request.query(params);
        }
        let response = request.send().await?;
        Self::parse_json(response).await
    }

    /// Lists the time entries one user logged on one date, in server order.
    /// An empty day is a valid, empty result rather than an error.
    pub async fn list_time_entries(
        &self,
        user_id: &str,
        spent_on: NaiveDate,
    ) -> Result<Vec<TimeEntry>> {
        let date = spent_on.format("%Y-%m-%d").to_string();
        let limit = self.config.page_limit.to_string();
        let params = [
            ("user_id", user_id),
            ("spent_on", date.as_str()),
            ("limit", limit.as_str()),
        ];
        let list: TimeEntryList = self
            .get_with_query("time_entries.json", Some(&params))
            .await?;
        debug!(user_id, %spent_on, count = list.time_entries.len(), "fetched time entries");
        Ok(list.time_entries)
    }

    /// Fetches the extended record for a single issue.
    pub async fn get_issue(&self, issue_id: u64) -> Result<IssueDetail> {
        let path = format!("issues/{}.json", issue_id);
        let envelope: IssueEnvelope = self.get(&path).await?;
        Ok(envelope.issue)
    }

    fn url_for(&self, path: &str) -> String {
        let mut base = self.config.api_root();
        let trimmed = path.trim_start_matches('/');
        base.push_str(trimmed);
        base
    }

    async fn parse_json<T>(response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            response.json::<T>().await.map_err(RedmineError::from)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            Err(RedmineError::Authentication(format!(
                "Access denied ({}) - {}",
                status, body
            )))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(build_http_error(status, &body))
        }
    }
}

fn build_http_client(config: &RedmineConfig) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();

    let api_key_header = HeaderName::from_static("x-redmine-api-key");
    headers.insert(api_key_header, header_value(config.api_key.clone())?);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, header_value(config.user_agent.clone())?);

    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .map_err(|err| RedmineError::Other(err.to_string()))
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|err| RedmineError::Other(err.to_string()))
}

fn build_http_error(status: StatusCode, body: &str) -> RedmineError {
    let message = extract_error_detail(body).unwrap_or_else(|| body.to_string());
    RedmineError::http(status, message)
}

/// Redmine reports failures as `{"errors": ["...", ...]}`; surface the
/// joined list when present instead of the raw body.
fn extract_error_detail(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    let errors = value.get("errors")?.as_array()?;
    let details: Vec<&str> = errors.iter().filter_map(Value::as_str).collect();
    if details.is_empty() {
        None
    } else {
        Some(details.join("; "))
    }
}
