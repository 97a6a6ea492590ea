//! SQL query execution: submit, long-poll, page.
//!
//! The state machine here only knows about remote work not being finished.
//! Expired tokens are the dispatcher's business and are handled below this
//! layer on every individual request.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::dispatcher::{encode_segment, ApiRequest, RequestDispatcher};
use super::types::{QueryResponse, SubmitQuery};
use crate::error::{DataCloudError, Result};

pub const DEFAULT_WORKLOAD_NAME: &str = "data-360-mcp-query-oss";

#[derive(Debug, Clone)]
pub struct QuerySettings {
    pub api_version: String,
    pub dataspace: String,
    pub workload_name: Option<String>,
    /// Overall budget when the caller gives none.
    pub default_timeout: Duration,
    /// Server-side wait requested on each status poll.
    pub poll_wait: Duration,
    pub page_size: u32,
    /// Budget for the best-effort cancel request.
    pub cancel_timeout: Duration,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            api_version: "v63.0".to_string(),
            dataspace: "default".to_string(),
            workload_name: Some(DEFAULT_WORKLOAD_NAME.to_string()),
            default_timeout: Duration::from_secs(600),
            poll_wait: Duration::from_secs(20),
            page_size: 100_000,
            cancel_timeout: Duration::from_secs(5),
        }
    }
}

impl QuerySettings {
    /// Base path of the query API.
    pub fn base_path(&self) -> String {
        format!("/services/data/{}/ssot/query-sql", self.api_version)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryState {
    Submitted,
    Running,
    Done,
    Failed,
    Cancelled,
}

impl QueryState {
    pub fn from_provider(status: &str) -> Option<Self> {
        match status {
            "Submitted" | "Queued" => Some(Self::Submitted),
            "Running" => Some(Self::Running),
            "Finished" | "ResultsProduced" => Some(Self::Done),
            "Failure" | "Failed" | "Error" => Some(Self::Failed),
            "Cancelled" | "Canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for QueryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Submitted => "SUBMITTED",
            Self::Running => "RUNNING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

/// Local view of one submitted query.
#[derive(Debug, Clone)]
pub struct QuerySession {
    pub query_id: String,
    pub state: QueryState,
    pub next_page_token: Option<String>,
    pub row_count: Option<u64>,
    pub error_message: Option<String>,
}

impl QuerySession {
    /// Fold a provider response into the session.
    fn apply(&mut self, response: &QueryResponse) -> Result<()> {
        let status = response.status();
        match status.completion_status.as_deref() {
            Some(raw) => match QueryState::from_provider(raw) {
                Some(state) => self.state = state,
                None => warn!("Unknown query status '{}', still waiting", raw),
            },
            None => {
                return Err(DataCloudError::Query(format!(
                    "Status response for query {} has no completionStatus",
                    self.query_id
                )))
            }
        }
        if let Some(count) = status.row_count() {
            self.row_count = Some(count);
        }
        if status.error_message.is_some() {
            self.error_message = status.error_message;
        }
        Ok(())
    }
}

/// Caller-side limits for one query.
#[derive(Debug, Clone, Default)]
pub struct QueryControl {
    pub timeout: Option<Duration>,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl QueryControl {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            cancel: None,
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub data: Vec<Value>,
    pub metadata: Value,
    pub query_id: String,
    pub row_count: usize,
}

pub struct QueryExecutor {
    dispatcher: Arc<RequestDispatcher>,
    settings: QuerySettings,
}

impl QueryExecutor {
    pub fn new(dispatcher: Arc<RequestDispatcher>, settings: QuerySettings) -> Self {
        Self { dispatcher, settings }
    }

    pub fn settings(&self) -> &QuerySettings {
        &self.settings
    }

    fn with_common_params(&self, request: ApiRequest) -> ApiRequest {
        request
            .query("dataspace", &self.settings.dataspace)
            .query_opt("workloadName", self.settings.workload_name.as_ref())
    }

    fn query_path(&self, query_id: &str) -> String {
        format!("{}/{}", self.settings.base_path(), encode_segment(query_id))
    }

    /// Run `sql` to completion and collect every row.
    pub async fn execute(&self, sql: &str, control: &QueryControl) -> Result<QueryResult> {
        let budget = control.timeout.unwrap_or(self.settings.default_timeout);
        let deadline = Instant::now() + budget;

        let submitted = self.submit(sql).await?;
        let mut session = QuerySession {
            query_id: submitted
                .status()
                .query_id
                .ok_or_else(|| DataCloudError::Query("Query ID not returned by the API".to_string()))?,
            state: QueryState::Submitted,
            next_page_token: submitted.next_page_token.clone(),
            row_count: None,
            error_message: None,
        };
        if submitted.status().completion_status.is_some() {
            session.apply(&submitted)?;
        }
        info!("Submitted query {} ({})", session.query_id, session.state);

        let mut polls = 0usize;
        while !session.state.is_terminal() {
            if control.cancelled() {
                return Err(self.abandon(&session.query_id, "was cancelled by the caller".to_string()).await);
            }
            if Instant::now() >= deadline {
                let reason = format!("did not finish within {}s", budget.as_secs_f32());
                return Err(self.abandon(&session.query_id, reason).await);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            let wait = std::cmp::min(self.settings.poll_wait, remaining);
            polls += 1;
            debug!("Polling query {} (attempt {}, wait {:?})", session.query_id, polls, wait);

            let response = self.poll(&session.query_id, wait).await?;
            session.apply(&response)?;
        }

        match session.state {
            QueryState::Failed => {
                return Err(DataCloudError::Query(session.error_message.unwrap_or_else(|| {
                    format!("Query {} failed without an error message", session.query_id)
                })))
            }
            QueryState::Cancelled => {
                return Err(DataCloudError::Cancelled(format!(
                    "Query {} was cancelled by the service",
                    session.query_id
                )))
            }
            _ => {}
        }

        let (data, metadata) = self.collect_rows(&mut session, submitted).await?;
        info!(
            "Query {} finished: {} rows after {} polls",
            session.query_id,
            data.len(),
            polls
        );

        Ok(QueryResult {
            row_count: data.len(),
            data,
            metadata: metadata.unwrap_or_else(|| json!([])),
            query_id: session.query_id,
        })
    }

    /// Best-effort remote cancel.
    pub async fn cancel(&self, query_id: &str) -> Result<Value> {
        let request = self
            .with_common_params(ApiRequest::delete(self.query_path(query_id)))
            .timeout(self.settings.cancel_timeout);
        self.dispatcher.call(&request).await
    }

    /// Current status without waiting.
    pub async fn status(&self, query_id: &str) -> Result<Value> {
        let request = self.with_common_params(ApiRequest::get(self.query_path(query_id)));
        self.dispatcher.call(&request).await
    }

    async fn submit(&self, sql: &str) -> Result<QueryResponse> {
        let body = serde_json::to_value(SubmitQuery { sql })
            .map_err(|e| DataCloudError::Query(format!("Failed to encode query: {}", e)))?;
        let request = self
            .with_common_params(ApiRequest::post(self.settings.base_path()))
            .json(body);
        parse(self.dispatcher.call(&request).await?)
    }

    async fn poll(&self, query_id: &str, wait: Duration) -> Result<QueryResponse> {
        let request = self
            .with_common_params(ApiRequest::get(self.query_path(query_id)))
            .query("waitTimeMs", wait.as_millis())
            .timeout(wait + Duration::from_secs(30));
        parse(self.dispatcher.call(&request).await?)
    }

    /// Send one cancel request, ignoring its outcome.
    async fn abandon(&self, query_id: &str, reason: String) -> DataCloudError {
        warn!("Query {} {}, sending cancel", query_id, reason);
        if let Err(e) = self.cancel(query_id).await {
            warn!("Cancel request for query {} failed: {}", query_id, e);
        }
        DataCloudError::Cancelled(format!("Query {} {}", query_id, reason))
    }

    async fn collect_rows(
        &self,
        session: &mut QuerySession,
        submitted: QueryResponse,
    ) -> Result<(Vec<Value>, Option<Value>)> {
        let mut rows = submitted.data;
        let mut metadata = submitted.metadata;

        let complete_inline = session.next_page_token.is_none()
            && session.row_count.map_or(false, |n| rows.len() as u64 >= n);
        if complete_inline {
            return Ok((rows, metadata));
        }

        // Pages are addressed by offset; a cursor, when the service sends one, is passed along.
        let rows_path = format!("{}/rows", self.query_path(&session.query_id));
        loop {
            let request = self
                .with_common_params(ApiRequest::get(rows_path.clone()))
                .query("rowLimit", self.settings.page_size)
                .query("offset", rows.len())
                .query_opt("pageToken", session.next_page_token.as_ref());
            let page = parse(self.dispatcher.call(&request).await?)?;

            let fetched = page.data.len();
            debug!("Fetched {} rows for query {}", fetched, session.query_id);
            rows.extend(page.data);
            if metadata.is_none() {
                metadata = page.metadata;
            }

            match page.next_page_token {
                Some(token) if session.next_page_token.as_deref() == Some(token.as_str()) => {
                    return Err(DataCloudError::Query(format!(
                        "Row paging for query {} returned the same cursor twice",
                        session.query_id
                    )))
                }
                Some(token) => {
                    session.next_page_token = Some(token);
                    continue;
                }
                None => session.next_page_token = None,
            }

            match session.row_count {
                Some(expected) if (rows.len() as u64) < expected => {
                    if fetched == 0 {
                        return Err(DataCloudError::Query(format!(
                            "Query {} reported {} rows but only {} were returned",
                            session.query_id,
                            expected,
                            rows.len()
                        )));
                    }
                }
                _ => break,
            }
        }

        Ok((rows, metadata))
    }
}

fn parse(body: Value) -> Result<QueryResponse> {
    serde_json::from_value(body).map_err(|e| DataCloudError::Query(format!("Malformed query response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::RouteTable;
    use crate::api::HttpClient;
    use crate::auth::testing::StaticPlatform;
    use crate::auth::TenantTokenExchanger;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BASE: &str = "/services/data/v63.0/ssot/query-sql";

    fn executor(server: &MockServer, settings: QuerySettings) -> QueryExecutor {
        let http = HttpClient::new().unwrap();
        let platform = Arc::new(StaticPlatform::new(&server.uri(), "platform-token"));
        let tenant = Arc::new(TenantTokenExchanger::new(platform.clone(), http.clone()));
        let dispatcher = RequestDispatcher::new(http, platform, tenant, RouteTable::default());
        QueryExecutor::new(Arc::new(dispatcher), settings)
    }

    async fn count(server: &MockServer, http_method: &str, request_path: &str) -> usize {
        server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
            .count()
    }

    #[test]
    fn test_state_mapping() {
        assert_eq!(QueryState::from_provider("Queued"), Some(QueryState::Submitted));
        assert_eq!(QueryState::from_provider("ResultsProduced"), Some(QueryState::Done));
        assert_eq!(QueryState::from_provider("Canceled"), Some(QueryState::Cancelled));
        assert_eq!(QueryState::from_provider("Failure"), Some(QueryState::Failed));
        assert_eq!(QueryState::from_provider("Mystery"), None);
        assert!(!QueryState::Running.is_terminal());
    }

    #[tokio::test]
    async fn test_query_polls_until_done_and_pages_rows() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BASE))
            .and(query_param("dataspace", "default"))
            .and(query_param("workloadName", DEFAULT_WORKLOAD_NAME))
            .and(body_json(json!({ "sql": "SELECT 1" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "status": { "queryId": "q-1", "completionStatus": "Running" }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{}/q-1", BASE)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "queryId": "q-1", "completionStatus": "Running"
            })))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{}/q-1", BASE)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "queryId": "q-1", "completionStatus": "Finished", "rowCount": 1
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{}/q-1/rows", BASE)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "a": 1 }],
                "metadata": [{ "name": "a", "type": "INTEGER" }],
                "nextPageToken": "page-2"
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{}/q-1/rows", BASE)))
            .and(query_param("pageToken", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        let result = executor(&server, QuerySettings::default())
            .execute("SELECT 1", &QueryControl::default())
            .await
            .unwrap();

        assert_eq!(result.data, vec![json!({ "a": 1 })]);
        assert_eq!(result.metadata, json!([{ "name": "a", "type": "INTEGER" }]));
        assert_eq!(count(&server, "GET", &format!("{}/q-1", BASE)).await, 3);
        assert_eq!(count(&server, "GET", &format!("{}/q-1/rows", BASE)).await, 2);
    }

    #[tokio::test]
    async fn test_timeout_cancels_remote_query_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BASE))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "status": { "queryId": "slow", "completionStatus": "Submitted" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{}/slow", BASE)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "queryId": "slow", "completionStatus": "Running" }))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("{}/slow", BASE)))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let err = executor(&server, QuerySettings::default())
            .execute("SELECT * FROM big", &QueryControl::with_timeout(Duration::from_millis(200)))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "cancelled");
        assert_eq!(count(&server, "DELETE", &format!("{}/slow", BASE)).await, 1);
    }

    #[tokio::test]
    async fn test_cancel_flag_stops_between_polls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BASE))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "queryId": "q-2", "completionStatus": "Running"
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("{}/q-2", BASE)))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let flag = Arc::new(AtomicBool::new(true));
        let control = QueryControl {
            timeout: None,
            cancel: Some(flag),
        };
        let err = executor(&server, QuerySettings::default())
            .execute("SELECT 1", &control)
            .await
            .unwrap_err();

        assert!(matches!(err, DataCloudError::Cancelled(_)));
        assert_eq!(count(&server, "GET", &format!("{}/q-2", BASE)).await, 0);
    }

    #[tokio::test]
    async fn test_failed_query_surfaces_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BASE))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "status": {
                    "queryId": "bad",
                    "completionStatus": "Failure",
                    "errorMessage": "Column 'nope' not found"
                }
            })))
            .mount(&server)
            .await;

        let err = executor(&server, QuerySettings::default())
            .execute("SELECT nope FROM t", &QueryControl::default())
            .await
            .unwrap_err();

        match err {
            DataCloudError::Query(message) => assert!(message.contains("nope")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_inline_results_skip_paging() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BASE))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "status": { "queryId": "fast", "completionStatus": "ResultsProduced", "rowCount": 2 },
                "data": [[1], [2]],
                "metadata": { "x": { "type": "INTEGER", "placeInOrder": 0 } }
            })))
            .mount(&server)
            .await;

        let result = executor(&server, QuerySettings::default())
            .execute("SELECT x FROM t", &QueryControl::default())
            .await
            .unwrap();

        assert_eq!(result.row_count, 2);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_offset_paging_collects_every_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BASE))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "status": { "queryId": "wide", "completionStatus": "Finished", "rowCount": 3 },
                "data": [{ "a": 1 }]
            })))
            .mount(&server)
            .await;
        for offset in 1..3 {
            Mock::given(method("GET"))
                .and(path(format!("{}/wide/rows", BASE)))
                .and(query_param("offset", offset.to_string()))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "data": [{ "a": offset + 1 }]
                })))
                .expect(1)
                .mount(&server)
                .await;
        }

        let settings = QuerySettings {
            page_size: 1,
            ..QuerySettings::default()
        };
        let result = executor(&server, settings)
            .execute("SELECT a FROM t", &QueryControl::default())
            .await
            .unwrap();

        assert_eq!(result.data, vec![json!({ "a": 1 }), json!({ "a": 2 }), json!({ "a": 3 })]);
        assert_eq!(result.row_count, 3);
    }

    #[tokio::test]
    async fn test_short_result_is_query_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BASE))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "status": { "queryId": "short", "completionStatus": "Finished", "rowCount": 5 },
                "data": [{ "a": 1 }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{}/short/rows", BASE)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let err = executor(&server, QuerySettings::default())
            .execute("SELECT a FROM t", &QueryControl::default())
            .await
            .unwrap_err();

        match err {
            DataCloudError::Query(message) => assert!(message.contains("reported 5 rows")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_repeated_cursor_is_query_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(BASE))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "queryId": "loop", "completionStatus": "Finished"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{}/loop/rows", BASE)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "a": 1 }],
                "nextPageToken": "same"
            })))
            .mount(&server)
            .await;

        let err = executor(&server, QuerySettings::default())
            .execute("SELECT a FROM t", &QueryControl::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "query_error");
    }
}
