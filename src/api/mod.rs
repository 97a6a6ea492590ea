//! Data Cloud API access.
//!
//! [`RequestDispatcher`] is the one place requests are authenticated and sent;
//! [`QueryExecutor`] layers the asynchronous SQL protocol on top of it.

mod dispatcher;
pub(crate) mod http;
mod query;
mod routes;
mod types;

pub use dispatcher::{encode_segment, ApiRequest, RequestDispatcher};
pub use http::HttpClient;
pub use query::{QueryControl, QueryExecutor, QuerySettings};
pub use routes::RouteTable;

/// Path prefix of the Connect API for `version`.
pub fn connect_base(version: &str) -> String {
    format!("/services/data/{}/ssot", version)
}
