/*
[INPUT]:  HTTP client configuration, filter state and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod outcome;
pub mod query;
pub mod tasks;

pub use error::{Result, TaskViewerError};
pub use query::{FilterState, build_query, build_query_with_cache_buster};
pub use tasks::{TASKS_ENDPOINT, parse_tasks_body};

pub use client::{ClientConfig, Credentials, TaskApiClient};
