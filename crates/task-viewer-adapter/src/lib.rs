/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public workflow task API adapter surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{TOKEN_ENDPOINT, TokenCache};

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    Credentials,
    FilterState,
    Result,
    TASKS_ENDPOINT,
    TaskApiClient,
    TaskViewerError,
    build_query,
    build_query_with_cache_buster,
    parse_tasks_body,
};
pub use http::outcome::outcome_endpoint;

// Re-export all types
pub use types::*;
