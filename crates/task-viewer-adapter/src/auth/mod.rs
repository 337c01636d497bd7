/*
[INPUT]:  Client credentials and region endpoint
[OUTPUT]: Bearer access tokens and auth errors
[POS]:    Auth layer - handles workflow API authentication
[UPDATE]: When auth flow or token caching changes
*/

pub mod cache;
pub mod token;

pub use cache::TokenCache;
pub use token::TOKEN_ENDPOINT;
