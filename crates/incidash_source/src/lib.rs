pub mod config;
pub mod feed;
mod http;
pub mod pagerduty;
pub mod proxy;

pub use http::decode_incidents;
