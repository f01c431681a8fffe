mod client;
mod config;
mod error;
mod gateway;
mod global;
mod http;

pub use client::{AnalyticsClient, CaptureEvent, ClientFactory};
pub use config::{
    AnalyticsConfig, API_KEY_ENV_VAR, DEFAULT_HOST_URL, ENVIRONMENT_ENV_VAR, HOST_ENV_VAR,
    PROD_ENVIRONMENT,
};
pub use error::AnalyticsError;
pub use gateway::AnalyticsGateway;
pub use global::{configure_global, flush_analytics, reset_global_for_tests, track_event};
pub use http::HttpAnalyticsClient;
