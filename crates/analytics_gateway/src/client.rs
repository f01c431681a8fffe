use serde::Serialize;
use serde_json::Value;

use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;

/// One tracked event, addressed to a distinct user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureEvent {
    pub distinct_id: String,
    pub event: String,
    pub properties: Option<Value>,
}

/// Seam for the delivery client. Batching and retry policy live behind this
/// trait; the gateway itself buffers nothing.
pub trait AnalyticsClient: Send {
    fn capture(&self, event: CaptureEvent) -> Result<(), AnalyticsError>;
    fn flush(&self) -> Result<(), AnalyticsError>;
}

/// Builds a client from a resolved config. Injected so tests can substitute
/// recording fakes for the HTTP client.
pub type ClientFactory =
    Box<dyn Fn(&AnalyticsConfig) -> Result<Box<dyn AnalyticsClient>, AnalyticsError> + Send + Sync>;
