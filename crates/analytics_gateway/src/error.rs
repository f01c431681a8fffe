use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("analytics configuration is incomplete: missing {missing}")]
    IncompleteConfig { missing: &'static str },

    #[error("analytics worker is no longer running")]
    WorkerGone,

    #[error("failed to spawn analytics worker: {source}")]
    WorkerSpawn {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build analytics HTTP client: {source}")]
    HttpClient {
        #[source]
        source: reqwest::Error,
    },

    #[error("{0}")]
    Client(String),
}

impl AnalyticsError {
    #[must_use]
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client(message.into())
    }
}
