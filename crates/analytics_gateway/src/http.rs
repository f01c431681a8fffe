use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::error;
use serde_json::json;

use crate::client::{AnalyticsClient, CaptureEvent, ClientFactory};
use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

enum WorkerMessage {
    Capture(CaptureEvent),
    Flush(mpsc::Sender<()>),
}

/// Default delivery client: posts each capture to the ingestion endpoint from
/// a dedicated worker thread, so `capture` never blocks the caller. `flush`
/// waits until everything queued ahead of it has been sent.
pub struct HttpAnalyticsClient {
    sender: Option<mpsc::Sender<WorkerMessage>>,
    worker: Option<JoinHandle<()>>,
}

impl HttpAnalyticsClient {
    pub fn new(config: &AnalyticsConfig) -> Result<Self, AnalyticsError> {
        if config.api_key.trim().is_empty() {
            return Err(AnalyticsError::IncompleteConfig { missing: "API key" });
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| AnalyticsError::HttpClient { source })?;
        let endpoint = capture_endpoint(&config.host_url);
        let api_key = config.api_key.clone();

        let (sender, receiver) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("analytics-capture".to_string())
            .spawn(move || run_worker(&receiver, &http, &endpoint, &api_key))
            .map_err(|source| AnalyticsError::WorkerSpawn { source })?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// Factory wiring `new` into the gateway's injection seam.
    #[must_use]
    pub fn factory() -> ClientFactory {
        Box::new(|config| {
            HttpAnalyticsClient::new(config)
                .map(|client| Box::new(client) as Box<dyn AnalyticsClient>)
        })
    }

    fn send(&self, message: WorkerMessage) -> Result<(), AnalyticsError> {
        self.sender
            .as_ref()
            .ok_or(AnalyticsError::WorkerGone)?
            .send(message)
            .map_err(|_| AnalyticsError::WorkerGone)
    }
}

impl AnalyticsClient for HttpAnalyticsClient {
    fn capture(&self, event: CaptureEvent) -> Result<(), AnalyticsError> {
        self.send(WorkerMessage::Capture(event))
    }

    fn flush(&self) -> Result<(), AnalyticsError> {
        let (ack_sender, ack_receiver) = mpsc::channel();
        self.send(WorkerMessage::Flush(ack_sender))?;
        ack_receiver.recv().map_err(|_| AnalyticsError::WorkerGone)
    }
}

impl Drop for HttpAnalyticsClient {
    fn drop(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_worker(
    receiver: &mpsc::Receiver<WorkerMessage>,
    http: &reqwest::blocking::Client,
    endpoint: &str,
    api_key: &str,
) {
    while let Ok(message) = receiver.recv() {
        match message {
            WorkerMessage::Capture(event) => deliver(http, endpoint, api_key, event),
            WorkerMessage::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
}

fn deliver(http: &reqwest::blocking::Client, endpoint: &str, api_key: &str, event: CaptureEvent) {
    let payload = json!({
        "api_key": api_key,
        "event": event.event,
        "distinct_id": event.distinct_id,
        "properties": event.properties.unwrap_or_else(|| json!({})),
    });

    let result = http
        .post(endpoint)
        .json(&payload)
        .send()
        .and_then(|response| response.error_for_status());
    if let Err(err) = result {
        error!("failed to deliver analytics event: {err}");
    }
}

fn capture_endpoint(host_url: &str) -> String {
    format!("{}/capture/", host_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_endpoint_normalizes_trailing_slashes() {
        assert_eq!(
            capture_endpoint("https://us.i.posthog.com"),
            "https://us.i.posthog.com/capture/"
        );
        assert_eq!(
            capture_endpoint("https://us.i.posthog.com/"),
            "https://us.i.posthog.com/capture/"
        );
    }

    #[test]
    fn new_rejects_blank_api_key() {
        let config = AnalyticsConfig {
            api_key: "  ".to_string(),
            host_url: "https://us.i.posthog.com".to_string(),
            env_name: "prod".to_string(),
        };

        let err = HttpAnalyticsClient::new(&config).err().expect("must fail");
        assert!(matches!(
            err,
            AnalyticsError::IncompleteConfig { missing: "API key" }
        ));
    }

    #[test]
    fn flush_drains_ahead_of_returning() {
        let config = AnalyticsConfig {
            api_key: "phc_test".to_string(),
            // Not a parseable URL, so delivery fails fast and is logged.
            host_url: "::not-a-host::".to_string(),
            env_name: "prod".to_string(),
        };

        let client = HttpAnalyticsClient::new(&config).expect("client should build");
        client
            .capture(CaptureEvent {
                distinct_id: "user-1".to_string(),
                event: "cli.start".to_string(),
                properties: None,
            })
            .expect("capture should enqueue");
        client.flush().expect("flush should drain the queue");
    }
}
