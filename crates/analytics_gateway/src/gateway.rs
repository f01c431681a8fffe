use std::sync::{Mutex, MutexGuard};

use log::{error, info, warn};
use serde_json::Value;

use crate::client::{AnalyticsClient, CaptureEvent, ClientFactory};
use crate::config::{AnalyticsConfig, PROD_ENVIRONMENT};
use crate::error::AnalyticsError;

enum ClientSlot {
    Uninitialized,
    Ready(Box<dyn AnalyticsClient>),
    Failed,
}

/// Event-tracking gateway. Constructed explicitly with its environment,
/// resolved config, and client factory; the client itself is created lazily
/// on the first event tracked in production. Failures never propagate to
/// callers: initialization failure drops events from then on, capture and
/// flush failures are logged and swallowed.
pub struct AnalyticsGateway {
    environment: String,
    config: Option<AnalyticsConfig>,
    factory: ClientFactory,
    slot: Mutex<ClientSlot>,
}

impl AnalyticsGateway {
    #[must_use]
    pub fn new(
        environment: impl Into<String>,
        config: Option<AnalyticsConfig>,
        factory: ClientFactory,
    ) -> Self {
        Self {
            environment: environment.into(),
            config,
            factory,
            slot: Mutex::new(ClientSlot::Uninitialized),
        }
    }

    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// No-op outside production. In production the first call creates the
    /// client; if that fails the failure is remembered and later events are
    /// dropped without retrying.
    pub fn track_event(&self, event: &str, user_id: &str, properties: Option<Value>) {
        if self.environment != PROD_ENVIRONMENT {
            return;
        }

        let mut slot = lock_unpoisoned(&self.slot);
        if matches!(*slot, ClientSlot::Uninitialized) {
            *slot = match self.initialize_client() {
                Ok(client) => {
                    let env_name = self
                        .config
                        .as_ref()
                        .map(|config| config.env_name.as_str())
                        .unwrap_or_default();
                    info!("analytics client initialized for '{env_name}'");
                    ClientSlot::Ready(client)
                }
                Err(err) => {
                    warn!("failed to initialize analytics client: {err}");
                    ClientSlot::Failed
                }
            };
        }

        if let ClientSlot::Ready(client) = &*slot {
            let capture = CaptureEvent {
                distinct_id: user_id.to_string(),
                event: event.to_string(),
                properties,
            };
            if let Err(err) = client.capture(capture) {
                error!("failed to track event '{event}': {err}");
            }
        }
    }

    /// Best-effort drain of whatever the client has queued. No client (never
    /// initialized, or initialization failed) means nothing to flush.
    pub fn flush(&self) {
        let slot = lock_unpoisoned(&self.slot);
        if let ClientSlot::Ready(client) = &*slot {
            if let Err(err) = client.flush() {
                warn!("failed to flush analytics: {err}");
            }
        }
    }

    fn initialize_client(&self) -> Result<Box<dyn AnalyticsClient>, AnalyticsError> {
        let config = self
            .config
            .as_ref()
            .ok_or(AnalyticsError::IncompleteConfig { missing: "API key" })?;
        (self.factory)(config)
    }
}

pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
