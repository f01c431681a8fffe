//! Optional process-wide gateway for call sites without access to an
//! explicitly constructed [`AnalyticsGateway`]. Built lazily from the
//! process environment on first use; `configure_global` installs a
//! specific gateway instead.

use std::sync::Mutex;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::config::{AnalyticsConfig, ENVIRONMENT_ENV_VAR};
use crate::gateway::{lock_unpoisoned, AnalyticsGateway};
use crate::http::HttpAnalyticsClient;

static GLOBAL_GATEWAY: Lazy<Mutex<Option<AnalyticsGateway>>> = Lazy::new(|| Mutex::new(None));

pub fn configure_global(gateway: AnalyticsGateway) {
    let mut slot = lock_unpoisoned(&GLOBAL_GATEWAY);
    *slot = Some(gateway);
}

pub fn track_event(event: &str, user_id: &str, properties: Option<Value>) {
    let mut slot = lock_unpoisoned(&GLOBAL_GATEWAY);
    slot.get_or_insert_with(gateway_from_process_env)
        .track_event(event, user_id, properties);
}

pub fn flush_analytics() {
    let slot = lock_unpoisoned(&GLOBAL_GATEWAY);
    if let Some(gateway) = slot.as_ref() {
        gateway.flush();
    }
}

/// Clears the installed gateway so each test starts from a blank slate.
pub fn reset_global_for_tests() {
    let mut slot = lock_unpoisoned(&GLOBAL_GATEWAY);
    *slot = None;
}

fn gateway_from_process_env() -> AnalyticsGateway {
    let environment = std::env::var(ENVIRONMENT_ENV_VAR).unwrap_or_default();
    AnalyticsGateway::new(
        environment,
        AnalyticsConfig::from_env(),
        HttpAnalyticsClient::factory(),
    )
}
