use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use analytics_gateway::{
    AnalyticsClient, AnalyticsConfig, AnalyticsError, AnalyticsGateway, CaptureEvent,
    ClientFactory,
};
use pretty_assertions::assert_eq;
use serde_json::json;

struct RecordingClient {
    captured: Arc<Mutex<Vec<CaptureEvent>>>,
    flushes: Arc<AtomicUsize>,
    fail_capture: bool,
    fail_flush: bool,
}

impl AnalyticsClient for RecordingClient {
    fn capture(&self, event: CaptureEvent) -> Result<(), AnalyticsError> {
        if self.fail_capture {
            return Err(AnalyticsError::client("capture refused"));
        }
        self.captured.lock().expect("captures lock").push(event);
        Ok(())
    }

    fn flush(&self) -> Result<(), AnalyticsError> {
        if self.fail_flush {
            return Err(AnalyticsError::client("flush refused"));
        }
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct Harness {
    captured: Arc<Mutex<Vec<CaptureEvent>>>,
    flushes: Arc<AtomicUsize>,
    factory_calls: Arc<AtomicUsize>,
}

impl Harness {
    fn captured(&self) -> Vec<CaptureEvent> {
        self.captured.lock().expect("captures lock").clone()
    }

    fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    fn factory_calls(&self) -> usize {
        self.factory_calls.load(Ordering::SeqCst)
    }
}

fn recording_factory(fail_capture: bool, fail_flush: bool) -> (ClientFactory, Harness) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let flushes = Arc::new(AtomicUsize::new(0));
    let factory_calls = Arc::new(AtomicUsize::new(0));

    let harness = Harness {
        captured: Arc::clone(&captured),
        flushes: Arc::clone(&flushes),
        factory_calls: Arc::clone(&factory_calls),
    };

    let factory: ClientFactory = Box::new(move |_config| {
        factory_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RecordingClient {
            captured: Arc::clone(&captured),
            flushes: Arc::clone(&flushes),
            fail_capture,
            fail_flush,
        }) as Box<dyn AnalyticsClient>)
    });

    (factory, harness)
}

fn failing_factory() -> (ClientFactory, Arc<AtomicUsize>) {
    let factory_calls = Arc::new(AtomicUsize::new(0));
    let calls = Arc::clone(&factory_calls);
    let factory: ClientFactory = Box::new(move |_config| {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(AnalyticsError::client("factory refused"))
    });
    (factory, factory_calls)
}

fn prod_config() -> AnalyticsConfig {
    AnalyticsConfig {
        api_key: "phc_test".to_string(),
        host_url: "https://us.i.posthog.com".to_string(),
        env_name: "prod".to_string(),
    }
}

#[test]
fn events_outside_prod_never_initialize_a_client() {
    let (factory, harness) = recording_factory(false, false);
    let gateway = AnalyticsGateway::new("dev", Some(prod_config()), factory);

    gateway.track_event("cli.start", "user-1", None);
    gateway.track_event("cli.start", "user-1", None);

    assert_eq!(harness.factory_calls(), 0);
    assert_eq!(harness.captured(), vec![]);
}

#[test]
fn prod_initializes_lazily_and_captures_every_event() {
    let (factory, harness) = recording_factory(false, false);
    let gateway = AnalyticsGateway::new("prod", Some(prod_config()), factory);

    assert_eq!(harness.factory_calls(), 0);

    gateway.track_event("cli.start", "user-1", Some(json!({ "mode": "FAST" })));
    gateway.track_event("cli.login", "user-1", None);

    assert_eq!(harness.factory_calls(), 1);
    let captured = harness.captured();
    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0].distinct_id, "user-1");
    assert_eq!(captured[0].event, "cli.start");
    assert_eq!(captured[0].properties, Some(json!({ "mode": "FAST" })));
    assert_eq!(captured[1].event, "cli.login");
}

#[test]
fn missing_config_drops_events_before_reaching_the_factory() {
    let (factory, harness) = recording_factory(false, false);
    let gateway = AnalyticsGateway::new("prod", None, factory);

    gateway.track_event("cli.start", "user-1", None);
    gateway.track_event("cli.start", "user-1", None);

    assert_eq!(harness.factory_calls(), 0);
    assert_eq!(harness.captured(), vec![]);
}

#[test]
fn factory_failure_is_latched_and_never_retried() {
    let (factory, factory_calls) = failing_factory();
    let gateway = AnalyticsGateway::new("prod", Some(prod_config()), factory);

    gateway.track_event("cli.start", "user-1", None);
    gateway.track_event("cli.start", "user-1", None);
    gateway.track_event("cli.start", "user-1", None);

    assert_eq!(factory_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn capture_errors_are_swallowed_and_the_client_is_kept() {
    let (factory, harness) = recording_factory(true, false);
    let gateway = AnalyticsGateway::new("prod", Some(prod_config()), factory);

    gateway.track_event("cli.start", "user-1", None);
    gateway.track_event("cli.start", "user-1", None);

    assert_eq!(harness.factory_calls(), 1);
    assert_eq!(harness.captured(), vec![]);
}

#[test]
fn flush_without_a_client_is_a_no_op() {
    let (factory, harness) = recording_factory(false, false);
    let gateway = AnalyticsGateway::new("prod", Some(prod_config()), factory);

    gateway.flush();

    assert_eq!(harness.factory_calls(), 0);
    assert_eq!(harness.flushes(), 0);
}

#[test]
fn flush_reaches_the_client_and_errors_are_swallowed() {
    let (factory, harness) = recording_factory(false, false);
    let gateway = AnalyticsGateway::new("prod", Some(prod_config()), factory);
    gateway.track_event("cli.start", "user-1", None);
    gateway.flush();
    assert_eq!(harness.flushes(), 1);

    let (failing_flush_factory, harness) = recording_factory(false, true);
    let gateway = AnalyticsGateway::new("prod", Some(prod_config()), failing_flush_factory);
    gateway.track_event("cli.start", "user-1", None);
    gateway.flush();
    assert_eq!(harness.flushes(), 0);
}

#[test]
fn global_wrapper_routes_through_the_configured_gateway() {
    analytics_gateway::reset_global_for_tests();

    let (factory, harness) = recording_factory(false, false);
    analytics_gateway::configure_global(AnalyticsGateway::new("prod", Some(prod_config()), factory));

    analytics_gateway::track_event("cli.start", "user-1", Some(json!({ "source": "global" })));
    analytics_gateway::flush_analytics();

    assert_eq!(harness.captured().len(), 1);
    assert_eq!(harness.flushes(), 1);

    analytics_gateway::reset_global_for_tests();
}
