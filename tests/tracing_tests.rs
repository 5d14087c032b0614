mod common;
mod tracing_util;

use common::{event, handler};
use pets_api::cli::invoke_event;
use pets_api::config::{ApiEnv, Environment};
use pets_api::logging::{LogConfig, RedactionLevel};
use pets_api::pets::lambda_handler;
use serde_json::json;
use tracing_util::TestTracing;

#[test]
fn test_event_and_response_are_logged_with_redaction() {
    let tracing = TestTracing::init();
    let h = handler(Environment::Prod);
    let resp = h.handle(
        event("GET", "/pets/1")
            .with_header("Authorization", "Bearer top-secret")
            .with_header("Cookie", "session=abc"),
    );
    assert_eq!(resp.status_code, 200);

    let logs = tracing.logs.contents();
    assert!(logs.contains("EVENT"));
    assert!(logs.contains("RESPONSE"));
    assert!(logs.contains("[REDACTED]"));
    assert!(!logs.contains("top-secret"));
    assert!(!logs.contains("session=abc"));
}

#[test]
fn test_redaction_can_be_disabled() {
    let tracing = TestTracing::init();
    let h = handler(Environment::Dev).with_redaction(RedactionLevel::None);
    let _ = h.handle(event("GET", "/pets").with_header("Authorization", "Bearer visible"));
    assert!(tracing.logs.contents().contains("Bearer visible"));
}

#[test]
fn test_failures_are_logged() {
    let tracing = TestTracing::init();
    let resp = handler(Environment::Prod).handle(event("GET", "/pets/999"));
    assert_eq!(resp.status_code, 404);
    let logs = tracing.logs.contents();
    assert!(logs.contains("Request rejected"));
    assert!(logs.contains("NOT_FOUND"));
}

#[test]
fn test_redaction_follows_log_config() {
    let tracing = TestTracing::init();
    let env = ApiEnv::new(Environment::Prod);

    let opted_out = LogConfig::from_lookup(Environment::Prod, |key| {
        (key == "PETS_API_LOG_REDACT").then(|| "none".to_string())
    });
    let h = lambda_handler(env, &opted_out).unwrap();
    let _ = h.handle(event("GET", "/pets").with_header("Authorization", "Bearer shown-by-override"));

    let h = lambda_handler(env, &LogConfig::for_environment(Environment::Prod)).unwrap();
    let _ = h.handle(event("GET", "/pets").with_header("Authorization", "Bearer hidden-in-prod"));

    let logs = tracing.logs.contents();
    assert!(logs.contains("shown-by-override"));
    assert!(!logs.contains("hidden-in-prod"));
}

#[test]
fn test_invoke_uses_environment_log_defaults() {
    let tracing = TestTracing::init();
    let raw = json!({
        "rawPath": "/api-ingest/pets",
        "headers": { "authorization": "Bearer dev-token" },
        "requestContext": { "http": { "method": "GET" } }
    })
    .to_string();

    let dev = LogConfig::from_lookup(Environment::Dev, |_| None);
    invoke_event(&raw, ApiEnv::new(Environment::Dev), &dev).unwrap();
    assert!(tracing.logs.contents().contains("dev-token"));

    let prod = LogConfig::from_lookup(Environment::Prod, |_| None);
    let before = tracing.logs.contents().matches("dev-token").count();
    invoke_event(&raw, ApiEnv::new(Environment::Prod), &prod).unwrap();
    assert_eq!(tracing.logs.contents().matches("dev-token").count(), before);
}

#[test]
fn test_platform_request_id_is_logged_with_execution() {
    let tracing = TestTracing::init();
    let mut ev = event("GET", "/pets/2");
    ev.request_context.request_id = Some("c6af9ac6-7b61-11e6-9a41-93e8deadbeef".to_string());
    let resp = handler(Environment::Prod).handle(ev);
    assert_eq!(resp.status_code, 200);

    let logs = tracing.logs.contents();
    let start = logs
        .lines()
        .find(|line| line.contains("Procedure execution start"))
        .unwrap();
    assert!(start.contains("c6af9ac6-7b61-11e6-9a41-93e8deadbeef"));
}
