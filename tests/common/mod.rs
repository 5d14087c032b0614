#![allow(dead_code)]

use pets_api::config::{ApiEnv, ConfigError, Environment};
use pets_api::pets::{app_router, doc_meta, PetStore};
use pets_api::server::{LambdaHandler, TransportEvent, TransportResponse};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Event as delivered behind the reverse proxy, i.e. with `/api-ingest` in front.
pub fn event(method: &str, path: &str) -> TransportEvent {
    TransportEvent::new(method, &format!("/api-ingest{path}"))
}

/// Entry point over a fresh seeded store, plus a handle on that store.
pub fn handler_with_store(environment: Environment) -> (LambdaHandler, Arc<PetStore>) {
    let store = Arc::new(PetStore::seeded());
    let router = app_router(Arc::clone(&store)).unwrap();
    let handler = LambdaHandler::new(router, ApiEnv::new(environment)).with_doc_meta(&doc_meta());
    (handler, store)
}

pub fn handler(environment: Environment) -> LambdaHandler {
    handler_with_store(environment).0
}

pub fn json_body(response: &TransportResponse) -> Value {
    response
        .body_json()
        .unwrap_or_else(|e| panic!("body is not JSON ({e}): {}", response.body))
}

/// Resolve configuration from a fixed set of variables.
pub fn env_from(vars: &[(&str, &str)]) -> Result<ApiEnv, ConfigError> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    ApiEnv::from_lookup(|key| map.get(key).cloned())
}
