use pets_api::cli::{invoke_event, render_description, write_description, DescriptionFormat};
use pets_api::config::{ApiEnv, Environment};
use pets_api::logging::LogConfig;
use pets_api::openapi::ApiDescription;
use serde_json::{json, Value};

#[test]
fn test_writes_yaml_description_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("openapi.yaml");
    write_description(DescriptionFormat::Yaml, Some(&path)).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    let description: ApiDescription = serde_yaml::from_str(&written).unwrap();
    assert_eq!(description.info.title, "Pets API");
    assert_eq!(description.paths.len(), 2);
}

#[test]
fn test_json_and_yaml_describe_the_same_api() {
    let from_json: ApiDescription =
        serde_json::from_str(&render_description(DescriptionFormat::Json).unwrap()).unwrap();
    let from_yaml: ApiDescription =
        serde_yaml::from_str(&render_description(DescriptionFormat::Yaml).unwrap()).unwrap();
    assert_eq!(from_json, from_yaml);
}

#[test]
fn test_description_output_is_stable() {
    assert_eq!(
        render_description(DescriptionFormat::Json).unwrap(),
        render_description(DescriptionFormat::Json).unwrap()
    );
}

#[test]
fn test_invoke_event_runs_entry_point() {
    let raw = json!({
        "rawPath": "/api-ingest/pets/4",
        "requestContext": { "http": { "method": "GET" } }
    });
    let log_config = LogConfig::for_environment(Environment::Prod);
    let out: Value = serde_json::from_str(
        &invoke_event(&raw.to_string(), ApiEnv::new(Environment::Prod), &log_config).unwrap(),
    )
    .unwrap();
    assert_eq!(out["statusCode"], 200);
    let body: Value = serde_json::from_str(out["body"].as_str().unwrap()).unwrap();
    assert_eq!(body["name"], "Toothless");
}
