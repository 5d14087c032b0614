use pets_api::config::{ApiEnv, Environment};
use pets_api::error::{ErrorCode, ProcedureError};
use pets_api::router::Router;
use pets_api::schema::{Field, Schema};
use pets_api::server::{LambdaHandler, TransportEvent};
use pets_api::typed::{Handler, NoInput, ProcedureDefinition, RequestContext};
use serde_json::Value;

struct Faulty;

impl Handler for Faulty {
    type Input = NoInput;
    type Output = Value;

    fn handle(&self, _input: NoInput, _ctx: &RequestContext) -> Result<Value, ProcedureError> {
        Err(ProcedureError::internal("database connection refused"))
    }
}

struct Panicky;

impl Handler for Panicky {
    type Input = NoInput;
    type Output = Value;

    fn handle(&self, _input: NoInput, _ctx: &RequestContext) -> Result<Value, ProcedureError> {
        let items: Vec<u8> = Vec::new();
        Ok(Value::from(items[3]))
    }
}

struct Missing;

impl Handler for Missing {
    type Input = NoInput;
    type Output = Value;

    fn handle(&self, _input: NoInput, _ctx: &RequestContext) -> Result<Value, ProcedureError> {
        Err(ProcedureError::not_found("Owner not found").with_cause("owner table empty"))
    }
}

fn handler(environment: Environment) -> LambdaHandler {
    let router = Router::builder()
        .procedure(ProcedureDefinition::query("faulty", "/faulty", Schema::Empty, Schema::Empty, Faulty))
        .procedure(ProcedureDefinition::query("panicky", "/panicky", Schema::Empty, Schema::Empty, Panicky))
        .procedure(ProcedureDefinition::query(
            "missing",
            "/missing",
            Schema::Empty,
            Schema::object(vec![Field::required("id", Schema::Integer)]),
            Missing,
        ))
        .build()
        .unwrap();
    LambdaHandler::new(router, ApiEnv::new(environment))
}

fn body(h: &LambdaHandler, path: &str) -> (u16, Value) {
    let resp = h.handle(TransportEvent::new("GET", path));
    (resp.status_code, resp.body_json().unwrap())
}

#[test]
fn test_internal_error_hides_cause_in_prod() {
    let (status, body) = body(&handler(Environment::Prod), "/faulty");
    assert_eq!(status, 500);
    assert_eq!(body["code"], ErrorCode::InternalError.as_str());
    assert_eq!(body["message"], "Unexpected Error Occurred");
    assert!(body.get("cause").is_none());
}

#[test]
fn test_internal_error_shows_cause_in_dev() {
    let (status, body) = body(&handler(Environment::Dev), "/faulty");
    assert_eq!(status, 500);
    assert_eq!(body["message"], "Unexpected Error Occurred");
    assert_eq!(body["cause"], "database connection refused");
}

#[test]
fn test_panic_becomes_internal_error() {
    for env in [Environment::Dev, Environment::Prod] {
        let (status, body) = body(&handler(env), "/panicky");
        assert_eq!(status, 500);
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert_eq!(body.get("cause").is_some(), env == Environment::Dev);
    }
}

#[test]
fn test_typed_error_maps_to_its_status() {
    let (status, prod_body) = body(&handler(Environment::Prod), "/missing");
    assert_eq!(status, 404);
    assert_eq!(prod_body, serde_json::json!({"code": "NOT_FOUND", "message": "Owner not found"}));

    let (_, dev_body) = body(&handler(Environment::Dev), "/missing");
    assert_eq!(dev_body["cause"], "owner table empty");
}
