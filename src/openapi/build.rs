use super::types::{
    ApiDescription, Components, DocMeta, Info, MediaType, Operation, Parameter,
    ParameterLocation, RequestBody, ResponseObject, Server, OPENAPI_VERSION,
};
use crate::router::Router;
use crate::schema::Schema;
use crate::typed::{ProcedureDefinition, ProcedureKind};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::debug;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Name of the shared error envelope schema under `components.schemas`.
pub const ERROR_SCHEMA_NAME: &str = "Error";

/// Derive the API description from the registered procedures.
///
/// Pure: the same router and metadata always yield the same document.
#[must_use]
pub fn describe(router: &Router, meta: &DocMeta) -> ApiDescription {
    let mut paths: BTreeMap<String, BTreeMap<String, Operation>> = BTreeMap::new();
    for procedure in router.procedures() {
        paths
            .entry(procedure.path_pattern.clone())
            .or_default()
            .insert(
                procedure.method.as_str().to_ascii_lowercase(),
                describe_operation(procedure),
            );
    }
    debug!(paths = paths.len(), "API description generated");

    ApiDescription {
        openapi: OPENAPI_VERSION.to_string(),
        info: Info {
            title: meta.title.clone(),
            description: meta.description.clone(),
            version: meta.version.clone(),
        },
        servers: vec![Server {
            url: meta.base_url.clone(),
        }],
        paths,
        components: Components {
            schemas: BTreeMap::from([(ERROR_SCHEMA_NAME.to_string(), error_schema())]),
        },
    }
}

fn describe_operation(procedure: &ProcedureDefinition) -> Operation {
    let placeholders = procedure.path_placeholders();
    let input = &procedure.input_schema;

    let mut parameters: Vec<Parameter> = placeholders
        .iter()
        .filter_map(|name| input.field(name))
        .map(|field| Parameter {
            name: field.name.clone(),
            location: ParameterLocation::Path,
            required: true,
            schema: field.schema.to_json_schema(),
        })
        .collect();

    let mut request_body = None;
    match (procedure.kind, input) {
        (ProcedureKind::Query, Schema::Object(fields)) => {
            parameters.extend(
                fields
                    .iter()
                    .filter(|f| !placeholders.contains(&f.name.as_str()))
                    .map(|field| Parameter {
                        name: field.name.clone(),
                        location: ParameterLocation::Query,
                        required: field.required,
                        schema: field.schema.to_json_schema(),
                    }),
            );
        }
        (ProcedureKind::Query, _) | (ProcedureKind::Mutation, Schema::Empty) => {}
        (ProcedureKind::Mutation, Schema::Object(fields)) => {
            let body_fields: Vec<&str> = fields
                .iter()
                .map(|f| f.name.as_str())
                .filter(|name| !placeholders.contains(name))
                .collect();
            if !body_fields.is_empty() {
                let body_schema = input.pick(&body_fields);
                let required = fields
                    .iter()
                    .any(|f| f.required && body_fields.contains(&f.name.as_str()));
                request_body = Some(json_body(&body_schema, required));
            }
        }
        (ProcedureKind::Mutation, other) => {
            request_body = Some(json_body(other, true));
        }
    }

    let mut responses = BTreeMap::new();
    responses.insert(
        "200".to_string(),
        ResponseObject {
            description: "Successful response".to_string(),
            content: Some(json_content(procedure.output_schema.to_json_schema())),
        },
    );
    responses.insert(
        "default".to_string(),
        ResponseObject {
            description: "Error response".to_string(),
            content: Some(json_content(
                json!({ "$ref": format!("#/components/schemas/{ERROR_SCHEMA_NAME}") }),
            )),
        },
    );

    Operation {
        operation_id: procedure.name.clone(),
        summary: procedure.summary.clone(),
        tags: procedure.tags.clone(),
        parameters,
        request_body,
        responses,
    }
}

fn json_content(schema: Value) -> BTreeMap<String, MediaType> {
    BTreeMap::from([(JSON_CONTENT_TYPE.to_string(), MediaType { schema })])
}

fn json_body(schema: &Schema, required: bool) -> RequestBody {
    RequestBody {
        required,
        content: json_content(schema.to_json_schema()),
    }
}

/// JSON Schema of the error envelope.
fn error_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "code": {
                "type": "string",
                "enum": ["VALIDATION_ERROR", "NOT_FOUND", "INTERNAL_ERROR"]
            },
            "message": { "type": "string" },
            "cause": { "type": "string" },
            "issues": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "path": { "type": "string" },
                        "message": { "type": "string" }
                    },
                    "required": ["path", "message"]
                }
            }
        },
        "required": ["code", "message"]
    })
}
