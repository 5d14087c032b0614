//! # OpenAPI Module
//!
//! Generates the machine-readable API description from the router and the
//! HTML page served at `/docs`.
//!
//! Every registered procedure becomes one operation under its path pattern
//! and lowercase method, with `operationId` set to the procedure name.
//! Placeholders become `in: path` parameters; the remaining input fields of a
//! query become `in: query` parameters, and those of a mutation become the
//! JSON request body. Each operation documents a `200` response with the
//! output schema and a `default` response referencing the shared error
//! envelope.

mod build;
mod page;
mod types;

pub use build::{describe, ERROR_SCHEMA_NAME};
pub use page::{extract_embedded_description, render_docs_page, DocsError, SWAGGER_UI_BASE};
pub use types::{
    ApiDescription, Components, DocMeta, Info, MediaType, Operation, Parameter,
    ParameterLocation, RequestBody, ResponseObject, Server, OPENAPI_VERSION,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pets::{app_router, doc_meta, PetStore};
    use crate::router::Router;
    use crate::schema::{Field, Schema};
    use crate::error::ProcedureError;
    use crate::typed::{Handler, ProcedureDefinition, RequestContext};
    use serde_json::{json, Value};
    use std::sync::Arc;

    struct Echo;

    impl Handler for Echo {
        type Input = Value;
        type Output = Value;

        fn handle(&self, input: Value, _ctx: &RequestContext) -> Result<Value, ProcedureError> {
            Ok(input)
        }
    }

    fn pets_description() -> ApiDescription {
        let router = app_router(Arc::new(PetStore::seeded())).unwrap();
        describe(&router, &doc_meta())
    }

    #[test]
    fn test_info_and_servers() {
        let d = pets_description();
        assert_eq!(d.openapi, OPENAPI_VERSION);
        assert_eq!(d.info.title, "Pets API");
        assert_eq!(d.info.description, "Pets API");
        assert_eq!(d.info.version, "-");
        assert_eq!(d.servers[0].url, "-");
        assert!(d.components.schemas.contains_key(ERROR_SCHEMA_NAME));
    }

    #[test]
    fn test_every_procedure_is_described() {
        let d = pets_description();
        assert_eq!(d.operation("/pets", "GET").unwrap().operation_id, "petGetAll");
        assert_eq!(d.operation("/pets", "post").unwrap().operation_id, "petCreate");
        assert_eq!(
            d.operation("/pets/{pet_id}", "get").unwrap().operation_id,
            "petGet"
        );
        let count: usize = d.paths.values().map(|item| item.len()).sum();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_path_parameter_and_schemas() {
        let d = pets_description();
        let op = d.operation("/pets/{pet_id}", "get").unwrap();
        assert_eq!(op.parameters.len(), 1);
        let p = &op.parameters[0];
        assert_eq!(p.name, "pet_id");
        assert_eq!(p.location, ParameterLocation::Path);
        assert!(p.required);
        assert_eq!(p.schema, json!({"type": "number"}));
        assert!(op.request_body.is_none());

        let ok = &op.responses["200"];
        let schema = &ok.content.as_ref().unwrap()["application/json"].schema;
        assert_eq!(schema["required"], json!(["id", "type", "name"]));
        let err = &op.responses["default"];
        assert_eq!(
            err.content.as_ref().unwrap()["application/json"].schema,
            json!({"$ref": "#/components/schemas/Error"})
        );
    }

    #[test]
    fn test_mutation_request_body() {
        let d = pets_description();
        let op = d.operation("/pets", "post").unwrap();
        assert!(op.parameters.is_empty());
        let body = op.request_body.as_ref().unwrap();
        assert!(body.required);
        let schema = &body.content["application/json"].schema;
        assert_eq!(schema["required"], json!(["type", "name"]));
        assert!(schema["properties"].get("id").is_none());
    }

    #[test]
    fn test_query_fields_become_query_parameters() {
        let router = Router::builder()
            .procedure(ProcedureDefinition::query(
                "search",
                "/search",
                Schema::object(vec![
                    Field::required("q", Schema::String),
                    Field::optional("limit", Schema::Integer),
                ]),
                Schema::Empty,
                Echo,
            ))
            .build()
            .unwrap();
        let d = describe(&router, &doc_meta());
        let params = &d.operation("/search", "get").unwrap().parameters;
        assert_eq!(params.len(), 2);
        assert!(params.iter().all(|p| p.location == ParameterLocation::Query));
        assert!(params[0].required);
        assert!(!params[1].required);
    }

    #[test]
    fn test_description_is_deterministic_and_renders_yaml() {
        assert_eq!(pets_description().to_json().unwrap(), pets_description().to_json().unwrap());
        let yaml = pets_description().to_yaml().unwrap();
        assert!(yaml.contains("operationId: petGet"));
        let back: ApiDescription = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, pets_description());
    }

    #[test]
    fn test_docs_page_embeds_description() {
        let d = pets_description();
        let page = render_docs_page(&d).unwrap();
        assert!(page.contains("<title>Pets API</title>"));
        assert!(page.contains("https://unpkg.com/swagger-ui-dist@3/swagger-ui-bundle.js"));
        assert!(page.contains("https://unpkg.com/swagger-ui-dist@3/swagger-ui.css"));
        let embedded = extract_embedded_description(&page).unwrap();
        let parsed: ApiDescription = serde_json::from_str(&embedded).unwrap();
        assert_eq!(parsed, d);
    }

    #[test]
    fn test_docs_page_escapes_script_terminators() {
        let mut d = pets_description();
        d.info.title = "</script><b>".to_string();
        d.info.description = "</script>".to_string();
        let page = render_docs_page(&d).unwrap();
        assert_eq!(page.matches("</script>").count(), 3);
        assert!(page.contains("<title>&lt;"));
        assert!(!page.contains("<title></script>"));
        let parsed: ApiDescription =
            serde_json::from_str(&extract_embedded_description(&page).unwrap()).unwrap();
        assert_eq!(parsed.info.description, "</script>");
    }
}
