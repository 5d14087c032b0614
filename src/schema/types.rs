use serde_json::{json, Map, Value};

/// Structural schema of a procedure input or output.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String,
    /// Any JSON number.
    Number,
    /// A JSON number without a fractional part.
    Integer,
    Boolean,
    Array(Box<Schema>),
    /// Object with a closed set of fields. Unknown keys are stripped.
    Object(Vec<Field>),
    /// No input at all; accepts anything and yields `{}`.
    Empty,
}

/// Named member of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
    pub required: bool,
}

impl Field {
    pub fn required(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            required: false,
        }
    }
}

impl Schema {
    #[must_use]
    pub fn object(fields: Vec<Field>) -> Self {
        Schema::Object(fields)
    }

    #[must_use]
    pub fn array(items: Schema) -> Self {
        Schema::Array(Box::new(items))
    }

    /// Keep only the named fields of an object schema, in their original order.
    ///
    /// Non-object schemas are returned unchanged.
    #[must_use]
    pub fn pick(&self, names: &[&str]) -> Self {
        match self {
            Schema::Object(fields) => Schema::Object(
                fields
                    .iter()
                    .filter(|f| names.contains(&f.name.as_str()))
                    .cloned()
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Look up a direct field of an object schema.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        match self {
            Schema::Object(fields) => fields.iter().find(|f| f.name == name),
            _ => None,
        }
    }

    /// Short type name used in validation messages and docs.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::String => "string",
            Schema::Number => "number",
            Schema::Integer => "integer",
            Schema::Boolean => "boolean",
            Schema::Array(_) => "array",
            Schema::Object(_) | Schema::Empty => "object",
        }
    }

    /// Convert a raw path/query string to the JSON type declared for `field`.
    ///
    /// Strings that do not parse are returned as JSON strings so that
    /// validation reports the mismatch.
    #[must_use]
    pub fn coerce_param(&self, field: &str, raw: &str) -> Value {
        let target = self.field(field).map(|f| &f.schema);
        match target {
            Some(Schema::Integer) => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(raw.to_string())),
            Some(Schema::Number) => {
                let trimmed = raw.trim();
                match trimmed.parse::<i64>() {
                    Ok(n) => Value::from(n),
                    Err(_) => trimmed
                        .parse::<f64>()
                        .ok()
                        .and_then(serde_json::Number::from_f64)
                        .map(Value::Number)
                        .unwrap_or_else(|| Value::String(raw.to_string())),
                }
            }
            Some(Schema::Boolean) => raw
                .parse::<bool>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(raw.to_string())),
            _ => Value::String(raw.to_string()),
        }
    }

    /// Render as a JSON Schema object for the API description.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        match self {
            Schema::String | Schema::Number | Schema::Integer | Schema::Boolean => {
                json!({ "type": self.type_name() })
            }
            Schema::Array(items) => json!({
                "type": "array",
                "items": items.to_json_schema(),
            }),
            Schema::Object(fields) => {
                let mut properties = Map::new();
                let mut required = Vec::new();
                for field in fields {
                    properties.insert(field.name.clone(), field.schema.to_json_schema());
                    if field.required {
                        required.push(Value::String(field.name.clone()));
                    }
                }
                let mut schema = Map::new();
                schema.insert("type".into(), json!("object"));
                schema.insert("properties".into(), Value::Object(properties));
                if !required.is_empty() {
                    schema.insert("required".into(), Value::Array(required));
                }
                schema.insert("additionalProperties".into(), json!(false));
                Value::Object(schema)
            }
            Schema::Empty => json!({ "type": "object", "additionalProperties": false }),
        }
    }
}
