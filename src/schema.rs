//! Output schema descriptors handed to structured-generation backends.
//!
//! Backends disagree on dialect: Gemini's `responseSchema` wants upper-case
//! type names, while CLI backends get plain JSON Schema pasted into the prompt.

use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaDescriptor {
    String,
    Integer,
    Array(Box<SchemaDescriptor>),
    Object {
        properties: Vec<(String, SchemaDescriptor)>,
        required: Vec<String>,
    },
}

impl SchemaDescriptor {
    pub fn array_of(items: SchemaDescriptor) -> Self {
        SchemaDescriptor::Array(Box::new(items))
    }

    /// Start an object schema; chain `field` / `optional` to add properties.
    pub fn object() -> Self {
        SchemaDescriptor::Object {
            properties: Vec::new(),
            required: Vec::new(),
        }
    }

    /// Add a required property
    pub fn field(self, name: &str, schema: SchemaDescriptor) -> Self {
        self.push_property(name, schema, true)
    }

    /// Add an optional property
    pub fn optional(self, name: &str, schema: SchemaDescriptor) -> Self {
        self.push_property(name, schema, false)
    }

    fn push_property(self, name: &str, schema: SchemaDescriptor, is_required: bool) -> Self {
        match self {
            SchemaDescriptor::Object {
                mut properties,
                mut required,
            } => {
                properties.push((name.to_string(), schema));
                if is_required {
                    required.push(name.to_string());
                }
                SchemaDescriptor::Object {
                    properties,
                    required,
                }
            }
            other => other,
        }
    }

    pub fn required_keys(&self) -> &[String] {
        match self {
            SchemaDescriptor::Object { required, .. } => required,
            _ => &[],
        }
    }

    /// Render in the Gemini `responseSchema` dialect
    pub fn to_gemini(&self) -> Value {
        self.render(|name| name.to_ascii_uppercase())
    }

    /// Render as JSON Schema
    pub fn to_json_schema(&self) -> Value {
        self.render(|name| name.to_string())
    }

    fn render(&self, type_name: fn(&str) -> String) -> Value {
        match self {
            SchemaDescriptor::String => json!({ "type": type_name("string") }),
            SchemaDescriptor::Integer => json!({ "type": type_name("integer") }),
            SchemaDescriptor::Array(items) => json!({
                "type": type_name("array"),
                "items": items.render(type_name),
            }),
            SchemaDescriptor::Object {
                properties,
                required,
            } => {
                let mut props = Map::new();
                for (name, schema) in properties {
                    props.insert(name.clone(), schema.render(type_name));
                }
                let mut obj = Map::new();
                obj.insert("type".to_string(), Value::String(type_name("object")));
                obj.insert("properties".to_string(), Value::Object(props));
                if !required.is_empty() {
                    obj.insert("required".to_string(), json!(required));
                }
                Value::Object(obj)
            }
        }
    }
}
