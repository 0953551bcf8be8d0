//! Incrementally built OpenAPI 3.0 document.
//!
//! Each endpoint group appends its own operations while the gateway starts;
//! afterwards the document is served as-is. The builder performs no
//! validation of paths, methods, or schema shapes and has no error path:
//! documenting a route must never stop it from registering.
//!
//! Schema fragments are plain [`serde_json::Value`] trees. Cloning a `Value`
//! is a deep copy, so a fragment derived from a shared base with
//! [`with_properties`] never changes the base.

use std::fmt;

use serde_json::{json, Map, Value};

/// OpenAPI version written at the top of every document.
pub const OPENAPI_VERSION: &str = "3.0.0";

/// Primitive schema types used by the gateway's fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    Integer,
    Number,
    Boolean,
    String,
    Object,
    Array,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::Boolean => "boolean",
            SchemaType::String => "string",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an operation parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

// ---------------------------------------------------------------------------
// Fragment helpers
// ---------------------------------------------------------------------------

/// Build `{"type": "object", "properties": {name: {"type": ty}, ...}}`.
///
/// Properties keep the order given. A repeated name overwrites the earlier
/// entry in place.
pub fn object_schema(properties: &[(&str, SchemaType)]) -> Value {
    let mut props = Map::new();
    for (name, ty) in properties {
        props.insert((*name).to_string(), type_schema(*ty));
    }
    json!({ "type": SchemaType::Object.as_str(), "properties": props })
}

/// Build a bare `{"type": ty}` descriptor.
pub fn type_schema(ty: SchemaType) -> Value {
    json!({ "type": ty.as_str() })
}

/// Schema of a field carrying a [`FlexValue`](crate::FlexValue): any of the
/// four JSON scalar kinds.
pub fn flex_value_schema() -> Value {
    json!({
        "oneOf": [
            type_schema(SchemaType::Integer),
            type_schema(SchemaType::Number),
            type_schema(SchemaType::Boolean),
            type_schema(SchemaType::String),
        ]
    })
}

/// Build `{"type": "array", "items": items}`.
pub fn array_schema(items: Value) -> Value {
    json!({ "type": SchemaType::Array.as_str(), "items": items })
}

/// Copy `base` and add (or replace) the given properties on the copy.
///
/// `base` is left untouched. If `base` has no `properties` object one is
/// created on the copy.
pub fn with_properties(base: &Value, extra: impl IntoIterator<Item = (String, Value)>) -> Value {
    let mut schema = base.clone();
    if let Some(props) = schema
        .as_object_mut()
        .and_then(|root| object_entry(root, "properties"))
    {
        for (name, prop) in extra {
            props.insert(name, prop);
        }
    }
    schema
}

/// Build a single parameter descriptor.
///
/// An empty `description` is omitted rather than written as `""`.
pub fn parameter(
    name: &str,
    location: ParameterLocation,
    required: bool,
    ty: SchemaType,
    description: &str,
) -> Value {
    let mut param = Map::new();
    param.insert("name".into(), Value::from(name));
    param.insert("in".into(), Value::from(location.as_str()));
    param.insert("required".into(), Value::Bool(required));
    param.insert("schema".into(), type_schema(ty));
    if !description.is_empty() {
        param.insert("description".into(), Value::from(description));
    }
    Value::Object(param)
}

/// A response entry carrying a JSON body described by `schema`.
pub fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

/// A response entry with no body.
pub fn empty_response(description: &str) -> Value {
    json!({ "description": description })
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// Description of one (path, method) pair, handed to
/// [`SchemaDocument::add_endpoint`].
#[derive(Debug, Clone, Default)]
pub struct Operation {
    summary: String,
    parameters: Vec<Value>,
    request_body: Option<Value>,
    responses: Option<Map<String, Value>>,
}

impl Operation {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Self::default()
        }
    }

    /// Append a parameter built with [`parameter`].
    pub fn parameter(mut self, param: Value) -> Self {
        self.parameters.push(param);
        self
    }

    /// Set the JSON request body schema.
    pub fn request_body(mut self, schema: Value) -> Self {
        self.request_body = Some(schema);
        self
    }

    /// Add a response entry keyed by status code.
    pub fn response(mut self, status: u16, response: Value) -> Self {
        self.responses
            .get_or_insert_with(Map::new)
            .insert(status.to_string(), response);
        self
    }

    fn into_value(self) -> Value {
        let mut op = Map::new();
        op.insert("summary".into(), Value::String(self.summary));
        if !self.parameters.is_empty() {
            op.insert("parameters".into(), Value::Array(self.parameters));
        }
        if let Some(schema) = self.request_body {
            op.insert(
                "requestBody".into(),
                json!({ "content": { "application/json": { "schema": schema } } }),
            );
        }
        if let Some(responses) = self.responses {
            op.insert("responses".into(), Value::Object(responses));
        }
        Value::Object(op)
    }
}

// ---------------------------------------------------------------------------
// SchemaDocument
// ---------------------------------------------------------------------------

/// The gateway's API description.
///
/// Top-level keys are fixed: `openapi`, `info`, `servers`, `paths`. Paths
/// keep registration order.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    root: Map<String, Value>,
}

impl SchemaDocument {
    /// Create a document with the given metadata, no servers, and no paths.
    pub fn new(title: &str, version: &str) -> Self {
        let mut root = Map::new();
        root.insert("openapi".into(), Value::from(OPENAPI_VERSION));
        root.insert("info".into(), json!({ "title": title, "version": version }));
        root.insert("servers".into(), Value::Array(Vec::new()));
        root.insert("paths".into(), Value::Object(Map::new()));
        Self { root }
    }

    /// Insert the operation at `(path, method)`, replacing any operation
    /// already there. `method` is lowercased.
    ///
    /// A replaced operation is swapped out whole; its old sub-fields are not
    /// merged into the new one.
    pub fn add_endpoint(&mut self, path: &str, method: &str, operation: Operation) {
        let method = method.to_ascii_lowercase();
        if let Some(item) =
            object_entry(&mut self.root, "paths").and_then(|paths| object_entry(paths, path))
        {
            item.insert(method, operation.into_value());
        }
    }

    /// Point the first server entry at `url`, creating it if needed. Later
    /// entries are left alone. Last call wins.
    pub fn set_server_url(&mut self, url: &str) {
        let servers = self
            .root
            .entry("servers")
            .or_insert_with(|| Value::Array(Vec::new()));
        if !servers.is_array() {
            *servers = Value::Array(Vec::new());
        }
        if let Value::Array(list) = servers {
            match list.first_mut() {
                Some(Value::Object(first)) => {
                    first.insert("url".into(), Value::from(url));
                }
                Some(other) => *other = json!({ "url": url }),
                None => list.push(json!({ "url": url })),
            }
        }
    }

    /// A copy of the document with the first server URL set to `url`.
    ///
    /// Leaves `self` unchanged, so a shared document can be served to
    /// concurrent requests that each see their own host.
    pub fn with_server_url(&self, url: &str) -> Value {
        let mut copy = self.clone();
        copy.set_server_url(url);
        copy.into_value()
    }

    /// Borrow the operation registered at `(path, method)`, if any.
    pub fn operation(&self, path: &str, method: &str) -> Option<&Value> {
        self.root
            .get("paths")?
            .get(path)?
            .get(method.to_ascii_lowercase())
    }

    /// Registered paths in registration order.
    pub fn paths(&self) -> Vec<&str> {
        match self.root.get("paths") {
            Some(Value::Object(paths)) => paths.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// A snapshot of the whole document.
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

/// The object stored under `key`, created (or replacing a non-object) as
/// needed. Always `Some` in practice.
fn object_entry<'a>(
    root: &'a mut Map<String, Value>,
    key: &str,
) -> Option<&'a mut Map<String, Value>> {
    let slot = root
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    slot.as_object_mut()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> SchemaDocument {
        SchemaDocument::new("Flow Engine API", "1.0.0")
    }

    #[test]
    fn new_document_has_fixed_top_level_keys() {
        let v = doc().into_value();
        let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["openapi", "info", "servers", "paths"]);
        assert_eq!(v["openapi"], "3.0.0");
        assert_eq!(v["info"]["title"], "Flow Engine API");
        assert_eq!(v["servers"], json!([]));
        assert_eq!(v["paths"], json!({}));
    }

    #[test]
    fn object_schema_preserves_order_and_is_idempotent() {
        let props = [
            ("nodeId", SchemaType::Integer),
            ("packageId", SchemaType::Integer),
            ("name", SchemaType::String),
        ];
        let a = object_schema(&props);
        let b = object_schema(&props);
        assert_eq!(a, b);
        let keys: Vec<_> = a["properties"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["nodeId", "packageId", "name"]);
        assert_eq!(a["type"], "object");
        assert_eq!(a["properties"]["name"], json!({"type": "string"}));
    }

    #[test]
    fn object_schema_duplicate_name_overwrites() {
        let s = object_schema(&[("x", SchemaType::Integer), ("x", SchemaType::String)]);
        assert_eq!(s["properties"].as_object().unwrap().len(), 1);
        assert_eq!(s["properties"]["x"]["type"], "string");
    }

    #[test]
    fn with_properties_never_alters_base() {
        let base = object_schema(&[("name", SchemaType::String)]);
        let snapshot = base.clone();
        let extended = with_properties(
            &base,
            [("duration".to_string(), type_schema(SchemaType::Integer))],
        );
        assert_eq!(base, snapshot);
        assert!(extended["properties"].get("duration").is_some());
        assert!(base["properties"].get("duration").is_none());
    }

    #[test]
    fn parameter_omits_empty_description() {
        let p = parameter("id", ParameterLocation::Path, true, SchemaType::Integer, "");
        assert!(p.get("description").is_none());
        assert_eq!(p["in"], "path");
        assert_eq!(p["required"], true);
        assert_eq!(p["schema"]["type"], "integer");

        let p = parameter("q", ParameterLocation::Query, false, SchemaType::String, "Filter");
        assert_eq!(p["description"], "Filter");
    }

    #[test]
    fn add_endpoint_lowercases_method_and_skips_absent_parts() {
        let mut d = doc();
        d.add_endpoint("/api/flow", "GET", Operation::new("Get flow"));
        let op = d.operation("/api/flow", "get").unwrap();
        assert_eq!(op, &json!({ "summary": "Get flow" }));
    }

    #[test]
    fn add_endpoint_wraps_request_body_and_keeps_parameters_in_order() {
        let mut d = doc();
        let op = Operation::new("Set default")
            .parameter(parameter("a", ParameterLocation::Path, true, SchemaType::Integer, ""))
            .parameter(parameter("b", ParameterLocation::Query, false, SchemaType::String, ""))
            .request_body(object_schema(&[("name", SchemaType::String)]))
            .response(200, empty_response("ok"));
        d.add_endpoint("/x/{a}", "Put", op);
        let op = d.operation("/x/{a}", "PUT").unwrap();
        assert_eq!(op["parameters"][0]["name"], "a");
        assert_eq!(op["parameters"][1]["name"], "b");
        assert_eq!(
            op["requestBody"]["content"]["application/json"]["schema"]["properties"]["name"]["type"],
            "string"
        );
        assert_eq!(op["responses"]["200"]["description"], "ok");
    }

    #[test]
    fn add_endpoint_twice_replaces_whole_operation() {
        let mut d = doc();
        d.add_endpoint(
            "/api/nodes",
            "post",
            Operation::new("first")
                .request_body(object_schema(&[("a", SchemaType::Integer)]))
                .response(200, empty_response("one")),
        );
        d.add_endpoint("/api/nodes", "POST", Operation::new("second"));
        let v = d.to_value();
        let item = v["paths"]["/api/nodes"].as_object().unwrap();
        assert_eq!(item.len(), 1);
        assert_eq!(item["post"], json!({ "summary": "second" }));
    }

    #[test]
    fn methods_on_same_path_share_one_path_item() {
        let mut d = doc();
        d.add_endpoint("/api/nodes", "get", Operation::new("list"));
        d.add_endpoint("/api/nodes", "post", Operation::new("add"));
        d.add_endpoint("/api/edges", "post", Operation::new("edge"));
        assert_eq!(d.paths(), ["/api/nodes", "/api/edges"]);
        let v = d.to_value();
        assert_eq!(v["paths"]["/api/nodes"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn set_server_url_replaces_first_entry_only() {
        let mut d = doc();
        d.set_server_url("http://a");
        d.set_server_url("http://b");
        let v = d.to_value();
        assert_eq!(v["servers"], json!([{ "url": "http://b" }]));
    }

    #[test]
    fn with_server_url_leaves_shared_document_untouched() {
        let mut d = doc();
        d.add_endpoint("/api/flow", "get", Operation::new("flow"));
        let served = d.with_server_url("http://example.com");
        assert_eq!(served["servers"][0]["url"], "http://example.com");
        assert_eq!(d.to_value()["servers"], json!([]));
        assert_eq!(served["paths"], d.to_value()["paths"]);
    }

    #[test]
    fn flex_value_schema_lists_four_scalars() {
        let s = flex_value_schema();
        let kinds: Vec<_> = s["oneOf"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["type"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(kinds, ["integer", "number", "boolean", "string"]);
    }

    #[test]
    fn malformed_slots_are_replaced_with_objects() {
        let mut d = doc();
        d.root.insert("paths".into(), json!("not an object"));
        d.add_endpoint("/api/flow", "GET", Operation::new("flow"));
        assert_eq!(d.paths(), ["/api/flow"]);

        d.root.insert("paths".into(), json!({ "/api/flow": 7 }));
        d.add_endpoint("/api/flow", "GET", Operation::new("again"));
        assert_eq!(d.operation("/api/flow", "get").unwrap()["summary"], "again");

        let base = json!({ "type": "object", "properties": [1, 2] });
        let extended = with_properties(&base, [("x".to_string(), json!({"type": "string"}))]);
        assert_eq!(extended["properties"], json!({ "x": { "type": "string" } }));

        // A non-object base has nowhere to put properties and is returned as is.
        assert_eq!(with_properties(&json!(true), Vec::new()), json!(true));
    }
}
