//! Core marshaling and API-description logic for the flow engine gateway.
//!
//! The gateway sits between REST/JSON callers and a graph-execution engine
//! that speaks a typed RPC protocol. This crate holds the two pieces of that
//! translation that have no I/O of their own.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`value`] | [`FlexValue`], the engine's dynamic scalar, and its JSON codec |
//! | [`openapi`] | [`SchemaDocument`], the incrementally built OpenAPI document, and fragment helpers |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use flowgate::{DoubleFormat, FlexValue};
//! use flowgate::openapi::{object_schema, Operation, SchemaDocument, SchemaType};
//!
//! let v = FlexValue::from_json(&serde_json::json!(3.5));
//! assert_eq!(v, Some(FlexValue::Double(3.5)));
//!
//! let mut doc = SchemaDocument::new("Flow Engine API", "1.0.0");
//! doc.add_endpoint(
//!     "/api/edges",
//!     "POST",
//!     Operation::new("Add a new edge")
//!         .request_body(object_schema(&[("outName", SchemaType::String)])),
//! );
//! ```

pub mod openapi;
pub mod value;

pub use openapi::{Operation, ParameterLocation, SchemaDocument, SchemaType};
pub use value::{DoubleFormat, FlexValue, UnknownDoubleFormat};
