//! Package catalog endpoints.

use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Json, Router,
};
use flowgate::{
    openapi::{array_schema, json_response, object_schema, parameter, type_schema},
    Operation, ParameterLocation, SchemaDocument, SchemaType,
};
use flowgate_engine_api::PackageDetails;
use serde::Serialize;

use crate::error::AppError;

use super::{parse_id, raw_json, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageBody {
    pub package_id: u32,
    pub package_name: String,
    pub package_version: String,
}

impl From<PackageDetails> for PackageBody {
    fn from(p: PackageDetails) -> Self {
        Self {
            package_id: p.package_id,
            package_name: p.package_name,
            package_version: p.package_version,
        }
    }
}

/// `GET /api/packages`: the catalog, in engine order.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PackageBody>>, AppError> {
    let packages = state.engine.get_available_packages().await?;
    Ok(Json(packages.into_iter().map(PackageBody::from).collect()))
}

/// `GET /api/packages/{packageId}/json`: the engine's own description of
/// one package.
pub async fn package_json(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let package_id = parse_id(&id, "package id")?;
    raw_json(state.engine.get_package_json(package_id).await?)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/packages", get(list))
        .route("/api/packages/{id}/json", get(package_json))
}

pub fn document(doc: &mut SchemaDocument) {
    doc.add_endpoint(
        "/api/packages",
        "GET",
        Operation::new("Get all available packages").response(
            200,
            json_response(
                "List of available packages",
                array_schema(object_schema(&[
                    ("packageId", SchemaType::Integer),
                    ("packageName", SchemaType::String),
                    ("packageVersion", SchemaType::String),
                ])),
            ),
        ),
    );

    doc.add_endpoint(
        "/api/packages/{packageId}/json",
        "GET",
        Operation::new("Get package JSON schema")
            .parameter(parameter(
                "packageId",
                ParameterLocation::Path,
                true,
                SchemaType::Integer,
                "Package ID to fetch JSON for",
            ))
            .response(
                200,
                json_response("Package JSON schema", type_schema(SchemaType::Object)),
            ),
    );
}

pub fn register(doc: &mut SchemaDocument) -> Router<AppState> {
    document(doc);
    routes()
}
