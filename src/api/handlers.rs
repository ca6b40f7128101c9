use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::filters::{
    self, fields_for_name, operator_catalog, FieldType, FilterConfig, FilterError, FilterField,
    OperatorInfo, Predicate, ValidationResult,
};
use crate::models::{EntityType, Record};
use crate::search::{SearchParams, SearchResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

fn parse_entity(name: &str) -> Result<EntityType> {
    EntityType::from_str(name).map_err(|_| FilterError::UnknownEntity(name.to_string()).into())
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.observability.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Multi-entity free-text search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    let request = params.into_request(state.search.config())?;
    let response = state.search.search(&request).await?;
    Ok(Json(response))
}

/// Filterable fields of an entity; unknown entities have none
pub async fn list_fields(Path(entity): Path<String>) -> Json<FieldsResponse> {
    Json(FieldsResponse {
        fields: fields_for_name(&entity),
        entity,
    })
}

#[derive(Debug, Serialize)]
pub struct FieldsResponse {
    pub entity: String,
    pub fields: &'static [FilterField],
}

/// Operators applicable to a field type
pub async fn list_operators(Path(field_type): Path<String>) -> Result<Json<OperatorsResponse>> {
    let parsed = FieldType::from_str(&field_type)
        .map_err(|_| AppError::NotFound(format!("field type `{field_type}`")))?;

    Ok(Json(OperatorsResponse {
        field_type: parsed,
        operators: operator_catalog(parsed),
    }))
}

#[derive(Debug, Serialize)]
pub struct OperatorsResponse {
    pub field_type: FieldType,
    pub operators: Vec<OperatorInfo>,
}

/// Structural validation; findings are data, never an error status
pub async fn validate_filter(Json(config): Json<FilterConfig>) -> Json<ValidationResult> {
    Json(filters::validate(&config))
}

/// Compile a configuration for an entity
pub async fn compile_filter(
    Path(entity): Path<String>,
    Json(config): Json<FilterConfig>,
) -> Result<Json<CompileResponse>> {
    let entity_type = parse_entity(&entity)?;
    let predicate = filters::compile(&config, entity_type)?;

    Ok(Json(CompileResponse {
        entity: entity_type,
        predicate,
    }))
}

#[derive(Debug, Serialize)]
pub struct CompileResponse {
    pub entity: EntityType,
    pub predicate: Predicate,
}

/// Encode a configuration into a shareable token
pub async fn encode_filter(Json(config): Json<FilterConfig>) -> Json<TokenResponse> {
    Json(TokenResponse {
        token: filters::encode(&config),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Decode a shared token
pub async fn decode_filter(Query(params): Query<DecodeQuery>) -> Result<Json<DecodeResponse>> {
    let (config, warning) = decode_token(&params.token, params.strict)?;
    Ok(Json(DecodeResponse { config, warning }))
}

#[derive(Debug, Deserialize)]
pub struct DecodeQuery {
    pub token: String,
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct DecodeResponse {
    pub config: FilterConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Strict decoding fails the request; lenient decoding falls back to a
/// fresh configuration and reports why
fn decode_token(token: &str, strict: bool) -> Result<(FilterConfig, Option<String>)> {
    match filters::decode_strict(token) {
        Ok(config) => Ok((config, None)),
        Err(err) if strict => Err(err.into()),
        Err(err) => {
            tracing::warn!(error = %err, "Ignoring undecodable filter token");
            Ok((FilterConfig::new(), Some(err.to_string())))
        }
    }
}

/// List records of an entity, optionally filtered by a shared token
pub async fn list_records(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Query(params): Query<ListRecordsQuery>,
) -> Result<Json<ListRecordsResponse>> {
    let entity_type = parse_entity(&entity)?;

    let (config, filter_warning) = match params.filters.as_deref() {
        Some(token) if !token.trim().is_empty() => {
            decode_token(token, state.config.filters.strict_decode)?
        }
        _ => (FilterConfig::new(), None),
    };
    let predicate = filters::compile(&config, entity_type)?;

    let page = params.page.unwrap_or(0);
    let page_size = params.page_size.unwrap_or(20).clamp(1, 100); // Max 100 per page

    let records = state
        .store
        .list_records(entity_type, &predicate, page, page_size)
        .await?;
    let total = state.store.count_records(entity_type, &predicate).await?;

    Ok(Json(ListRecordsResponse {
        entity: entity_type,
        records,
        total,
        page,
        page_size,
        filter_warning,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ListRecordsQuery {
    pub filters: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ListRecordsResponse {
    pub entity: EntityType,
    pub records: Vec<Record>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_warning: Option<String>,
}

/// Create a record of the given entity type
pub async fn create_record(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<Record>)> {
    let entity_type = parse_entity(&entity)?;
    let record = Record::from_json(entity_type, body)?;

    state.store.save_record(record.clone()).await?;
    tracing::info!(entity_type = %entity_type, record_id = %record.id(), "Record created");

    Ok((StatusCode::CREATED, Json(record)))
}

/// Get a record by ID
pub async fn get_record(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, Uuid)>,
) -> Result<Json<Record>> {
    let entity_type = parse_entity(&entity)?;

    state
        .store
        .get_record(&id)
        .await?
        .filter(|record| record.entity_type() == entity_type)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("{} {id}", entity_type.singular())))
}
