use crate::infra::{checked_coordinates, coordinates_from_parts, AdvisorService, AppState, RankRequest};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use renovation_advisor::archetypes::{
    ArchetypeDetails, ArchetypeKey, ArchetypeRecord, ArchetypeSource, BuildingOptions,
    Coordinates,
};
use renovation_advisor::error::AppError;
use renovation_advisor::ranking::RankedScenario;
use renovation_advisor::transform::{
    apply_all, validate, BuildingModifications, ModificationValidation,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    pub(crate) country: Option<String>,
    pub(crate) category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CountQuery {
    pub(crate) category: Option<String>,
    pub(crate) period: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CategoriesQuery {
    pub(crate) lat: Option<f64>,
    pub(crate) lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MatchRequest {
    pub(crate) category: String,
    #[serde(default)]
    pub(crate) period: Option<String>,
    #[serde(default)]
    pub(crate) coordinates: Option<Coordinates>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModificationRequest {
    pub(crate) archetype: ArchetypeKey,
    #[serde(default)]
    pub(crate) modifications: BuildingModifications,
}

pub(crate) fn advisor_router<S>(service: Arc<AdvisorService<S>>) -> Router
where
    S: ArchetypeSource + 'static,
{
    Router::new()
        .route("/ready", get(readiness_endpoint::<S>))
        .route("/api/v1/archetypes", get(list_archetypes::<S>))
        .route("/api/v1/archetypes/options", get(building_options::<S>))
        .route("/api/v1/archetypes/count", get(count_archetypes::<S>))
        .route("/api/v1/archetypes/details", post(archetype_details::<S>))
        .route("/api/v1/archetypes/match", post(match_archetype::<S>))
        .route("/api/v1/archetypes/categories", get(available_categories::<S>))
        .route("/api/v1/payload/validate", post(validate_payload::<S>))
        .route("/api/v1/payload/apply", post(apply_payload::<S>))
        .with_state(service)
}

pub(crate) fn with_advisor_routes<S>(service: Arc<AdvisorService<S>>) -> Router
where
    S: ArchetypeSource + 'static,
{
    advisor_router(service)
        .route("/health", get(healthcheck))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/scenarios/rank", post(rank_scenarios))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint<S>(
    State(service): State<Arc<AdvisorService<S>>>,
    Extension(state): Extension<AppState>,
) -> impl IntoResponse
where
    S: ArchetypeSource + 'static,
{
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let label = if ready { "ready" } else { "initializing" };

    (
        status,
        Json(json!({
            "status": label,
            "catalog": service.catalog().status(),
        })),
    )
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn list_archetypes<S>(
    State(service): State<Arc<AdvisorService<S>>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ArchetypeRecord>>, AppError>
where
    S: ArchetypeSource + 'static,
{
    let records = service
        .catalog()
        .list_filtered(query.country.as_deref(), query.category.as_deref())
        .await?;
    Ok(Json(records))
}

pub(crate) async fn building_options<S>(
    State(service): State<Arc<AdvisorService<S>>>,
) -> Result<Json<BuildingOptions>, AppError>
where
    S: ArchetypeSource + 'static,
{
    Ok(Json(service.catalog().building_options().await?))
}

pub(crate) async fn count_archetypes<S>(
    State(service): State<Arc<AdvisorService<S>>>,
    Query(query): Query<CountQuery>,
) -> Result<Json<serde_json::Value>, AppError>
where
    S: ArchetypeSource + 'static,
{
    let count = service
        .catalog()
        .count_matching(query.category.as_deref(), query.period.as_deref())
        .await?;
    Ok(Json(json!({ "count": count })))
}

pub(crate) async fn archetype_details<S>(
    State(service): State<Arc<AdvisorService<S>>>,
    Json(key): Json<ArchetypeKey>,
) -> Result<Json<Arc<ArchetypeDetails>>, AppError>
where
    S: ArchetypeSource + 'static,
{
    Ok(Json(service.catalog().get_details(&key).await?))
}

pub(crate) async fn match_archetype<S>(
    State(service): State<Arc<AdvisorService<S>>>,
    Json(request): Json<MatchRequest>,
) -> Result<Response, AppError>
where
    S: ArchetypeSource + 'static,
{
    let coordinates = request
        .coordinates
        .map(checked_coordinates)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let found = service
        .matcher()
        .find_best(&request.category, request.period.as_deref(), coordinates)
        .await?;

    match found {
        Some(found) => {
            info!(
                category = %request.category,
                archetype = %found.details.record.name,
                geographic = found.geographic_match_applied,
                "archetype matched"
            );
            Ok(Json(found).into_response())
        }
        None => {
            let payload = json!({
                "error": format!("no archetype available for category '{}'", request.category),
            });
            Ok((StatusCode::NOT_FOUND, Json(payload)).into_response())
        }
    }
}

pub(crate) async fn available_categories<S>(
    State(service): State<Arc<AdvisorService<S>>>,
    Query(query): Query<CategoriesQuery>,
) -> Result<Json<Vec<String>>, AppError>
where
    S: ArchetypeSource + 'static,
{
    let coordinates =
        coordinates_from_parts(query.lat, query.lon).map_err(AppError::BadRequest)?;
    Ok(Json(service.matcher().available_categories(coordinates).await?))
}

pub(crate) async fn validate_payload<S>(
    State(service): State<Arc<AdvisorService<S>>>,
    Json(request): Json<ModificationRequest>,
) -> Result<Json<ModificationValidation>, AppError>
where
    S: ArchetypeSource + 'static,
{
    let details = service.catalog().get_details(&request.archetype).await?;
    Ok(Json(validate(&request.modifications, &details)))
}

pub(crate) async fn apply_payload<S>(
    State(service): State<Arc<AdvisorService<S>>>,
    Json(request): Json<ModificationRequest>,
) -> Result<Response, AppError>
where
    S: ArchetypeSource + 'static,
{
    let details = service.catalog().get_details(&request.archetype).await?;
    let validation = validate(&request.modifications, &details);
    if !validation.is_valid {
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(validation)).into_response());
    }

    let modified = apply_all(&details, &request.modifications);
    Ok(Json(modified).into_response())
}

pub(crate) async fn rank_scenarios(
    Json(request): Json<RankRequest>,
) -> Result<Json<Vec<RankedScenario>>, AppError> {
    let ranker = request.ranker().map_err(AppError::BadRequest)?;
    Ok(Json(
        ranker.rank_scenarios(&request.scenarios, request.baseline_energy),
    ))
}
