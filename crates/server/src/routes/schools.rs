use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Query, State},
    http::StatusCode,
    Json,
};
use common::types::Message;
use service::school::domain::{AddSchoolInput, ListSchoolsQuery, RankedSchool};
use tracing::info;

use crate::{errors::JsonApiError, routes::AppState};

#[utoipa::path(
    post, path = "/addSchool", tag = "schools",
    request_body = crate::openapi::AddSchoolRequestDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::MessageDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage Failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn add_school(
    State(state): State<AppState>,
    payload: Result<Json<AddSchoolInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>), JsonApiError> {
    let Json(input) = payload?;
    let school = state.schools.add(input).await?;
    info!(id = school.id, "created school");
    Ok((
        StatusCode::CREATED,
        Json(Message { message: "School added successfully".into(), id: Some(school.id) }),
    ))
}

#[utoipa::path(
    get, path = "/listSchools", tag = "schools",
    params(
        ("latitude" = String, Query, description = "Reference latitude in degrees"),
        ("longitude" = String, Query, description = "Reference longitude in degrees")
    ),
    responses(
        (status = 200, description = "Schools sorted by distance, nearest first", body = [crate::openapi::RankedSchoolDoc]),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage Failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list_schools(
    State(state): State<AppState>,
    query: Result<Query<ListSchoolsQuery>, QueryRejection>,
) -> Result<Json<Vec<RankedSchool>>, JsonApiError> {
    let Query(query) = query?;
    let ranked = state.schools.list_by_proximity(query).await?;
    info!(count = ranked.len(), "list schools");
    Ok(Json(ranked))
}
