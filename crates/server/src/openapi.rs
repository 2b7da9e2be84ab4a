use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String, pub id: i32 }

/// `latitude`/`longitude` accept a number or a numeric string.
#[derive(ToSchema)]
pub struct AddSchoolRequestDoc {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Exactly one of `value` (kilometers) or `anomaly` is present.
#[derive(ToSchema)]
pub struct DistanceDoc {
    pub value: Option<f64>,
    pub anomaly: Option<String>,
}

#[derive(ToSchema)]
pub struct RankedSchoolDoc {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance: DistanceDoc,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::schools::add_school,
        crate::routes::schools::list_schools,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            MessageDoc,
            AddSchoolRequestDoc,
            DistanceDoc,
            RankedSchoolDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "schools", description = "School records and proximity listing")
    )
)]
pub struct ApiDoc;
