//! Great-circle distance and proximity ranking.

use std::cmp::Ordering;

use tracing::warn;

use super::domain::{Coordinate, CoordinateAnomaly, Distance, RankedSchool, School};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two points given in degrees.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();
    let a = ((d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos() * to.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Round to two decimals for presentation.
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Distance from `origin` to a stored school, flagging unusable coordinates.
pub fn measure(origin: Coordinate, school: &School) -> Distance {
    if !school.latitude.is_finite() || !school.longitude.is_finite() {
        warn!(
            school_id = school.id,
            latitude = school.latitude,
            longitude = school.longitude,
            event = "coordinate_anomaly",
            "invalid school coordinates"
        );
        return Distance::Anomaly(CoordinateAnomaly {
            reason: "stored latitude/longitude is not a finite number".into(),
        });
    }
    Distance::Value(round_km(haversine_km(origin, school.coordinate())))
}

/// Ascending by distance; anomalies go last.
fn ranking_order(a: &Distance, b: &Distance) -> Ordering {
    match (a, b) {
        (Distance::Value(x), Distance::Value(y)) => x.total_cmp(y),
        (Distance::Value(_), Distance::Anomaly(_)) => Ordering::Less,
        (Distance::Anomaly(_), Distance::Value(_)) => Ordering::Greater,
        (Distance::Anomaly(_), Distance::Anomaly(_)) => Ordering::Equal,
    }
}

/// Annotate every school with its distance from `origin` and sort nearest first.
///
/// The sort is stable: equal distances, and all anomalies, keep input order.
pub fn rank_by_distance(origin: Coordinate, schools: Vec<School>) -> Vec<RankedSchool> {
    let mut ranked: Vec<RankedSchool> = schools
        .into_iter()
        .map(|school| {
            let distance = measure(origin, &school);
            RankedSchool { school, distance }
        })
        .collect();
    ranked.sort_by(|a, b| ranking_order(&a.distance, &b.distance));
    ranked
}
